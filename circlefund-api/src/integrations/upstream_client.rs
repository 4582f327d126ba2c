use super::{FetchError, ReportSource};
use crate::config::UpstreamConfig;
use crate::helpers::auth_context::{AuthContext, EMAIL_HEADER, PASSWORD_HEADER};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use shared_types::{ContributionRecord, GoalRecord, LoanRecord, UserRecord};
use std::future::Future;
use std::time::Duration;

const USERS_PATH: &str = "api/admin/users";
const GOALS_PATH: &str = "api/goals";
const CONTRIBUTIONS_PATH: &str = "api/admin/contributions";
const LOANS_PATH: &str = "api/admin/loans";

const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// `min(base * 2^attempt, 30s)`
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
    base.checked_mul(factor)
        .map(|d| d.min(MAX_RETRY_DELAY))
        .unwrap_or(MAX_RETRY_DELAY)
}

/// Runs `fetch` until it succeeds, fails with an authorization error, or
/// has been retried `retries` times, sleeping `backoff_delay` in between.
pub async fn retry_members<T, F, Fut>(
    retries: u32,
    base_delay: Duration,
    mut fetch: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0;
    loop {
        match fetch().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_authorization() || attempt >= retries => return Err(e),
            Err(e) => {
                let delay = backoff_delay(base_delay, attempt);
                tracing::warn!(
                    "Members fetch failed (attempt {}), retrying in {:?}: {}",
                    attempt + 1,
                    delay,
                    e
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// reqwest client for the system-of-record REST API
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
    members_fetch_retries: u32,
    retry_base_delay: Duration,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            members_fetch_retries: config.members_fetch_retries,
            retry_base_delay: config.retry_base_delay(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: &AuthContext,
    ) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header(EMAIL_HEADER, auth.email())
            .header(PASSWORD_HEADER, auth.password())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED => FetchError::Unauthorized,
                StatusCode::FORBIDDEN => FetchError::Forbidden(body),
                _ => FetchError::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                FetchError::Decode(e.to_string())
            } else {
                FetchError::Transport(e.to_string())
            }
        })
    }
}

#[async_trait]
impl ReportSource for UpstreamClient {
    /// Retries non-authorization failures with exponential backoff
    async fn fetch_users(&self, auth: &AuthContext) -> Result<Vec<UserRecord>, FetchError> {
        retry_members(self.members_fetch_retries, self.retry_base_delay, || {
            self.get_json(USERS_PATH, auth)
        })
        .await
    }

    async fn fetch_goals(&self, auth: &AuthContext) -> Result<Vec<GoalRecord>, FetchError> {
        self.get_json(GOALS_PATH, auth).await
    }

    async fn fetch_contributions(
        &self,
        auth: &AuthContext,
    ) -> Result<Vec<ContributionRecord>, FetchError> {
        self.get_json(CONTRIBUTIONS_PATH, auth).await
    }

    async fn fetch_loans(&self, auth: &AuthContext) -> Result<Vec<LoanRecord>, FetchError> {
        self.get_json(LOANS_PATH, auth).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails with `error` for the first `failures` calls, then succeeds
    async fn flaky(
        calls: &AtomicU32,
        failures: u32,
        error: fn() -> FetchError,
    ) -> Result<u32, FetchError> {
        let call = calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= failures {
            Err(error())
        } else {
            Ok(call)
        }
    }

    fn transport() -> FetchError {
        FetchError::Transport("connection reset".to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_members_authorization_failure_is_not_retried() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = retry_members(3, Duration::from_millis(1000), || {
            flaky(&calls, u32::MAX, || FetchError::Unauthorized)
        })
        .await;

        assert!(matches!(result, Err(FetchError::Unauthorized)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_members_transport_failure_exhausts_retries() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = retry_members(3, Duration::from_millis(1000), || {
            flaky(&calls, u32::MAX, transport)
        })
        .await;

        assert!(matches!(result, Err(FetchError::Transport(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // 1s + 2s + 4s
        assert_eq!(started.elapsed(), Duration::from_millis(7000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_members_recovers_after_transport_failure() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();

        let result = retry_members(3, Duration::from_millis(1000), || {
            flaky(&calls, 2, transport)
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(started.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_members_without_retries_fails_once() {
        let calls = AtomicU32::new(0);

        let result = retry_members(0, Duration::from_millis(1000), || {
            flaky(&calls, u32::MAX, transport)
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_delay() {
        let base = Duration::from_millis(1000);
        assert_eq!(backoff_delay(base, 0), Duration::from_millis(1000));
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(2000));
        assert_eq!(backoff_delay(base, 4), Duration::from_millis(16000));
        assert_eq!(backoff_delay(base, 5), MAX_RETRY_DELAY);
        assert_eq!(backoff_delay(base, 40), MAX_RETRY_DELAY);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = UpstreamConfig {
            base_url: "http://localhost:5154/".to_string(),
            ..Default::default()
        };
        let client = UpstreamClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5154");
    }

    #[test]
    fn test_authorization_classification() {
        assert!(FetchError::Unauthorized.is_authorization());
        assert!(FetchError::Forbidden("admins only".to_string()).is_authorization());
        assert!(!FetchError::Transport("connection refused".to_string()).is_authorization());
        assert!(!FetchError::Status {
            status: 500,
            body: String::new()
        }
        .is_authorization());
    }
}

use crate::config::UpstreamConfig;
use crate::helpers::AuthContext;
use crate::integrations::{FetchError, ReportSource};
use chrono::{DateTime, Utc};
use reports::{build_member_summaries, SourceCollections};
use shared_types::{DataSource, MemberSummary, ReportError, ReportStatusResponse};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

/// Settled result of one report refresh
#[derive(Debug, Clone)]
pub struct ReportSnapshot {
    pub generation: u64,
    pub generated_at: DateTime<Utc>,
    /// Favorites-first default order
    pub members: Vec<MemberSummary>,
    pub degraded_sources: Vec<DataSource>,
}

#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Completed(Arc<ReportSnapshot>),
    /// Another refresh was in flight; this request was ignored
    AlreadyRunning,
    /// The view was abandoned while loading; the result was dropped
    Discarded,
}

#[derive(Debug, Clone, Copy)]
pub struct ReportTimings {
    pub auth_retry_delay: Duration,
    pub credential_grace: Duration,
}

impl From<&UpstreamConfig> for ReportTimings {
    fn from(config: &UpstreamConfig) -> Self {
        Self {
            auth_retry_delay: config.auth_retry_delay(),
            credential_grace: config.credential_grace(),
        }
    }
}

/// A snapshot together with the credentials that loaded it
struct StoredReport {
    snapshot: Arc<ReportSnapshot>,
    loaded_by: AuthContext,
}

pub struct ReportManager {
    source: Arc<dyn ReportSource>,
    timings: ReportTimings,
    in_flight: AtomicBool,
    generation: AtomicU64,
    latest: RwLock<Option<StoredReport>>,
    last_error: Mutex<Option<ReportError>>,
}

/// Clears the in-flight flag however the refresh ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ReportManager {
    pub fn new(source: Arc<dyn ReportSource>, timings: ReportTimings) -> Self {
        Self {
            source,
            timings,
            in_flight: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            latest: RwLock::new(None),
            last_error: Mutex::new(None),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> Option<Arc<ReportSnapshot>> {
        self.latest
            .read()
            .await
            .as_ref()
            .map(|stored| stored.snapshot.clone())
    }

    pub async fn last_error(&self) -> Option<ReportError> {
        self.last_error.lock().await.clone()
    }

    pub async fn status(&self) -> ReportStatusResponse {
        ReportStatusResponse {
            loading: self.is_loading(),
            has_report: self.latest.read().await.is_some(),
            last_error: self.last_error().await.map(|e| e.to_string()),
        }
    }

    /// Drops whatever an in-flight refresh produces. Fetches are left to finish.
    pub fn abandon(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("Report view abandoned, now at generation {}", generation);
    }

    /// Re-fetches all four collections and rebuilds the report, unless a
    /// refresh is already running.
    pub async fn refresh(&self, auth: Option<AuthContext>) -> Result<RefreshOutcome, ReportError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::info!("Report refresh already in progress, ignoring request");
            return Ok(RefreshOutcome::AlreadyRunning);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let Some(auth) = auth else {
            return Err(self.record_failure(ReportError::NotAuthenticated).await);
        };

        let generation = self.generation.load(Ordering::SeqCst);
        tracing::info!("Starting general report refresh (generation {})", generation);

        let result = self.load(&auth).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::info!("Discarding report for abandoned generation {}", generation);
            return Ok(RefreshOutcome::Discarded);
        }

        match result {
            Ok((sources, degraded_sources)) => {
                let members = build_member_summaries(&sources);
                let members = match members {
                    Ok(members) => members,
                    Err(e) => return Err(self.record_failure(e).await),
                };

                let snapshot = Arc::new(ReportSnapshot {
                    generation,
                    generated_at: Utc::now(),
                    members,
                    degraded_sources,
                });

                tracing::info!(
                    "General report ready: {} members ({} favorites), degraded sources: {:?}",
                    snapshot.members.len(),
                    snapshot.members.iter().filter(|m| m.is_favorite).count(),
                    snapshot.degraded_sources
                );

                *self.latest.write().await = Some(StoredReport {
                    snapshot: snapshot.clone(),
                    loaded_by: auth,
                });
                *self.last_error.lock().await = None;

                Ok(RefreshOutcome::Completed(snapshot))
            }
            Err(e) => Err(self.record_failure(e).await),
        }
    }

    /// Returns the current snapshot when it was loaded with the same
    /// credentials, otherwise loads one with `auth`.
    /// `None` means another caller's refresh is still running.
    pub async fn ensure_snapshot(
        &self,
        auth: AuthContext,
    ) -> Result<Option<Arc<ReportSnapshot>>, ReportError> {
        if let Some(stored) = self.latest.read().await.as_ref() {
            if stored.loaded_by.same_credentials(&auth) {
                return Ok(Some(stored.snapshot.clone()));
            }
        }

        match self.refresh(Some(auth)).await? {
            RefreshOutcome::Completed(snapshot) => Ok(Some(snapshot)),
            RefreshOutcome::AlreadyRunning | RefreshOutcome::Discarded => Ok(None),
        }
    }

    async fn record_failure(&self, err: ReportError) -> ReportError {
        tracing::error!("General report failed: {}", err);
        *self.last_error.lock().await = Some(err.clone());
        err
    }

    /// One automatic retry when the members fetch is rejected right after
    /// the credentials were set.
    async fn load(
        &self,
        auth: &AuthContext,
    ) -> Result<(SourceCollections, Vec<DataSource>), ReportError> {
        let started = Instant::now();

        match self.load_once(auth).await {
            Err(ReportError::Unauthorized(reason))
                if auth.is_fresh(self.timings.credential_grace, started) =>
            {
                tracing::warn!(
                    "Members fetch unauthorized right after sign-in, retrying once in {:?}: {}",
                    self.timings.auth_retry_delay,
                    reason
                );
                tokio::time::sleep(self.timings.auth_retry_delay).await;
                self.load_once(auth).await
            }
            other => other,
        }
    }

    async fn load_once(
        &self,
        auth: &AuthContext,
    ) -> Result<(SourceCollections, Vec<DataSource>), ReportError> {
        let (users, goals, contributions, loans) = tokio::join!(
            self.source.fetch_users(auth),
            self.source.fetch_goals(auth),
            self.source.fetch_contributions(auth),
            self.source.fetch_loans(auth),
        );

        let users = users.map_err(|e| {
            if e.is_authorization() {
                ReportError::Unauthorized(e.to_string())
            } else {
                ReportError::MembersUnavailable(e.to_string())
            }
        })?;

        let mut degraded = Vec::new();
        let sources = SourceCollections {
            users,
            goals: or_degraded(goals, DataSource::Goals, &mut degraded),
            contributions: or_degraded(contributions, DataSource::Contributions, &mut degraded),
            loans: or_degraded(loans, DataSource::Loans, &mut degraded),
        };

        Ok((sources, degraded))
    }
}

fn or_degraded<T>(
    result: Result<Vec<T>, FetchError>,
    source: DataSource,
    degraded: &mut Vec<DataSource>,
) -> Vec<T> {
    match result {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("{:?} fetch failed, continuing with none: {}", source, e);
            degraded.push(source);
            Vec::new()
        }
    }
}

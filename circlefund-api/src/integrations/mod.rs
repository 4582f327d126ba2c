pub mod upstream_client;

pub use upstream_client::UpstreamClient;

use crate::helpers::AuthContext;
use async_trait::async_trait;
use shared_types::{ContributionRecord, GoalRecord, LoanRecord, UserRecord};

/// Upstream failure, classified by what happened rather than by message text
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Unauthorized: upstream rejected the supplied credentials")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn is_authorization(&self) -> bool {
        matches!(self, FetchError::Unauthorized | FetchError::Forbidden(_))
    }
}

/// The four read-only collections the general report is built from
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch_users(&self, auth: &AuthContext) -> Result<Vec<UserRecord>, FetchError>;
    async fn fetch_goals(&self, auth: &AuthContext) -> Result<Vec<GoalRecord>, FetchError>;
    async fn fetch_contributions(
        &self,
        auth: &AuthContext,
    ) -> Result<Vec<ContributionRecord>, FetchError>;
    async fn fetch_loans(&self, auth: &AuthContext) -> Result<Vec<LoanRecord>, FetchError>;
}

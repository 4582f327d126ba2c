use serde::{Deserialize, Serialize};

pub mod contribution;
pub mod goal;
pub mod loan;
pub mod member;
pub mod report;
pub mod settings;

pub use contribution::{ContributionRecord, ContributionStatus};
pub use goal::{GoalRecord, GoalStatus};
pub use loan::{LoanRecord, LoanStatus};
pub use member::{UserRecord, MEMBER_ROLE};
pub use report::{
    DataSource, EmptyState, GeneralReportQuery, GeneralReportResponse, GoalParticipation,
    MemberContribution, MemberLoan, MemberSummary, ReportError, ReportStatusResponse,
    ReportTotals, SortKey, SortOrder,
};
pub use settings::SettingsResponse;

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub retryable: bool,
}

impl From<&ReportError> for ErrorResponse {
    fn from(err: &ReportError) -> Self {
        Self {
            error: err.to_string(),
            retryable: err.is_retryable(),
        }
    }
}

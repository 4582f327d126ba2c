use crate::{ContributionStatus, GoalStatus, LoanStatus};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A goal the member has contributed to at least once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct GoalParticipation {
    pub goal_id: i64,
    pub goal_name: String,
    pub status: GoalStatus,
    pub progress: f64,
    /// Submission time of the member's earliest contribution to this goal
    pub joined_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct MemberContribution {
    pub contribution_id: i64,
    pub goal_id: i64,
    pub goal_name: String,
    pub amount: f64,
    pub status: ContributionStatus,
    pub submitted_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct MemberLoan {
    pub loan_id: i64,
    pub principal_amount: f64,
    pub status: LoanStatus,
    pub requested_date: String,
    pub remaining_amount: f64,
}

/// Per-member activity summary produced by the general report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct MemberSummary {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub role: String,
    pub member_since: String,
    pub profile_picture_url: Option<String>,
    pub contributions: Vec<MemberContribution>,
    pub goals: Vec<GoalParticipation>,
    pub loans: Vec<MemberLoan>,
    /// Sum of approved contribution amounts only
    pub total_contributed: f64,
    /// All contributions, regardless of status
    pub contribution_count: usize,
    pub goals_joined: usize,
    pub has_active_loans: bool,
    pub is_favorite: bool,
}

/// User-selectable sort key for the member table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    TotalContributed,
    ContributionCount,
    GoalsJoined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

/// Upstream collections feeding the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Members,
    Goals,
    Contributions,
    Loans,
}

/// Why the member table is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// The member directory has no members at all
    NoMembers,
    /// Members exist but none match the current search
    NoMatches,
}

/// Aggregates over the rows currently displayed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
pub struct ReportTotals {
    pub total_members: usize,
    pub total_contributed: f64,
    pub total_contributions: usize,
    pub favorite_members: usize,
}

/// Query parameters accepted by the general report endpoints
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct GeneralReportQuery {
    pub search: Option<String>,
    pub sort_by: Option<SortKey>,
    pub sort_order: Option<SortOrder>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct GeneralReportResponse {
    pub members: Vec<MemberSummary>,
    pub totals: ReportTotals,
    pub empty_state: Option<EmptyState>,
    pub generated_at: String,
    pub degraded_sources: Vec<DataSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ReportStatusResponse {
    pub loading: bool,
    pub has_report: bool,
    pub last_error: Option<String>,
}

/// Failures that stop the general report from rendering
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    #[error("Please log in to view the report")]
    NotAuthenticated,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Failed to load members: {0}")]
    MembersUnavailable(String),

    #[error("Failed to build report: {0}")]
    Aggregation(String),
}

impl ReportError {
    /// Whether the view should offer a retry action
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ReportError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_params_serialization() {
        assert_eq!(
            serde_json::to_string(&SortKey::TotalContributed).unwrap(),
            "\"total_contributed\""
        );
        assert_eq!(serde_json::to_string(&SortOrder::Ascending).unwrap(), "\"asc\"");

        let order: SortOrder = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(order, SortOrder::Descending);
    }

    #[test]
    fn test_query_allows_missing_fields() {
        let query: GeneralReportQuery = serde_json::from_str("{}").unwrap();
        assert!(query.search.is_none());
        assert!(query.sort_by.is_none());
        assert!(query.limit.is_none());
    }

    #[test]
    fn test_report_error_retryable() {
        assert!(!ReportError::NotAuthenticated.is_retryable());
        assert!(ReportError::Unauthorized("bad credentials".to_string()).is_retryable());
        assert!(ReportError::Aggregation("negative amount".to_string()).is_retryable());
    }
}

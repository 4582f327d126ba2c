use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Review status of a contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
pub enum ContributionStatus {
    Pending,
    Approved,
    Rejected,
    #[serde(other)]
    Unknown,
}

/// Contribution record as returned by `GET /api/admin/contributions`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ContributionRecord {
    pub contribution_id: i64,
    pub user_id: i64,
    pub goal_id: i64,
    pub goal_name: String,
    pub amount: f64,
    pub status: ContributionStatus,
    pub submitted_at: String,
}

impl ContributionRecord {
    pub fn is_approved(&self) -> bool {
        self.status == ContributionStatus::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_case_sensitive() {
        let status: ContributionStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(status, ContributionStatus::Unknown);

        let status: ContributionStatus = serde_json::from_str("\"Approved\"").unwrap();
        assert_eq!(status, ContributionStatus::Approved);
    }
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lifecycle status of a shared savings goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
pub enum GoalStatus {
    Active,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Goal record as returned by `GET /api/goals`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct GoalRecord {
    pub goal_id: i64,
    pub goal_name: String,
    pub status: GoalStatus,
    #[serde(default)]
    pub progress_percentage: Option<f64>,
    pub start_date: String,
}

impl GoalRecord {
    pub fn progress(&self) -> f64 {
        self.progress_percentage.unwrap_or(0.0)
    }
}

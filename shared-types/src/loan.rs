use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Status of a loan request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
    Overdue,
    #[serde(other)]
    Unknown,
}

/// Loan record as returned by `GET /api/admin/loans`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    pub loan_id: i64,
    pub user_id: i64,
    pub principal_amount: f64,
    pub status: LoanStatus,
    pub requested_date: String,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub remaining_amount: f64,
}

impl LoanRecord {
    /// An approved loan with an outstanding balance
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Approved && self.remaining_amount > 0.0
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Role string the member directory assigns to non-administrator accounts
pub const MEMBER_ROLE: &str = "Member";

/// Account record as returned by `GET /api/admin/users`
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub role: String,
    pub created_at: String,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
}

impl UserRecord {
    /// Administrators and any other role are excluded from member reports
    pub fn is_member(&self) -> bool {
        self.role == MEMBER_ROLE
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

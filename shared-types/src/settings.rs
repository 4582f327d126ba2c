use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Response for settings endpoint
#[derive(Debug, Serialize, Deserialize, TS)]
pub struct SettingsResponse {
    pub config_file_path: String,
    pub upstream_base_url: String,
    pub request_timeout_secs: u64,
    pub members_fetch_retries: u32,
    pub credentials_configured: bool,
}

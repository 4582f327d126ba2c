use crate::config::ApiConfig;
use actix_web::{web, HttpResponse, Result};
use shared_types::SettingsResponse;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct SettingsAppState {
    pub config: Arc<std::sync::RwLock<ApiConfig>>,
    pub config_path: PathBuf,
}

pub async fn get_settings(data: web::Data<SettingsAppState>) -> Result<HttpResponse> {
    let config = data.config.read().map_err(|e| {
        actix_web::error::ErrorInternalServerError(format!(
            "Failed to acquire config read lock: {}",
            e
        ))
    })?;

    let response = SettingsResponse {
        config_file_path: data.config_path.to_string_lossy().to_string(),
        upstream_base_url: config.upstream.base_url.clone(),
        request_timeout_secs: config.upstream.request_timeout_secs,
        members_fetch_retries: config.upstream.members_fetch_retries,
        credentials_configured: config.credentials().is_some(),
    };

    Ok(HttpResponse::Ok().json(response))
}

use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8080

[cors]
allowed_origins = ["http://localhost:5173"]

[upstream]
base_url = "http://localhost:5154"
request_timeout_secs = 30
members_fetch_retries = 3
retry_base_delay_ms = 1000
auth_retry_delay_ms = 1000
credential_grace_ms = 2000

[credentials]
# Only read by the general-report CLI
# email = "admin@example.com"
# password = "change-me"
"#;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub cors: Option<CorsConfig>,
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    pub credentials: Option<CredentialsConfig>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:5173".to_string()],
            }),
            server: Some(ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            }),
            upstream: UpstreamConfig::default(),
            credentials: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Remote system-of-record API the report reads from
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    /// Extra attempts for a members fetch that failed for a non-auth reason
    pub members_fetch_retries: u32,
    pub retry_base_delay_ms: u64,
    pub auth_retry_delay_ms: u64,
    /// How long after credentials are set an auth failure is still treated
    /// as a propagation race and retried once
    pub credential_grace_ms: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5154".to_string(),
            request_timeout_secs: 30,
            members_fetch_retries: 3,
            retry_base_delay_ms: 1000,
            auth_retry_delay_ms: 1000,
            credential_grace_ms: 2000,
        }
    }
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub fn auth_retry_delay(&self) -> Duration {
        Duration::from_millis(self.auth_retry_delay_ms)
    }

    pub fn credential_grace(&self) -> Duration {
        Duration::from_millis(self.credential_grace_ms)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CredentialsConfig {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        Self::load_from(&get_config_path())
    }

    /// Loads `config_path`, writing a commented default file first if missing
    pub fn load_from(config_path: &Path) -> Result<(Self, PathBuf), ConfigError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.to_path_buf()))
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;

        Ok((config, config_path.to_path_buf()))
    }

    pub fn credentials(&self) -> Option<(String, String)> {
        let creds = self.credentials.as_ref()?;
        Some((creds.email.clone()?, creds.password.clone()?))
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("circlefund").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_is_created_and_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("api.toml");

        let (config, loaded_path) = ApiConfig::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(loaded_path, path);
        assert_eq!(config.upstream.base_url, "http://localhost:5154");
        assert_eq!(config.upstream.members_fetch_retries, 3);
        assert_eq!(config.server.as_ref().unwrap().port, 8080);
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_partial_upstream_section_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.toml");
        std::fs::write(
            &path,
            r#"
[upstream]
base_url = "https://fund.example.org"
auth_retry_delay_ms = 250

[credentials]
email = "admin@example.org"
password = "secret"
"#,
        )
        .unwrap();

        let (config, _) = ApiConfig::load_from(&path).unwrap();
        assert_eq!(config.upstream.base_url, "https://fund.example.org");
        assert_eq!(config.upstream.auth_retry_delay(), Duration::from_millis(250));
        assert_eq!(config.upstream.request_timeout_secs, 30);
        assert!(config.server.is_none());
        assert_eq!(
            config.credentials(),
            Some(("admin@example.org".to_string(), "secret".to_string()))
        );
    }
}

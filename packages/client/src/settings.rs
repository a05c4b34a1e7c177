use std::path::PathBuf;
use std::time::Duration;

use api::{ApiError, HttpBackend};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://findme-l00y.onrender.com/api";

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
    pub base_url: String,
    /// Zero disables the request timeout.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub storage_key: String,
    /// Directory of the native token store.
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub session: Session,
}

#[cfg(not(target_arch = "wasm32"))]
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("findme")
        .to_string_lossy()
        .into_owned()
}

#[cfg(target_arch = "wasm32")]
fn default_data_dir() -> String {
    "findme".to_string()
}

impl Settings {
    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("api.timeout_secs", 30)?
            .set_default("session.storage_key", store::DEFAULT_TOKEN_KEY)?
            .set_default("session.data_dir", default_data_dir())
    }

    /// Defaults, then `findme.toml` if present, then `FINDME_*` variables
    /// (`FINDME_API__BASE_URL`, `FINDME_SESSION__STORAGE_KEY`, ...).
    pub fn new() -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(
                File::with_name("findme.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                Environment::with_prefix("FINDME")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Defaults overlaid with a TOML document.
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.api.timeout_secs > 0).then(|| Duration::from_secs(self.api.timeout_secs))
    }

    /// HTTP backend for the configured base URL.
    pub fn backend(&self) -> Result<HttpBackend, ApiError> {
        HttpBackend::with_timeout(&self.api.base_url, self.timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env::set_var;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(settings.session.storage_key, "fm_token");
        assert!(settings.session.data_dir.ends_with("findme"));
    }

    #[test]
    fn test_toml_overrides() {
        let settings = Settings::from_toml(
            r#"
            [api]
            base_url = "http://localhost:5000/api"
            timeout_secs = 0
            "#,
        )
        .unwrap();
        assert_eq!(settings.api.base_url, "http://localhost:5000/api");
        assert_eq!(settings.timeout(), None);
        assert_eq!(settings.backend().unwrap().base_url(), "http://localhost:5000/api");
    }

    #[test]
    fn test_environment_overrides() {
        set_var("FINDME_SESSION__STORAGE_KEY", "findme_test_token");
        let settings = Settings::new().unwrap();
        assert_eq!(settings.session.storage_key, "findme_test_token");
    }

    #[test]
    fn test_bad_base_url_is_config_error() {
        let settings = Settings::from_toml("[api]\nbase_url = \"nowhere\"").unwrap();
        assert!(matches!(settings.backend(), Err(ApiError::Config(_))));
    }
}

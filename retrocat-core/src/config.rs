use std::env;
use std::time::Duration;

use url::Url;

use crate::errors::{CatalogError, ConfigError};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api/";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Runtime environment used by the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    fn from_str(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

/// Settings shared by every client talking to the catalog API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub api_token: Option<String>,
    pub page_size: u32,
    pub timeout: Duration,
    pub environment: Environment,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: normalize_base_url(DEFAULT_API_URL)
                .unwrap_or_else(|_| unreachable!("default API url is valid")),
            api_token: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            environment: Environment::Development,
        }
    }
}

impl ClientConfig {
    /// Builds a configuration pointing at `api_url` with default settings.
    pub fn new(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_base_url(api_url)?,
            ..Self::default()
        })
    }

    /// Loads configuration from the process environment (`RETROCAT_*`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_with_prefix("RETROCAT_")
    }

    /// Loads configuration from env vars prefixed with the provided value (e.g. `STAGING_`).
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let key = |suffix: &str| format!("{}{}", prefix, suffix);

        let api_url = match env::var(key("API_URL")) {
            Ok(raw) if !raw.trim().is_empty() => normalize_base_url(raw.trim())?,
            _ => normalize_base_url(DEFAULT_API_URL)?,
        };

        let api_token = env::var(key("API_TOKEN"))
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        let page_size = read_positive(&key("PAGE_SIZE"), DEFAULT_PAGE_SIZE as u64)? as u32;
        let timeout = Duration::from_secs(read_positive(&key("TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?);

        let environment = env::var(key("ENV"))
            .map(|raw| Environment::from_str(&raw))
            .unwrap_or_default();

        Ok(Self {
            api_url,
            api_token,
            page_size,
            timeout,
            environment,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Whether the client is running against production.
    pub fn is_production(&self) -> bool {
        matches!(self.environment, Environment::Production)
    }

    pub fn api_token(&self) -> Option<&str> {
        self.api_token.as_deref()
    }
}

/// Parses `raw` and guarantees a trailing slash so relative joins keep the base path.
pub fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;

    if !url.path().ends_with('/') {
        let mut path = url.path().trim_end_matches('/').to_string();
        path.push('/');
        url.set_path(&path);
    }

    Ok(url)
}

fn read_positive(key: &str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            let parsed = raw
                .trim()
                .parse::<u64>()
                .map_err(|err| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw.clone(),
                    reason: err.to_string(),
                })?;
            if parsed == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw,
                    reason: "must be greater than zero".into(),
                });
            }
            Ok(parsed)
        }
        _ => Ok(default),
    }
}

/// Helper that loads config and converts to the canonical catalog error type.
pub fn load_client_config() -> Result<ClientConfig, CatalogError> {
    Ok(ClientConfig::from_env()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own prefix so parallel runs don't share variables.

    #[test]
    fn loads_defaults_when_unset() {
        let cfg = ClientConfig::from_env_with_prefix("RCTEST_DEFAULTS_").expect("config should load");
        assert_eq!(cfg.environment, Environment::Development);
        assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(cfg.api_url.as_str(), DEFAULT_API_URL);
        assert!(cfg.api_token().is_none());
    }

    #[test]
    fn reads_prefixed_values() {
        env::set_var("RCTEST_SET_API_URL", "https://retro.example/api");
        env::set_var("RCTEST_SET_API_TOKEN", "  secret ");
        env::set_var("RCTEST_SET_PAGE_SIZE", "25");
        env::set_var("RCTEST_SET_ENV", "prod");
        let cfg = ClientConfig::from_env_with_prefix("RCTEST_SET_").expect("config should load");
        assert_eq!(cfg.api_url.as_str(), "https://retro.example/api/");
        assert_eq!(cfg.api_token(), Some("secret"));
        assert_eq!(cfg.page_size, 25);
        assert!(cfg.is_production());
    }

    #[test]
    fn rejects_zero_page_size() {
        env::set_var("RCTEST_ZERO_PAGE_SIZE", "0");
        let err = ClientConfig::from_env_with_prefix("RCTEST_ZERO_").expect_err("zero is invalid");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = normalize_base_url("http://localhost:3000/api/v1").expect("valid url");
        assert_eq!(url.join("games/datatable").unwrap().path(), "/api/v1/games/datatable");
    }
}

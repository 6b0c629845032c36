use crate::error::ConfigError;
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://open.neis.go.kr/hub";

/// Upstream access configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct NeisConfig {
    pub api_key: String,
    pub base_url: String,
}

impl NeisConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Reads `NEIS_API_KEY` (required) and `GEUPSIK_NEIS_BASE_URL`
    /// (optional override). A missing key is startup-fatal for any caller
    /// that performs upstream lookups.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("NEIS_API_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let config = Self::new(api_key);
        match env::var("GEUPSIK_NEIS_BASE_URL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            Some(base_url) => Ok(config.with_base_url(base_url)),
            None => Ok(config),
        }
    }
}

use serde::Deserialize;

use crate::{ClientError, Result, DEFAULT_BASE_URL};

pub const ENV_VAR_BASE_URL: &str = "WUNDERLIST_BASE_URL";
pub const ENV_VAR_ACCESS_TOKEN: &str = "WUNDERLIST_ACCESS_TOKEN";

/// Settings a [`crate::Client`] is built from.
///
/// `api_key` is the bare access token; the client adds the `Bearer` scheme.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Read overrides from `WUNDERLIST_BASE_URL` and `WUNDERLIST_ACCESS_TOKEN`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base_url) = lookup(ENV_VAR_BASE_URL).filter(|v| !v.is_empty()) {
            config.base_url = base_url;
        }
        config.api_key = lookup(ENV_VAR_ACCESS_TOKEN).filter(|v| !v.is_empty());
        config
    }

    /// Check that `base_url` is an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ClientError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                self.base_url, scheme
            ))),
        }
    }
}

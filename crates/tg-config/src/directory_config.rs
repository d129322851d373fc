use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

/// Tenant and page directory (PostgREST-style database endpoint)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    pub url: Option<String>,
    /// Public API key sent as `apikey` and bearer token. Never logged.
    pub api_key: Option<String>,
}

impl DirectoryConfig {
    pub fn is_configured(&self) -> bool {
        self.url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// Directory URL, required by commands that talk to the directory.
    #[track_caller]
    pub fn require_url(&self) -> ConfigErrorResult<&str> {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(ConfigError::directory(
                "directory.url is not set (config.toml or TG_DIRECTORY_URL)",
            )),
        }
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if let Some(url) = self.url.as_deref()
            && !url.is_empty()
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(ConfigError::directory(format!(
                "directory.url must start with http:// or https://, got '{url}'"
            )));
        }

        Ok(())
    }
}

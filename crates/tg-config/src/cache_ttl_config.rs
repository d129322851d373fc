use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_CACHE_TTL_MS, DEFAULT_SESSION_TTL_MS, MIN_CACHE_TTL_MS,
};

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheTtlConfig {
    /// TTL for membership and tenant lookups
    pub default_ttl_ms: u64,
    /// TTL for `session:*` entries such as the role list
    pub session_ttl_ms: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            default_ttl_ms: DEFAULT_CACHE_TTL_MS,
            session_ttl_ms: DEFAULT_SESSION_TTL_MS,
        }
    }
}

impl CacheTtlConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_millis(self.session_ttl_ms)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.default_ttl_ms < MIN_CACHE_TTL_MS || self.session_ttl_ms < MIN_CACHE_TTL_MS {
            return Err(ConfigError::cache(format!(
                "cache TTLs must be >= {MIN_CACHE_TTL_MS}ms, got default={} session={}",
                self.default_ttl_ms, self.session_ttl_ms
            )));
        }

        if self.default_ttl_ms > self.session_ttl_ms {
            return Err(ConfigError::cache(format!(
                "cache.default_ttl_ms ({}) must not exceed cache.session_ttl_ms ({})",
                self.default_ttl_ms, self.session_ttl_ms
            )));
        }

        Ok(())
    }
}

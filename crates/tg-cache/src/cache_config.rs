use std::time::Duration;

use tg_config::CacheTtlConfig;

/// TTLs applied by cache consumers
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// TTL for ordinary lookups (tenant by slug, membership)
    pub default_ttl: Duration,
    /// TTL for session-scoped data (role listings)
    pub session_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::from(&CacheTtlConfig::default())
    }
}

impl From<&CacheTtlConfig> for CacheConfig {
    fn from(config: &CacheTtlConfig) -> Self {
        Self {
            default_ttl: config.default_ttl(),
            session_ttl: config.session_ttl(),
        }
    }
}

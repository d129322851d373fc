use crate::CacheConfig;

use std::time::Duration;

use tg_config::CacheTtlConfig;

#[test]
fn given_default_cache_config_then_matches_configured_defaults() {
    let defaults = CacheTtlConfig::default();

    let config = CacheConfig::default();

    assert_eq!(config.default_ttl, defaults.default_ttl());
    assert_eq!(config.session_ttl, defaults.session_ttl());
}

#[test]
fn given_ttl_section_when_converted_then_durations_carried_over() {
    let section = CacheTtlConfig {
        default_ttl_ms: 1_500,
        session_ttl_ms: 60_000,
    };

    let config = CacheConfig::from(&section);

    assert_eq!(config.default_ttl, Duration::from_millis(1_500));
    assert_eq!(config.session_ttl, Duration::from_secs(60));
}

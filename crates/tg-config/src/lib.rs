mod api_config;
mod cache_ttl_config;
mod config;
mod directory_config;
mod error;
mod log_level;
mod logging_config;

pub use api_config::ApiConfig;
pub use cache_ttl_config::CacheTtlConfig;
pub use config::Config;
pub use directory_config::DirectoryConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;

/// Environment variable naming the config directory
pub const CONFIG_DIR_ENV: &str = "TG_CONFIG_DIR";
/// Config directory used when `TG_CONFIG_DIR` is unset (relative to cwd)
pub const DEFAULT_CONFIG_DIR_NAME: &str = ".tg";
pub const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
const MIN_API_TIMEOUT_SECS: u64 = 1;
const MAX_API_TIMEOUT_SECS: u64 = 300;

const DEFAULT_CACHE_TTL_MS: u64 = 5 * 60 * 1000;
const DEFAULT_SESSION_TTL_MS: u64 = 24 * 60 * 60 * 1000;
const MIN_CACHE_TTL_MS: u64 = 1;

const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

#[cfg(test)]
mod tests;

use crate::{
    ApiConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAME, CacheTtlConfig, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR_NAME, DirectoryConfig, LoggingConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub directory: DirectoryConfig,
    pub cache: CacheTtlConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for TG_CONFIG_DIR env var, else use ./.tg/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply TG_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: TG_CONFIG_DIR env var > ./.tg/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR_NAME))
    }

    /// Validate all configuration.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.api.validate()?;
        self.directory.validate()?;
        self.cache.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Absolute path of the log file, if file logging is configured.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        let Some(file) = self.logging.file.as_deref() else {
            return Ok(None);
        };
        let config_dir = Self::config_dir()?;
        Ok(Some(config_dir.join(&self.logging.dir).join(file)))
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  api: {} (timeout {}s)",
            self.api.base_url, self.api.timeout_secs
        );
        info!(
            "  directory: {} (api key: {})",
            self.directory.url.as_deref().unwrap_or("not configured"),
            if self.directory.api_key.is_some() {
                "set"
            } else {
                "unset"
            }
        );
        info!(
            "  cache: default={}ms, session={}ms",
            self.cache.default_ttl_ms, self.cache.session_ttl_ms
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Api
        Self::apply_env_string("TG_API_BASE_URL", &mut self.api.base_url);
        Self::apply_env_parse("TG_API_TIMEOUT_SECS", &mut self.api.timeout_secs);

        // Directory
        Self::apply_env_option_string("TG_DIRECTORY_URL", &mut self.directory.url);
        Self::apply_env_option_string("TG_DIRECTORY_API_KEY", &mut self.directory.api_key);

        // Cache
        Self::apply_env_parse("TG_CACHE_DEFAULT_TTL_MS", &mut self.cache.default_ttl_ms);
        Self::apply_env_parse("TG_CACHE_SESSION_TTL_MS", &mut self.cache.session_ttl_ms);

        // Logging
        Self::apply_env_parse("TG_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("TG_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("TG_LOG_FILE", &mut self.logging.file);
        Self::apply_env_string("TG_LOG_DIR", &mut self.logging.dir);
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true"/"1"
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Unparseable values leave the target untouched
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}

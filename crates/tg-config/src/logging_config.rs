use crate::{ConfigError, ConfigErrorResult, DEFAULT_LOG_DIRECTORY, LogLevel};

use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Colored stderr output (ignored when `file` is set)
    pub colored: bool,
    /// Log file name, relative to `dir`
    pub file: Option<String>,
    /// Log directory, relative to the config directory
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            colored: true,
            file: None,
            dir: String::from(DEFAULT_LOG_DIRECTORY),
        }
    }
}

impl LoggingConfig {
    /// Both `dir` and `file` must stay inside the config directory.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if escapes_config_dir(&self.dir) {
            return Err(ConfigError::config(
                "logging.dir must be relative and cannot contain '..'",
            ));
        }

        if let Some(file) = self.file.as_deref()
            && escapes_config_dir(file)
        {
            return Err(ConfigError::config(
                "logging.file must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }
}

fn escapes_config_dir(path: &str) -> bool {
    Path::new(path).is_absolute() || path.contains("..")
}

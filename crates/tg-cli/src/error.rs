use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Config error: {0}")]
    Config(#[from] tg_config::ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] tg_client::ClientError),

    #[error("Failed to create log directory {path}: {source}")]
    LogDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Logger error: {message}")]
    Logger { message: String },

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

use error_location::ErrorLocation;
use std::panic::Location;
use thiserror::Error;

/// Errors building an HTTP client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP client error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid URL '{url}': {message} {location}")]
    Url {
        url: String,
        message: String,
        location: ErrorLocation,
    },
}

impl ClientError {
    #[track_caller]
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        ClientError::Http {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source: err,
        }
    }

    #[track_caller]
    pub fn invalid_url(url: &str, message: impl Into<String>) -> Self {
        ClientError::Url {
            url: url.to_string(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        ClientError::from_reqwest(err)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

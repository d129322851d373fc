use std::panic::Location;

use error_location::ErrorLocation;
use tg_cache::CacheError;
use thiserror::Error;

/// Failure talking to the membership endpoint.
///
/// "No membership yet" is not an error: sources report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum MembershipError {
    #[error("Network error: {message} {location}")]
    Network {
        message: String,
        location: ErrorLocation,
    },

    #[error("Membership API error ({status}) {code}: {message} {location}")]
    Api {
        status: u16,
        code: String,
        message: String,
        location: ErrorLocation,
    },

    #[error("Malformed membership response: {message} {location}")]
    Malformed {
        message: String,
        location: ErrorLocation,
    },

    #[error("{source} {location}")]
    Cache {
        #[source]
        source: CacheError,
        location: ErrorLocation,
    },
}

impl MembershipError {
    #[track_caller]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.into(),
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    pub fn error_code(&self) -> &str {
        match self {
            Self::Network { .. } => "NETWORK_ERROR",
            Self::Api { code, .. } => code,
            Self::Malformed { .. } => "MALFORMED_RESPONSE",
            Self::Cache { .. } => "CACHE_ERROR",
        }
    }
}

impl From<CacheError> for MembershipError {
    #[track_caller]
    fn from(source: CacheError) -> Self {
        Self::Cache {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Failure talking to the tenant or page directory
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Network error: {message} {location}")]
    Network {
        message: String,
        location: ErrorLocation,
    },

    #[error("Directory error ({status}): {message} {location}")]
    Api {
        status: u16,
        message: String,
        location: ErrorLocation,
    },

    #[error("Malformed directory response: {message} {location}")]
    Malformed {
        message: String,
        location: ErrorLocation,
    },

    #[error("{source} {location}")]
    Cache {
        #[source]
        source: CacheError,
        location: ErrorLocation,
    },
}

impl DirectoryError {
    #[track_caller]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<CacheError> for DirectoryError {
    #[track_caller]
    fn from(source: CacheError) -> Self {
        Self::Cache {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

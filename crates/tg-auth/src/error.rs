use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Malformed token: expected 3 segments, found {segments} {location}")]
    MalformedToken {
        segments: usize,
        location: ErrorLocation,
    },

    #[error("Token payload is not valid base64: {source} {location}")]
    PayloadEncoding {
        #[source]
        source: base64::DecodeError,
        location: ErrorLocation,
    },

    #[error("Token payload is not valid JSON: {source} {location}")]
    PayloadJson {
        #[source]
        source: serde_json::Error,
        location: ErrorLocation,
    },

    #[error("Invalid claim '{claim}': {message} {location}")]
    InvalidClaim {
        claim: String,
        message: String,
        location: ErrorLocation,
    },
}

impl AuthError {
    /// Stable machine-readable code, used in CLI output
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedToken { .. } => "MALFORMED_TOKEN",
            Self::PayloadEncoding { .. } => "PAYLOAD_ENCODING",
            Self::PayloadJson { .. } => "PAYLOAD_JSON",
            Self::InvalidClaim { .. } => "INVALID_CLAIM",
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;

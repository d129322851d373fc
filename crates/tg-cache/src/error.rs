use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cached value for '{key}' is not a {expected} {location}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        location: ErrorLocation,
    },
}

pub type Result<T> = std::result::Result<T, CacheError>;

pub(crate) mod error;
pub(crate) mod membership_client;
pub(crate) mod response;
pub(crate) mod rest_directory;

pub use error::{ClientError, Result as ClientResult};
pub use membership_client::{MembershipClient, TENANT_SLUG_HEADER};
pub use rest_directory::RestDirectory;

use std::time::Duration;

/// Shared reqwest client with the configured request timeout
pub(crate) fn http_client(timeout: Duration) -> ClientResult<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// `base` with `path` appended; `base` may carry a trailing slash.
pub(crate) fn endpoint(base: &str, path: &str) -> ClientResult<reqwest::Url> {
    let url = format!("{}{}", base.trim_end_matches('/'), path);
    reqwest::Url::parse(&url).map_err(|e| ClientError::invalid_url(&url, e.to_string()))
}

#[cfg(test)]
mod tests;

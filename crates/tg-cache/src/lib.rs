pub mod cache_config;
pub(crate) mod cache_entry;
pub mod error;
pub mod session_cache;

pub use cache_config::CacheConfig;
pub use error::{CacheError, Result};
pub use session_cache::{SessionCache, cache_key};

#[cfg(test)]
mod tests;

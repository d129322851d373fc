mod cache_config;

use crate::CacheError;

/// Fetch error used by the cache tests
#[derive(Debug)]
pub(crate) enum TestError {
    Failed(&'static str),
    Cache(CacheError),
}

impl From<CacheError> for TestError {
    fn from(error: CacheError) -> Self {
        TestError::Cache(error)
    }
}

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

pub(crate) type AnyValue = Arc<dyn Any + Send + Sync>;

/// A stored value with the time it was stored and how long it stays valid
pub(crate) struct CacheEntry {
    pub value: AnyValue,
    pub stored_at: Instant,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn new(value: AnyValue, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl,
        }
    }

    /// Valid iff `now - stored_at < ttl`
    pub fn is_valid(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < self.ttl
    }
}

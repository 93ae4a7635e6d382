//! Explicit TTL cache for expensive read-side aggregates.
//!
//! The TTL is injected by the owner and invalidation is an explicit call;
//! there is no process-wide implicit cache anywhere in the application.

use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct TtlCache<T> {
    ttl: Duration,
    slot: Mutex<Option<(Instant, T)>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached value if it is still fresh.
    pub fn get(&self) -> Option<T> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref()
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, value)| value.clone())
    }

    pub fn put(&self, value: T) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some((Instant::now(), value));
    }

    /// Drops the cached value. The next read recomputes.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_value_is_returned() {
        let cache = TtlCache::new(Duration::from_secs(60));
        assert_eq!(cache.get(), None::<u32>);
        cache.put(42);
        assert_eq!(cache.get(), Some(42));
    }

    #[test]
    fn expired_value_is_dropped() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.put(42);
        assert_eq!(cache.get(), None);
    }

    #[test]
    fn invalidate_clears_the_slot() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.put(42);
        cache.invalidate();
        assert_eq!(cache.get(), None);
    }
}

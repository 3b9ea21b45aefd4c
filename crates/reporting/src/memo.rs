//! Single-slot memo: remembers the last (key, value) pair and recomputes
//! only when asked for a different key.

use parking_lot::Mutex;
use tracing::debug;

pub struct Memo<K, V> {
    name: &'static str,
    slot: Mutex<Option<(K, V)>>,
}

impl<K: PartialEq + Clone, V: Clone> Memo<K, V> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: Mutex::new(None),
        }
    }

    /// Cached value for `key`, or the result of `compute` which then
    /// replaces whatever was held before.
    pub fn get_or_compute(&self, key: &K, compute: impl FnOnce() -> V) -> V {
        let mut slot = self.slot.lock();
        if let Some((cached_key, value)) = slot.as_ref() {
            if cached_key == key {
                metrics::counter!("aggregate.memo.hit", "view" => self.name).increment(1);
                return value.clone();
            }
        }
        metrics::counter!("aggregate.memo.miss", "view" => self.name).increment(1);
        debug!(view = self.name, "recomputing aggregate");

        let value = compute();
        *slot = Some((key.clone(), value.clone()));
        value
    }

    pub fn invalidate(&self) {
        self.slot.lock().take();
    }

    pub fn is_cached(&self, key: &K) -> bool {
        matches!(self.slot.lock().as_ref(), Some((cached, _)) if cached == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_same_key_computes_once() {
        let memo: Memo<u32, String> = Memo::new("test");
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            "value".to_string()
        };
        assert_eq!(memo.get_or_compute(&1, compute), "value");
        assert_eq!(memo.get_or_compute(&1, compute), "value");
        assert_eq!(calls.get(), 1);
        assert!(memo.is_cached(&1));
    }

    #[test]
    fn test_key_change_replaces_slot() {
        let memo: Memo<(u32, &str), u32> = Memo::new("test");
        assert_eq!(memo.get_or_compute(&(1, "revenue"), || 10), 10);
        assert_eq!(memo.get_or_compute(&(1, "spend"), || 20), 20);
        assert!(!memo.is_cached(&(1, "revenue")));
        // Only the latest key is kept.
        assert_eq!(memo.get_or_compute(&(1, "revenue"), || 30), 30);
    }

    #[test]
    fn test_invalidate() {
        let memo: Memo<u8, u8> = Memo::new("test");
        memo.get_or_compute(&1, || 1);
        memo.invalidate();
        assert!(!memo.is_cached(&1));
        assert_eq!(memo.get_or_compute(&1, || 2), 2);
    }
}

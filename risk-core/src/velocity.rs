//! Sliding-window velocity tracking
//!
//! Per-key request timestamp histories pruned lazily on access. Two
//! independent instances exist at runtime, one keyed by IP and one by
//! device id.

use dashmap::DashMap;

/// Per-key sliding-window request counter
pub struct VelocityTracker {
    window_ms: i64,
    max_keys: usize,
    hits: DashMap<String, Vec<i64>>,
}

impl VelocityTracker {
    /// Create a tracker with the given window. `max_keys` caps the
    /// number of tracked keys; exceeding it triggers a sweep of keys
    /// whose entire history has expired.
    pub fn new(window_ms: i64, max_keys: usize) -> Self {
        Self {
            window_ms,
            max_keys,
            hits: DashMap::new(),
        }
    }

    /// Record a request for `key` at `now_ms` and return the number of
    /// requests within the trailing window, including this one.
    ///
    /// Prune and append happen under the entry guard, so concurrent
    /// calls on the same key observe a serializable ordering.
    pub fn record(&self, key: &str, now_ms: i64) -> usize {
        let cutoff = now_ms - self.window_ms;
        let count = {
            let mut entry = self.hits.entry(key.to_string()).or_default();
            let history = entry.value_mut();
            history.retain(|&t| t >= cutoff);
            history.push(now_ms);
            history.len()
        };

        if self.hits.len() > self.max_keys {
            self.sweep(now_ms);
        }

        count
    }

    /// Drop keys whose newest entry is older than the window
    fn sweep(&self, now_ms: i64) {
        let cutoff = now_ms - self.window_ms;
        self.hits
            .retain(|_, history| history.last().map_or(false, |&t| t >= cutoff));
    }

    /// Number of currently tracked keys
    pub fn tracked_keys(&self) -> usize {
        self.hits.len()
    }
}

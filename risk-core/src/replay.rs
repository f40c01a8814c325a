//! Replay protection for signed telemetry
//!
//! Keyed by `sessionId:signature`. A key seen again within the window
//! is a replay; entries older than the window are treated as
//! first-seen and re-recorded.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Replay cache tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// How long a recorded signature counts as a replay
    pub window_ms: i64,

    /// Entry-count cap; crossing it triggers a sweep of expired entries
    pub max_entries: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            window_ms: 5 * 60 * 1000,
            max_entries: 10_000,
        }
    }
}

/// In-memory replay cache
pub struct ReplayCache {
    config: ReplayConfig,
    seen: DashMap<String, i64>,
}

impl ReplayCache {
    /// Create a cache with the given tuning
    pub fn new(config: ReplayConfig) -> Self {
        Self {
            config,
            seen: DashMap::new(),
        }
    }

    /// Returns true when the pair was already recorded within the
    /// window. Otherwise records it (first sighting, or an expired
    /// entry being refreshed) and returns false.
    pub fn check_and_record(&self, session_id: &str, signature: &str, now_ms: i64) -> bool {
        let key = format!("{}:{}", session_id, signature);

        let replayed = match self.seen.entry(key) {
            Entry::Occupied(mut entry) => {
                if now_ms - *entry.get() <= self.config.window_ms {
                    true
                } else {
                    entry.insert(now_ms);
                    false
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(now_ms);
                false
            }
        };

        if !replayed && self.seen.len() > self.config.max_entries {
            self.sweep(now_ms);
        }

        replayed
    }

    /// Drop entries older than the window
    fn sweep(&self, now_ms: i64) {
        self.seen
            .retain(|_, first_seen| now_ms - *first_seen <= self.config.window_ms);
    }

    /// Number of recorded entries
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

impl Default for ReplayCache {
    fn default() -> Self {
        Self::new(ReplayConfig::default())
    }
}

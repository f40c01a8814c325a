//! Device/IP correlation tracking
//!
//! Maintains a time-windowed bipartite relation between device ids and
//! IPs. A device hopping across many IPs suggests a proxy pool; an IP
//! fronting many devices suggests a device farm.

use dashmap::DashMap;
use std::collections::HashMap;

/// Post-insertion cardinalities for one observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationCounts {
    /// Distinct IPs seen for the device within the window
    pub unique_ips_for_device: usize,
    /// Distinct devices seen for the IP within the window
    pub unique_devices_for_ip: usize,
}

type SideMap = DashMap<String, HashMap<String, Vec<i64>>>;

/// Time-windowed device<->IP relation
pub struct CorrelationTracker {
    window_ms: i64,
    max_keys: usize,
    device_to_ips: SideMap,
    ip_to_devices: SideMap,
}

impl CorrelationTracker {
    /// Create a tracker with the given lookback window and outer-key cap
    pub fn new(window_ms: i64, max_keys: usize) -> Self {
        Self {
            window_ms,
            max_keys,
            device_to_ips: DashMap::new(),
            ip_to_devices: DashMap::new(),
        }
    }

    /// Record a (device, ip) observation at `now_ms`: prune both sides
    /// to the window, insert the observation, and return the
    /// post-insertion unique counts.
    pub fn record(&self, device_id: &str, ip: &str, now_ms: i64) -> CorrelationCounts {
        let cutoff = now_ms - self.window_ms;

        let unique_ips_for_device =
            Self::touch(&self.device_to_ips, device_id, ip, now_ms, cutoff);
        let unique_devices_for_ip =
            Self::touch(&self.ip_to_devices, ip, device_id, now_ms, cutoff);

        if self.device_to_ips.len() > self.max_keys {
            Self::sweep(&self.device_to_ips, cutoff);
        }
        if self.ip_to_devices.len() > self.max_keys {
            Self::sweep(&self.ip_to_devices, cutoff);
        }

        CorrelationCounts {
            unique_ips_for_device,
            unique_devices_for_ip,
        }
    }

    /// Prune one side's inner map, insert the observation, and return
    /// the resulting cardinality. Runs under the outer entry guard so
    /// prune and insert are atomic per key.
    fn touch(map: &SideMap, outer: &str, inner: &str, now_ms: i64, cutoff: i64) -> usize {
        let mut entry = map.entry(outer.to_string()).or_default();
        let relations = entry.value_mut();
        relations.retain(|_, timestamps| {
            timestamps.retain(|&t| t >= cutoff);
            !timestamps.is_empty()
        });
        relations.entry(inner.to_string()).or_default().push(now_ms);
        relations.len()
    }

    /// Drop outer keys whose relations have all expired
    fn sweep(map: &SideMap, cutoff: i64) {
        map.retain(|_, relations| {
            relations
                .values()
                .any(|timestamps| timestamps.last().map_or(false, |&t| t >= cutoff))
        });
    }

    /// Number of tracked devices
    pub fn tracked_devices(&self) -> usize {
        self.device_to_ips.len()
    }

    /// Number of tracked IPs
    pub fn tracked_ips(&self) -> usize {
        self.ip_to_devices.len()
    }
}

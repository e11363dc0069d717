// In-memory response cache with per-endpoint TTLs.
// Keys are derived from the endpoint path plus its query parameters sorted
// by name, so semantically identical requests collide on the same entry.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::types::CachedPayload;

/// TTL for the frequently-changing overview summary.
pub const OVERVIEW_TTL: Duration = Duration::from_secs(30);
/// TTL for timeline series.
pub const TIMELINE_TTL: Duration = Duration::from_secs(60);
/// TTL for country/device breakdowns.
pub const BREAKDOWN_TTL: Duration = Duration::from_secs(5 * 60);
/// TTL for single-day details.
pub const DETAILS_TTL: Duration = Duration::from_secs(5 * 60);
/// TTL for the LTV summary.
pub const LTV_OVERVIEW_TTL: Duration = Duration::from_secs(2 * 60);
/// TTL for grouped LTV rows.
pub const LTV_TTL: Duration = Duration::from_secs(5 * 60);

/// One cached response.
#[derive(Debug, Clone)]
struct CacheEntry {
    payload: CachedPayload,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// An entry is valid iff `now - stored_at <= ttl`.
    fn is_valid(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) <= self.ttl
    }
}

/// Derive a cache key from an endpoint path and its query parameters.
/// Parameters are sorted by name before concatenation so parameter order
/// never produces distinct keys.
pub fn cache_key(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by_key(|(name, _)| *name);
    let query: Vec<String> = sorted
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect();
    format!("{}?{}", path, query.join("&"))
}

/// Process-local response cache, owned by the API client.
///
/// The mutex makes check-expiry-then-delete and miss-then-store sequences
/// atomic with respect to concurrent fetch tasks.
#[derive(Debug, Default)]
pub struct ApiCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ApiCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a live entry, evicting it if it has expired.
    pub fn get(&self, key: &str) -> Option<CachedPayload> {
        let mut entries = self.entries.lock().unwrap();
        let now = Instant::now();
        match entries.get(key) {
            Some(entry) if entry.is_valid(now) => Some(entry.payload.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a payload under `key`, replacing any previous entry.
    pub fn set(&self, key: &str, payload: CachedPayload, ttl: Duration) {
        let entry = CacheEntry {
            payload,
            stored_at: Instant::now(),
            ttl,
        };
        self.entries.lock().unwrap().insert(key.to_string(), entry);
    }

    /// Clear one entry, or everything when `key` is `None`.
    pub fn clear(&self, key: Option<&str>) {
        let mut entries = self.entries.lock().unwrap();
        match key {
            Some(key) => {
                entries.remove(key);
            }
            None => entries.clear(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Shift an entry's store time into the past (test hook).
    #[cfg(test)]
    fn backdate(&self, key: &str, by: Duration) {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.get_mut(key) {
            entry.stored_at -= by;
        }
    }
}

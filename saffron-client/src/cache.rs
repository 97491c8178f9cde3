//! Cache version service
//!
//! Explicit, injectable replacement for module-level version counters.
//! Collaborators bump a key after a mutation (e.g. a menu item photo
//! upload) and readers append the version to cache-busted URLs or use it
//! to decide whether a cached snapshot is stale.

use dashmap::DashMap;
use std::sync::Arc;

/// Monotonic per-key version counters
#[derive(Debug, Clone, Default)]
pub struct CacheVersionService {
    versions: Arc<DashMap<String, u64>>,
}

impl CacheVersionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the version for a key and return the new value
    pub fn bump(&self, key: &str) -> u64 {
        let mut entry = self.versions.entry(key.to_string()).or_insert(0);
        *entry += 1;
        tracing::debug!(key, version = *entry, "cache version bumped");
        *entry
    }

    /// Current version for a key (0 if never bumped)
    pub fn version(&self, key: &str) -> u64 {
        self.versions.get(key).map(|v| *v).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_start_at_zero() {
        let cache = CacheVersionService::new();
        assert_eq!(cache.version("menu"), 0);
    }

    #[test]
    fn test_bump_is_monotonic_per_key() {
        let cache = CacheVersionService::new();
        assert_eq!(cache.bump("menu"), 1);
        assert_eq!(cache.bump("menu"), 2);
        assert_eq!(cache.bump("photos"), 1);
        assert_eq!(cache.version("menu"), 2);
        assert_eq!(cache.version("photos"), 1);
    }

    #[test]
    fn test_clones_share_state() {
        let cache = CacheVersionService::new();
        let other = cache.clone();
        cache.bump("menu");
        assert_eq!(other.version("menu"), 1);
    }
}

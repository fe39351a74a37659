use crate::domain::ports::SessionCache;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;

pub const DEFAULT_SESSION: &str = "default";

/// Key under which a session's generated items for `topic` are stored.
pub fn cache_key(session: &str, topic: &str) -> String {
    format!(
        "{}/custom-items/{}",
        urlencoding::encode(session),
        urlencoding::encode(topic)
    )
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    stored_at: DateTime<Utc>,
}

/// In-process session cache. Entries live as long as the process; nothing is evicted.
#[derive(Debug, Default)]
pub struct MemorySessionCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored_at(&self, key: &str) -> Option<DateTime<Utc>> {
        let entries = self.entries.read().ok()?;
        entries.get(key).map(|entry| entry.stored_at)
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionCache for MemorySessionCache {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().ok()?;
        entries.get(key).map(|entry| entry.value.clone())
    }

    fn set(&self, key: &str, value: String) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.insert(
                    key.to_string(),
                    CacheEntry {
                        value,
                        stored_at: Utc::now(),
                    },
                );
            }
            Err(e) => tracing::error!("❌ Session cache lock poisoned, entry not stored: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let cache = MemorySessionCache::new();
        let key = cache_key(DEFAULT_SESSION, "Space");
        assert!(cache.get(&key).is_none());

        cache.set(&key, "[\"Moon\"]".to_string());
        assert_eq!(cache.get(&key).as_deref(), Some("[\"Moon\"]"));
        assert!(cache.stored_at(&key).is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_overwrites() {
        let cache = MemorySessionCache::new();
        cache.set("k", "first".to_string());
        cache.set("k", "second".to_string());
        assert_eq!(cache.get("k").as_deref(), Some("second"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_are_scoped_by_session_and_encoded() {
        assert_ne!(cache_key("a", "Space"), cache_key("b", "Space"));
        assert_eq!(
            cache_key("default", "Outer Space/Planets"),
            "default/custom-items/Outer%20Space%2FPlanets"
        );
        // 主題名稱中的斜線不能跟 session 混淆
        assert_ne!(cache_key("a/custom-items", "b"), cache_key("a", "custom-items/b"));
    }
}

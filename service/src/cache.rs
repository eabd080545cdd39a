use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// bounded TTL map from account id to a resolved identity; the explicit
/// replacement for the ambient per-process user map the auth layer once kept
#[derive(Debug)]
pub struct IdentityCache<V> {
    capacity: usize,
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V: Clone> IdentityCache<V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().unwrap();
        if let Some(entry) = entries.get(key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return Some(entry.value.clone());
            }
            entries.remove(key);
        }
        None
    }

    pub fn put(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= self.capacity && !entries.contains_key(&key) {
            let ttl = self.ttl;
            entries.retain(|_, e| e.inserted_at.elapsed() < ttl);
            if entries.len() >= self.capacity {
                // still full of live entries: drop the oldest one
                if let Some(oldest) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.inserted_at)
                    .map(|(k, _)| k.clone())
                {
                    entries.remove(&oldest);
                }
            }
        }
        entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl_miss_after() {
        let cache = IdentityCache::new(4, Duration::from_millis(20));
        cache.put("u1", 7);
        assert_eq!(cache.get("u1"), Some(7));

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get("u1"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn capacity_is_bounded() {
        let cache = IdentityCache::new(2, Duration::from_secs(60));
        cache.put("u1", 1);
        std::thread::sleep(Duration::from_millis(2));
        cache.put("u2", 2);
        std::thread::sleep(Duration::from_millis(2));
        cache.put("u3", 3);

        assert_eq!(cache.len(), 2);
        // the oldest entry made room
        assert_eq!(cache.get("u1"), None);
        assert_eq!(cache.get("u3"), Some(3));
    }

    #[test]
    fn reinsert_refreshes_instead_of_evicting() {
        let cache = IdentityCache::new(2, Duration::from_secs(60));
        cache.put("u1", 1);
        cache.put("u2", 2);
        cache.put("u2", 22);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("u1"), Some(1));
        assert_eq!(cache.get("u2"), Some(22));
    }
}

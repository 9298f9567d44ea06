use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;

/// Best-effort expiring projection cache.
///
/// Stores key → (value, inserted-at) and serves reads only while the entry
/// is younger than the configured time-to-live. Writers must invalidate by
/// key; a stale read is tolerated, a stale write never happens through here.
/// Carries no correctness contract.
pub struct Cache<K, V> {
    ttl: Duration,
    map: Mutex<HashMap<K, (V, Instant)>>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            map: Mutex::new(HashMap::new()),
        }
    }
    /// Returns the cached value if present and unexpired.
    /// Expired entries are evicted on the way out.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut map = self.map.lock().expect("cache lock");
        match map.get(key) {
            Some((value, at)) if at.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                map.remove(key);
                None
            }
            None => None,
        }
    }
    pub fn put(&self, key: K, value: V) {
        let mut map = self.map.lock().expect("cache lock");
        map.insert(key, (value, Instant::now()));
    }
    /// Drop a single entry. Called from every write path that touches
    /// the underlying record.
    pub fn invalidate(&self, key: &K) {
        let mut map = self.map.lock().expect("cache lock");
        map.remove(key);
    }
    pub fn clear(&self) {
        let mut map = self.map.lock().expect("cache lock");
        map.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_within_ttl() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.put("k", 1);
        assert_eq!(cache.get(&"k"), Some(1));
    }
    #[test]
    fn miss_when_absent() {
        let cache: Cache<&str, i32> = Cache::new(Duration::from_secs(60));
        assert_eq!(cache.get(&"k"), None);
    }
    #[test]
    fn expires_after_ttl() {
        let cache = Cache::new(Duration::from_millis(5));
        cache.put("k", 1);
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(cache.get(&"k"), None);
    }
    #[test]
    fn invalidate_drops_entry() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.put("k", 1);
        cache.invalidate(&"k");
        assert_eq!(cache.get(&"k"), None);
    }
    #[test]
    fn clear_drops_everything() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.put("k", 1);
        cache.put("l", 2);
        cache.clear();
        assert_eq!(cache.get(&"k"), None);
        assert_eq!(cache.get(&"l"), None);
    }
    #[test]
    fn put_overwrites() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.put("k", 1);
        cache.put("k", 2);
        assert_eq!(cache.get(&"k"), Some(2));
    }
}

//! Named-cache registry.
//!
//! Every cache is one JSON document plus bookkeeping: when it was written
//! and how long it stays valid. [`CacheRegistry::get`] purges expired
//! entries as it reads; [`CacheRegistry::status`] observes without touching
//! anything.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use metrics::counter;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::warn;

/// Lifetime applied when [`CacheRegistry::set`] has to register a name on
/// the fly.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

const METRIC_CACHE_HIT: &str = "piatto_cache_hit_total";
const METRIC_CACHE_MISS: &str = "piatto_cache_miss_total";
const METRIC_CACHE_EXPIRED: &str = "piatto_cache_expired_total";
const METRIC_CACHE_STORE: &str = "piatto_cache_store_total";

/// Process-wide registry of named caches.
///
/// Constructed once at startup and shared behind an `Arc`; there is no
/// global instance. Operations never fail: an unknown name reads as a miss
/// and writes are best-effort.
pub struct CacheRegistry {
    caches: RwLock<HashMap<String, CacheSlot>>,
    default_ttl: Duration,
}

struct CacheSlot {
    ttl: Duration,
    filled: Option<FilledSlot>,
}

struct FilledSlot {
    value: Value,
    stored_at: Instant,
}

impl FilledSlot {
    fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }
}

impl CacheSlot {
    fn empty(ttl: Duration) -> Self {
        Self { ttl, filled: None }
    }

    fn status(&self) -> CacheStatus {
        let age = self.filled.as_ref().map(FilledSlot::age);
        let is_expired = match age {
            Some(age) => age >= self.ttl,
            None => true,
        };
        let expires_in = match age {
            Some(age) if !is_expired => self.ttl - age,
            _ => Duration::ZERO,
        };

        CacheStatus {
            exists: true,
            has_data: self.filled.is_some(),
            age: age.map(duration_ms),
            duration: duration_ms(self.ttl),
            is_expired,
            expires_in: duration_ms(expires_in),
        }
    }
}

/// Point-in-time view of one cache. Durations are milliseconds.
///
/// `has_data` reports whether a value is physically present, so an expired
/// entry that `get` has not purged yet still shows `has_data: true` with
/// `is_expired: true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub exists: bool,
    pub has_data: bool,
    pub age: Option<u64>,
    pub duration: u64,
    pub is_expired: bool,
    pub expires_in: u64,
}

impl CacheStatus {
    fn missing() -> Self {
        Self {
            exists: false,
            has_data: false,
            age: None,
            duration: 0,
            is_expired: true,
            expires_in: 0,
        }
    }
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::with_default_ttl(DEFAULT_TTL)
    }

    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            caches: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Register `name` with the given lifetime.
    ///
    /// Registering an existing name resets it to empty under the new
    /// lifetime.
    pub fn register(&self, name: &str, ttl: Duration) {
        let mut caches = self.write_caches("register");
        caches.insert(name.to_string(), CacheSlot::empty(ttl));
    }

    /// Fetch the value under `name` while it is still fresh.
    ///
    /// A value is fresh strictly before its lifetime elapses; at the
    /// boundary it is expired, purged here, and read as a miss. Unknown
    /// names are a miss as well, never an error.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut caches = self.write_caches("get");
        let Some(slot) = caches.get_mut(name) else {
            counter!(METRIC_CACHE_MISS, "cache" => name.to_string()).increment(1);
            return None;
        };

        let fresh = match &slot.filled {
            Some(filled) => filled.age() < slot.ttl,
            None => {
                counter!(METRIC_CACHE_MISS, "cache" => name.to_string()).increment(1);
                return None;
            }
        };

        if !fresh {
            slot.filled = None;
            counter!(METRIC_CACHE_EXPIRED, "cache" => name.to_string()).increment(1);
            return None;
        }

        counter!(METRIC_CACHE_HIT, "cache" => name.to_string()).increment(1);
        slot.filled.as_ref().map(|filled| filled.value.clone())
    }

    /// Store `value` under `name`, stamping it with the current time.
    ///
    /// Unknown names are registered on the fly with the default lifetime;
    /// known names keep the lifetime they were registered with.
    pub fn set(&self, name: &str, value: Value) {
        let mut caches = self.write_caches("set");
        let slot = caches
            .entry(name.to_string())
            .or_insert_with(|| CacheSlot::empty(self.default_ttl));
        slot.filled = Some(FilledSlot {
            value,
            stored_at: Instant::now(),
        });
        counter!(METRIC_CACHE_STORE, "cache" => name.to_string()).increment(1);
    }

    /// Drop the value under `name`. The registration and its lifetime
    /// survive; unknown names are a no-op.
    pub fn clear(&self, name: &str) {
        let mut caches = self.write_caches("clear");
        if let Some(slot) = caches.get_mut(name) {
            slot.filled = None;
        }
    }

    /// Drop every cached value. Registrations survive.
    pub fn clear_all(&self) {
        let mut caches = self.write_caches("clear_all");
        for slot in caches.values_mut() {
            slot.filled = None;
        }
    }

    /// Observe the state of `name` without touching it.
    ///
    /// Expired entries stay in place; only [`CacheRegistry::get`] purges.
    pub fn status(&self, name: &str) -> CacheStatus {
        let caches = self.read_caches("status");
        match caches.get(name) {
            Some(slot) => slot.status(),
            None => CacheStatus::missing(),
        }
    }

    /// Status of every registered cache, keyed by name.
    pub fn status_report(&self) -> BTreeMap<String, CacheStatus> {
        let caches = self.read_caches("status_report");
        caches
            .iter()
            .map(|(name, slot)| (name.clone(), slot.status()))
            .collect()
    }

    /// Typed read: deserialize the cached document into `T`.
    ///
    /// A document that no longer decodes as `T` is dropped and read as a
    /// miss, so the caller refetches instead of failing.
    pub fn get_json<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let value = self.get(name)?;
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(error) => {
                warn!(
                    cache = name,
                    %error,
                    "Cached document failed to deserialize; treating as miss"
                );
                self.clear(name);
                None
            }
        }
    }

    /// Typed write: serialize `value` and store it under `name`.
    ///
    /// Serialization failures skip the write. The cache is best-effort and
    /// never surfaces errors to its callers.
    pub fn set_json<T: Serialize>(&self, name: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(encoded) => self.set(name, encoded),
            Err(error) => {
                warn!(
                    cache = name,
                    %error,
                    "Value failed to serialize for caching; skipping store"
                );
            }
        }
    }

    #[cfg(test)]
    fn backdate(&self, name: &str, by: Duration) {
        let mut caches = self.write_caches("backdate");
        if let Some(filled) = caches.get_mut(name).and_then(|slot| slot.filled.as_mut()) {
            if let Some(earlier) = filled.stored_at.checked_sub(by) {
                filled.stored_at = earlier;
            }
        }
    }

    fn read_caches(&self, op: &'static str) -> RwLockReadGuard<'_, HashMap<String, CacheSlot>> {
        match self.caches.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(
                    op,
                    lock_kind = "rwlock.read",
                    result = "poisoned_recovered",
                    hint = "state may be stale after panic in another thread",
                    "Recovered from poisoned cache lock"
                );
                poisoned.into_inner()
            }
        }
    }

    fn write_caches(&self, op: &'static str) -> RwLockWriteGuard<'_, HashMap<String, CacheSlot>> {
        match self.caches.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(
                    op,
                    lock_kind = "rwlock.write",
                    result = "poisoned_recovered",
                    hint = "state may be stale after panic in another thread",
                    "Recovered from poisoned cache lock"
                );
                poisoned.into_inner()
            }
        }
    }
}

impl Default for CacheRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

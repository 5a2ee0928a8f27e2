use crate::builder::{validate_ttl, CacheBuilder, CacheConfig};
use crate::error::{CacheError, ConfigError};
use crate::filter::{KeyFilter, KeyText};
use crate::listener::{DeleteCallback, EvictionReason, GetCallback, SetCallback};
use crate::policy::EvictionPolicy;
use crate::stats::{Stats, StatsTracker};
use crate::store::EntryStore;
use crate::time::{self, Timer};

use core::fmt;
use std::hash::Hash;
use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

/// The instance-level fallback for `get` misses.
pub(crate) enum DefaultValue<K, V> {
  /// Returned as-is, never stored.
  Static(Arc<V>),
  /// Invoked with the key; the result is stored via `set`, then returned.
  Computed(Arc<dyn Fn(&K) -> V + Send + Sync>),
}

/// State guarded by the engine lock. Every mutation of the entry store, the
/// expiration index, or the policy index goes through this struct, which is
/// what linearizes concurrent callers.
struct CacheInner<K, V> {
  store: EntryStore<K, V>,
  policy: Box<dyn EvictionPolicy<K>>,
  maxsize: u64,
  ttl: f64,
  timer: Timer,
}

/// An entry removed under the lock, queued so the delete callback runs
/// after the lock is released.
struct Removal<K, V> {
  key: K,
  value: Arc<V>,
  reason: EvictionReason,
}

/// A thread-safe, bounded, optionally-expiring key/value cache.
///
/// One mutex guards all internal state; operations from multiple threads
/// are linearized by it. Values are stored as `Arc<V>`, so reads hand out
/// shared ownership without requiring `V: Clone` -- the returned handle
/// aliases the cached value, while collection accessors (`keys`, `values`,
/// `items`) return snapshots safe to iterate without the lock.
///
/// Expiration is lazy: an expired entry is removed when it is next read or
/// when `delete_expired`/`evict` runs, never by a background task.
pub struct Cache<K, V> {
  inner: Mutex<CacheInner<K, V>>,
  stats: StatsTracker,
  default: Option<DefaultValue<K, V>>,
  on_delete: Option<DeleteCallback<K, V>>,
  on_set: Option<SetCallback<K, V>>,
  on_get: Option<GetCallback<K>>,
}

impl<K, V> fmt::Debug for Cache<K, V>
where
  K: Eq + Hash + Clone + Send,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let inner = self.inner.lock();
    f.debug_struct("Cache")
      .field("len", &inner.store.len())
      .field("maxsize", &inner.maxsize)
      .field("ttl", &inner.ttl)
      .finish_non_exhaustive()
  }
}

impl<K, V> Cache<K, V>
where
  K: Eq + Hash + Clone + Send + 'static,
  V: Send + Sync + 'static,
{
  /// Creates a cache with default settings (FIFO, maxsize 300, no TTL).
  pub fn new() -> Self {
    Self::from_builder(CacheBuilder::new())
  }

  /// Returns a builder for a customized cache.
  pub fn builder() -> CacheBuilder<K, V> {
    CacheBuilder::new()
  }

  pub(crate) fn from_builder(builder: CacheBuilder<K, V>) -> Self {
    Self {
      inner: Mutex::new(CacheInner {
        store: EntryStore::new(),
        policy: builder.policy.build(),
        maxsize: builder.maxsize,
        ttl: builder.ttl,
        timer: builder.timer.unwrap_or_else(time::default_timer),
      }),
      stats: StatsTracker::new(builder.stats_enabled),
      default: builder.default,
      on_delete: builder.on_delete,
      on_set: builder.on_set,
      on_get: builder.on_get,
    }
  }
}

impl<K, V> Default for Cache<K, V>
where
  K: Eq + Hash + Clone + Send + 'static,
  V: Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<K, V> Cache<K, V>
where
  K: Eq + Hash + Clone + Send,
  V: Send + Sync,
{
  // --- Reads ---

  /// Returns the live value for `key`, or resolves the configured default.
  ///
  /// A hit may reorder the eviction queue, depending on the policy. On a
  /// miss, a computed default is invoked with the key and its result stored
  /// via `set` before being returned; a static default is returned without
  /// being stored. An expired entry is removed in place and treated as a
  /// miss.
  pub fn get(&self, key: &K) -> Option<Arc<V>> {
    if let Some(value) = self.lookup(key) {
      return Some(value);
    }
    match &self.default {
      Some(DefaultValue::Computed(f)) => {
        let value = Arc::new(f(key));
        self.set_entry(key.clone(), value.clone(), None);
        Some(value)
      }
      Some(DefaultValue::Static(value)) => Some(value.clone()),
      None => None,
    }
  }

  /// Like `get`, but returns `default` on a miss instead of the instance
  /// default. The per-call default is not stored.
  pub fn get_or(&self, key: &K, default: V) -> Arc<V> {
    self.lookup(key).unwrap_or_else(|| Arc::new(default))
  }

  /// Like `get`, but on a miss computes the value, stores it via `set`,
  /// and returns it. The engine lock is not held while `f` runs.
  pub fn get_or_insert_with(&self, key: K, f: impl FnOnce(&K) -> V) -> Arc<V> {
    if let Some(value) = self.lookup(&key) {
      return value;
    }
    let value = Arc::new(f(&key));
    self.set_entry(key, value.clone(), None);
    value
  }

  /// Applies `filter` to the current keys and returns every entry that
  /// resolves via `get`.
  pub fn get_many(&self, filter: &KeyFilter<K>) -> Vec<(K, Arc<V>)>
  where
    K: KeyText,
  {
    let keys = self.keys();
    keys
      .into_iter()
      .filter(|key| filter.matches(key))
      .filter_map(|key| self.get(&key).map(|value| (key, value)))
      .collect()
  }

  /// Whether `key` holds a live value.
  ///
  /// Unlike `get`, this never counts toward hit/miss statistics and never
  /// reorders the eviction queue. An expired entry is still removed in
  /// place.
  pub fn has(&self, key: &K) -> bool {
    let mut removals = Vec::new();
    let mut present = false;
    {
      let mut inner = self.inner.lock();
      let now = (inner.timer)();
      if inner.store.expired_at(key, now) {
        Self::remove_locked(&mut inner, key, EvictionReason::Expired, &mut removals);
      } else {
        present = inner.store.contains(key);
      }
    }
    self.stats.add_evictions(removals.len() as u64);
    self.fire_removals(removals);
    present
  }

  // --- Writes ---

  /// Inserts or replaces an entry, using the cache's default TTL.
  ///
  /// Replacing always overwrites both the value and the TTL and moves the
  /// key to the freshest eviction position. Inserting a new key into a full
  /// cache evicts first (expired entries, then policy victims).
  pub fn set(&self, key: K, value: V) {
    self.set_entry(key, Arc::new(value), None);
  }

  /// Like `set` with an explicit TTL in seconds. A TTL of `0` makes the
  /// entry non-expiring, overriding the cache default.
  pub fn set_with_ttl(&self, key: K, value: V, ttl: f64) -> Result<(), ConfigError> {
    validate_ttl(ttl)?;
    self.set_entry(key, Arc::new(value), Some(ttl));
    Ok(())
  }

  /// Sets multiple entries with the default TTL.
  pub fn set_many(&self, items: impl IntoIterator<Item = (K, V)>) {
    for (key, value) in items {
      self.set(key, value);
    }
  }

  /// Inserts only if `key` does not hold a live value; a no-op otherwise,
  /// preserving the existing value and TTL. The liveness check and the
  /// insert are one atomic step under the engine lock.
  pub fn add(&self, key: K, value: V) {
    self.add_entry(key, Arc::new(value), None);
  }

  /// Like `add` with an explicit TTL in seconds.
  pub fn add_with_ttl(&self, key: K, value: V, ttl: f64) -> Result<(), ConfigError> {
    validate_ttl(ttl)?;
    self.add_entry(key, Arc::new(value), Some(ttl));
    Ok(())
  }

  /// Adds multiple entries; existing live keys are left untouched.
  pub fn add_many(&self, items: impl IntoIterator<Item = (K, V)>) {
    for (key, value) in items {
      self.add(key, value);
    }
  }

  // --- Deletes ---

  /// Removes `key`, returning `1` if it was present, else `0`.
  pub fn delete(&self, key: &K) -> usize {
    let mut removals = Vec::new();
    let removed = {
      let mut inner = self.inner.lock();
      Self::remove_locked(&mut inner, key, EvictionReason::Invalidated, &mut removals)
    };
    self.fire_removals(removals);
    usize::from(removed)
  }

  /// Removes every key selected by `filter`, returning the removal count.
  pub fn delete_many(&self, filter: &KeyFilter<K>) -> usize
  where
    K: KeyText,
  {
    let keys = self.keys();
    keys
      .into_iter()
      .filter(|key| filter.matches(key))
      .map(|key| self.delete(&key))
      .sum()
  }

  /// Removes every entry whose recorded expiry is at or before a single
  /// "now" timestamp taken at the start of the sweep, returning the count.
  pub fn delete_expired(&self) -> usize {
    let mut removals = Vec::new();
    let count = {
      let mut inner = self.inner.lock();
      Self::sweep_expired_locked(&mut inner, &mut removals)
    };
    if count > 0 {
      debug!("swept {count} expired entries");
    }
    self.stats.add_evictions(count as u64);
    self.fire_removals(removals);
    count
  }

  /// Runs the eviction pass: removes all expired entries, then policy
  /// victims while the cache is at or over `maxsize`. With `maxsize` of
  /// `0` only expired entries are removed. Returns the removal count.
  pub fn evict(&self) -> usize {
    let mut removals = Vec::new();
    let count = {
      let mut inner = self.inner.lock();
      Self::evict_locked(&mut inner, &mut removals)
    };
    if count > 0 {
      debug!("evicted {count} entries");
    }
    self.stats.add_evictions(count as u64);
    self.fire_removals(removals);
    count
  }

  /// Removes and returns the policy's next eviction candidate, ignoring
  /// expiry entirely. Errors when the cache is empty. The entry is handed
  /// to the caller; the delete callback is not invoked.
  pub fn pop_next(&self) -> Result<(K, Arc<V>), CacheError> {
    let popped = {
      let mut inner = self.inner.lock();
      match inner.policy.next_candidate() {
        Some(key) => match inner.store.remove(&key) {
          Some(value) => {
            inner.policy.on_remove(&key);
            Some((key, value))
          }
          None => None,
        },
        None => None,
      }
    };
    popped.ok_or(CacheError::Empty)
  }

  /// Empties the entry store, the expiration index, and the policy index
  /// atomically. Per-entry delete callbacks are not invoked.
  pub fn clear(&self) {
    let mut inner = self.inner.lock();
    inner.store.clear();
    inner.policy.clear();
  }

  // --- Introspection ---

  /// Whether `key` has a recorded expiry at or before now.
  ///
  /// For a key with no recorded expiry this degenerates to "not present":
  /// it returns true iff the key is absent from the store. Callers wanting
  /// plain liveness should use `has`.
  pub fn expired(&self, key: &K) -> bool {
    let inner = self.inner.lock();
    let now = (inner.timer)();
    Self::expired_locked(&inner, key, now)
  }

  /// Like `expired`, evaluated at the supplied timestamp instead of now.
  pub fn expired_at(&self, key: &K, at: f64) -> bool {
    Self::expired_locked(&self.inner.lock(), key, at)
  }

  /// Snapshot of the expiration index: `(key, absolute expiry)` pairs.
  pub fn expirations(&self) -> Vec<(K, f64)> {
    self.inner.lock().store.expirations()
  }

  /// Whether the cache is bounded and at or over its bound. Always false
  /// when unbounded.
  pub fn full(&self) -> bool {
    let inner = self.inner.lock();
    inner.maxsize > 0 && inner.store.len() >= inner.maxsize as usize
  }

  pub fn len(&self) -> usize {
    self.inner.lock().store.len()
  }

  pub fn is_empty(&self) -> bool {
    self.inner.lock().store.is_empty()
  }

  /// Snapshot of the current keys, safe to iterate without the lock but
  /// possibly stale relative to concurrent mutators.
  pub fn keys(&self) -> Vec<K> {
    self.inner.lock().store.keys()
  }

  /// Snapshot of the current values. The handles alias the cached values.
  pub fn values(&self) -> Vec<Arc<V>> {
    self.inner.lock().store.values()
  }

  /// Snapshot of the current entries.
  pub fn items(&self) -> Vec<(K, Arc<V>)> {
    self.inner.lock().store.items()
  }

  /// The configured entry bound. `0` means unbounded.
  pub fn maxsize(&self) -> u64 {
    self.inner.lock().maxsize
  }

  /// The configured default TTL in seconds. `0` means no default expiry.
  pub fn ttl(&self) -> f64 {
    self.inner.lock().ttl
  }

  // --- Configuration & statistics ---

  /// Applies a runtime configuration. Validation happens before any state
  /// is touched; unset fields keep their current values. Shrinking
  /// `maxsize` below the current size trims the cache to the new bound
  /// (expired entries first, then policy victims).
  pub fn configure(&self, config: &CacheConfig) -> Result<(), ConfigError> {
    config.validate()?;
    let mut removals = Vec::new();
    let count = {
      let mut inner = self.inner.lock();
      if let Some(maxsize) = config.maxsize {
        inner.maxsize = maxsize;
      }
      if let Some(ttl) = config.ttl {
        inner.ttl = ttl;
      }
      if let Some(timer) = &config.timer {
        inner.timer = timer.clone();
      }
      let mut count = 0;
      if inner.maxsize > 0 && inner.store.len() > inner.maxsize as usize {
        count += Self::sweep_expired_locked(&mut inner, &mut removals);
        while inner.store.len() > inner.maxsize as usize {
          let candidate = match inner.policy.next_candidate() {
            Some(key) => key,
            None => break,
          };
          if !Self::remove_locked(&mut inner, &candidate, EvictionReason::Capacity, &mut removals) {
            break;
          }
          count += 1;
        }
      }
      count
    };
    match config.stats {
      Some(true) => self.stats.enable(),
      Some(false) => self.stats.disable(),
      None => {}
    }
    self.stats.add_evictions(count as u64);
    self.fire_removals(removals);
    Ok(())
  }

  /// A point-in-time statistics snapshot; `entry_count` is sampled now.
  pub fn stats(&self) -> Stats {
    let entry_count = self.len();
    self.stats.snapshot(entry_count)
  }

  /// The statistics tracker, for enable/disable/pause/resume/reset.
  pub fn stats_tracker(&self) -> &StatsTracker {
    &self.stats
  }

  // --- Internals ---

  /// The shared read path: returns the live value, recording hit/miss and
  /// policy access, removing an expired entry in place. Callbacks fire
  /// after the lock is released.
  fn lookup(&self, key: &K) -> Option<Arc<V>> {
    let mut removals = Vec::new();
    let mut value = None;
    {
      let mut inner = self.inner.lock();
      let now = (inner.timer)();
      if inner.store.expired_at(key, now) {
        Self::remove_locked(&mut inner, key, EvictionReason::Expired, &mut removals);
      } else if let Some(found) = inner.store.get(key).cloned() {
        inner.policy.on_get(key);
        value = Some(found);
      }
    }
    let found = value.is_some();
    if found {
      self.stats.record_hit();
    } else {
      self.stats.record_miss();
    }
    self.stats.add_evictions(removals.len() as u64);
    self.fire_removals(removals);
    if let Some(cb) = &self.on_get {
      cb(key, found);
    }
    value
  }

  pub(crate) fn set_entry(&self, key: K, value: Arc<V>, ttl_override: Option<f64>) {
    self.write_entry(key, value, ttl_override, false);
  }

  fn add_entry(&self, key: K, value: Arc<V>, ttl_override: Option<f64>) {
    self.write_entry(key, value, ttl_override, true);
  }

  /// The shared write path. Expiring a stale entry under the key, the
  /// only-if-absent liveness check, capacity eviction, and the insert all
  /// happen in one critical section, so `add` is an atomic
  /// check-and-insert: no completed `set` can be overwritten by it.
  fn write_entry(&self, key: K, value: Arc<V>, ttl_override: Option<f64>, only_if_absent: bool) {
    let mut removals = Vec::new();
    let written = {
      let mut inner = self.inner.lock();
      let now = (inner.timer)();
      if inner.store.expired_at(&key, now) {
        Self::remove_locked(&mut inner, &key, EvictionReason::Expired, &mut removals);
      }
      if only_if_absent && inner.store.contains(&key) {
        None
      } else {
        let is_new = !inner.store.contains(&key);
        if is_new && inner.maxsize > 0 && inner.store.len() >= inner.maxsize as usize {
          Self::evict_locked(&mut inner, &mut removals);
        }
        let old = inner.store.insert(key.clone(), value.clone());
        let ttl = ttl_override.unwrap_or(inner.ttl);
        if ttl > 0.0 {
          inner.store.set_expiry(key.clone(), now + ttl);
        } else {
          inner.store.clear_expiry(&key);
        }
        inner.policy.on_set(&key);
        Some(old)
      }
    };
    self.stats.add_evictions(removals.len() as u64);
    self.fire_removals(removals);
    if let Some(old) = written {
      if let Some(cb) = &self.on_set {
        cb(&key, old.as_ref(), &value);
      }
    }
  }

  fn remove_locked(
    inner: &mut CacheInner<K, V>,
    key: &K,
    reason: EvictionReason,
    removals: &mut Vec<Removal<K, V>>,
  ) -> bool {
    match inner.store.remove(key) {
      Some(value) => {
        inner.policy.on_remove(key);
        removals.push(Removal {
          key: key.clone(),
          value,
          reason,
        });
        true
      }
      None => false,
    }
  }

  /// One timestamp for the whole sweep, so expiry decisions stay consistent
  /// while time advances mid-sweep.
  fn sweep_expired_locked(inner: &mut CacheInner<K, V>, removals: &mut Vec<Removal<K, V>>) -> usize {
    let now = (inner.timer)();
    let mut count = 0;
    for key in inner.store.expired_keys(now) {
      if Self::remove_locked(inner, &key, EvictionReason::Expired, removals) {
        count += 1;
      }
    }
    count
  }

  fn evict_locked(inner: &mut CacheInner<K, V>, removals: &mut Vec<Removal<K, V>>) -> usize {
    let mut count = Self::sweep_expired_locked(inner, removals);
    if inner.maxsize > 0 {
      while inner.store.len() >= inner.maxsize as usize {
        let candidate = match inner.policy.next_candidate() {
          Some(key) => key,
          None => break,
        };
        if !Self::remove_locked(inner, &candidate, EvictionReason::Capacity, removals) {
          break;
        }
        count += 1;
      }
    }
    count
  }

  fn expired_locked(inner: &CacheInner<K, V>, key: &K, at: f64) -> bool {
    match inner.store.expiry(key) {
      Some(expiry) => expiry <= at,
      None => !inner.store.contains(key),
    }
  }

  fn fire_removals(&self, removals: Vec<Removal<K, V>>) {
    if let Some(cb) = &self.on_delete {
      for removal in removals {
        cb(&removal.key, &removal.value, removal.reason);
      }
    }
  }
}

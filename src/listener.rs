use std::fmt;
use std::sync::Arc;

/// Describes why an entry was removed from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
  /// The entry was removed to keep the cache within `maxsize`.
  Capacity,
  /// The entry was removed because its TTL expired.
  Expired,
  /// The entry was removed by an explicit `delete`.
  Invalidated,
}

impl fmt::Display for EvictionReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EvictionReason::Capacity => write!(f, "evicted due to capacity"),
      EvictionReason::Expired => write!(f, "evicted due to TTL expiration"),
      EvictionReason::Invalidated => write!(f, "manually deleted"),
    }
  }
}

/// Called after an entry is removed, with the removal cause.
///
/// Callbacks run on the mutating caller's thread after the engine lock has
/// been released, so they may freely call back into the cache.
pub type DeleteCallback<K, V> = Arc<dyn Fn(&K, &Arc<V>, EvictionReason) + Send + Sync>;

/// Called after `set`, with the replaced value (if any) and the new value.
pub type SetCallback<K, V> = Arc<dyn Fn(&K, Option<&Arc<V>>, &Arc<V>) + Send + Sync>;

/// Called after `get`, with whether the key held a live value.
pub type GetCallback<K> = Arc<dyn Fn(&K, bool) + Send + Sync>;

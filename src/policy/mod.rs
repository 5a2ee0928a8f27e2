pub mod fifo;
pub mod lfu;
pub mod lifo;
pub mod lru;
pub mod mru;
mod order;
#[cfg(feature = "random")]
pub mod random;

use std::hash::Hash;

/// A cache eviction policy.
///
/// The engine notifies the policy of every access and mutation so it can
/// maintain its own ordering (or frequency) index, and asks it for the next
/// eviction candidate when the cache is over capacity. All calls happen
/// under the engine lock, so implementations take `&mut self` and need no
/// interior locking of their own.
///
/// The engine guarantees that `on_remove` is called for every removal path
/// (explicit delete, eviction, expiration), so a policy's index never holds
/// keys that are no longer stored.
pub trait EvictionPolicy<K>: Send {
  /// Called when a live key is read via `get`.
  fn on_get(&mut self, _key: &K) {}

  /// Called when a key is inserted or replaced via `set`.
  fn on_set(&mut self, key: &K);

  /// Called when a key is removed, by any path.
  fn on_remove(&mut self, key: &K);

  /// The key that would be evicted next, without removing it.
  /// Returns `None` when the cache is empty.
  fn next_candidate(&self) -> Option<K>;

  /// Drops all tracked state.
  fn clear(&mut self);
}

/// The closed set of built-in eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
  /// First-in, first-out: evicts the oldest-inserted key. The default.
  Fifo,
  /// Last-in, first-out: evicts the newest-inserted key.
  Lifo,
  /// Evicts the least-recently-used key; `get` refreshes recency.
  Lru,
  /// Evicts the most-recently-used key; `get` refreshes recency.
  Mru,
  /// Evicts the key with the fewest accesses, ties broken by insertion
  /// order.
  Lfu,
  /// Evicts a uniformly random key.
  #[cfg(feature = "random")]
  Random,
}

impl Default for PolicyKind {
  fn default() -> Self {
    PolicyKind::Fifo
  }
}

impl PolicyKind {
  pub(crate) fn build<K>(self) -> Box<dyn EvictionPolicy<K>>
  where
    K: Eq + Hash + Clone + Send + 'static,
  {
    match self {
      PolicyKind::Fifo => Box::new(fifo::Fifo::new()),
      PolicyKind::Lifo => Box::new(lifo::Lifo::new()),
      PolicyKind::Lru => Box::new(lru::Lru::new()),
      PolicyKind::Mru => Box::new(mru::Mru::new()),
      PolicyKind::Lfu => Box::new(lfu::Lfu::new()),
      #[cfg(feature = "random")]
      PolicyKind::Random => Box::new(random::RandomPolicy::new()),
    }
  }
}

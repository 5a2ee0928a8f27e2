use std::collections::HashMap;
use std::hash::Hash;

use super::order::OrderList;
use super::EvictionPolicy;

/// Least-frequently-used eviction.
///
/// Tracks an access count per key in a separate frequency index. `get`
/// increments the count; `set` resets it to one, since a replaced entry is a
/// fresh insertion. The key with the lowest count is evicted first, ties
/// broken by insertion order. Membership tests go through the engine's
/// `has`, which never reaches the policy, so they do not affect counts.
#[derive(Debug)]
pub struct Lfu<K> {
  counts: HashMap<K, u64, ahash::RandomState>,
  order: OrderList<K>,
}

impl<K: Eq + Hash + Clone> Lfu<K> {
  pub fn new() -> Self {
    Self {
      counts: HashMap::default(),
      order: OrderList::new(),
    }
  }

  #[cfg(test)]
  pub(crate) fn access_count(&self, key: &K) -> u64 {
    self.counts.get(key).copied().unwrap_or(0)
  }
}

impl<K: Eq + Hash + Clone> Default for Lfu<K> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K> EvictionPolicy<K> for Lfu<K>
where
  K: Eq + Hash + Clone + Send,
{
  fn on_get(&mut self, key: &K) {
    if let Some(count) = self.counts.get_mut(key) {
      *count += 1;
    }
  }

  fn on_set(&mut self, key: &K) {
    self.counts.insert(key.clone(), 1);
    self.order.touch_back(key);
  }

  fn on_remove(&mut self, key: &K) {
    // Purge the frequency index on every removal path, else orphaned
    // counts accumulate and skew future selections.
    self.counts.remove(key);
    self.order.remove(key);
  }

  fn next_candidate(&self) -> Option<K> {
    let mut candidate: Option<(&K, u64)> = None;
    for key in self.order.iter() {
      let count = self.counts.get(key).copied().unwrap_or(0);
      // Strict comparison keeps the earliest-inserted key among ties.
      match candidate {
        Some((_, best)) if count >= best => {}
        _ => candidate = Some((key, count)),
      }
    }
    candidate.map(|(key, _)| key.clone())
  }

  fn clear(&mut self) {
    self.counts.clear();
    self.order.clear();
  }
}

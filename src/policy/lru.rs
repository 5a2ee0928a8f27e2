use super::order::OrderList;
use super::EvictionPolicy;

/// Least-recently-used eviction.
///
/// Both `get` and `set` move the key to the freshest position; the oldest
/// (least recently used) position is evicted first.
#[derive(Debug)]
pub struct Lru<K> {
  order: OrderList<K>,
}

impl<K: Eq + Clone> Lru<K> {
  pub fn new() -> Self {
    Self {
      order: OrderList::new(),
    }
  }
}

impl<K: Eq + Clone> Default for Lru<K> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K> EvictionPolicy<K> for Lru<K>
where
  K: Eq + Clone + Send,
{
  fn on_get(&mut self, key: &K) {
    self.order.touch_back(key);
  }

  fn on_set(&mut self, key: &K) {
    self.order.touch_back(key);
  }

  fn on_remove(&mut self, key: &K) {
    self.order.remove(key);
  }

  fn next_candidate(&self) -> Option<K> {
    self.order.front().cloned()
  }

  fn clear(&mut self) {
    self.order.clear();
  }
}

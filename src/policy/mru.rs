use super::order::OrderList;
use super::EvictionPolicy;

/// Most-recently-used eviction.
///
/// Same recency bookkeeping as LRU, but the freshest position is evicted
/// first.
#[derive(Debug)]
pub struct Mru<K> {
  order: OrderList<K>,
}

impl<K: Eq + Clone> Mru<K> {
  pub fn new() -> Self {
    Self {
      order: OrderList::new(),
    }
  }
}

impl<K: Eq + Clone> Default for Mru<K> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K> EvictionPolicy<K> for Mru<K>
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
    self.order.back().cloned()
  }

  fn clear(&mut self) {
    self.order.clear();
  }
}

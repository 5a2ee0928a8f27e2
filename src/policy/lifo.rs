use super::order::OrderList;
use super::EvictionPolicy;

/// Last-in, first-out eviction.
///
/// Same bookkeeping as FIFO, but the freshest position is evicted first:
/// the last key added is the first one removed.
#[derive(Debug)]
pub struct Lifo<K> {
  order: OrderList<K>,
}

impl<K: Eq + Clone> Lifo<K> {
  pub fn new() -> Self {
    Self {
      order: OrderList::new(),
    }
  }
}

impl<K: Eq + Clone> Default for Lifo<K> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K> EvictionPolicy<K> for Lifo<K>
where
  K: Eq + Clone + Send,
{
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

use super::order::OrderList;
use super::EvictionPolicy;

/// First-in, first-out eviction.
///
/// `set` moves the key to the freshest position (a replaced key is treated
/// as newly inserted); `get` leaves the order untouched. The oldest position
/// is evicted first.
#[derive(Debug)]
pub struct Fifo<K> {
  order: OrderList<K>,
}

impl<K: Eq + Clone> Fifo<K> {
  pub fn new() -> Self {
    Self {
      order: OrderList::new(),
    }
  }
}

impl<K: Eq + Clone> Default for Fifo<K> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K> EvictionPolicy<K> for Fifo<K>
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
    self.order.front().cloned()
  }

  fn clear(&mut self) {
    self.order.clear();
  }
}

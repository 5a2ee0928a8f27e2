use std::collections::VecDeque;

/// The eviction-order queue shared by the order-based policies.
///
/// Front is the oldest position, back is the freshest. Reordering scans for
/// the key's position; the queue is bounded by `maxsize`, so the scan cost
/// is capped by the cache bound.
#[derive(Debug)]
pub(crate) struct OrderList<K> {
  queue: VecDeque<K>,
}

impl<K: Eq + Clone> OrderList<K> {
  pub(crate) fn new() -> Self {
    Self {
      queue: VecDeque::new(),
    }
  }

  /// Moves `key` to the back (freshest) position, inserting it if absent.
  pub(crate) fn touch_back(&mut self, key: &K) {
    if let Some(pos) = self.queue.iter().position(|k| k == key) {
      if let Some(existing) = self.queue.remove(pos) {
        self.queue.push_back(existing);
        return;
      }
    }
    self.queue.push_back(key.clone());
  }

  pub(crate) fn remove(&mut self, key: &K) {
    if let Some(pos) = self.queue.iter().position(|k| k == key) {
      self.queue.remove(pos);
    }
  }

  pub(crate) fn front(&self) -> Option<&K> {
    self.queue.front()
  }

  pub(crate) fn back(&self) -> Option<&K> {
    self.queue.back()
  }

  /// Oldest-to-freshest iteration.
  pub(crate) fn iter(&self) -> impl Iterator<Item = &K> {
    self.queue.iter()
  }

  pub(crate) fn clear(&mut self) {
    self.queue.clear();
  }

  #[cfg(test)]
  pub(crate) fn keys_as_vec(&self) -> Vec<K> {
    self.queue.iter().cloned().collect()
  }
}

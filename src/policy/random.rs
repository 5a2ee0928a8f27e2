#![cfg(feature = "random")]

use std::collections::HashMap;
use std::hash::Hash;

use rand::seq::IndexedRandom;

use super::EvictionPolicy;

/// Random-replacement eviction: the next candidate is a uniformly random
/// live key. Accesses carry no signal, so `get` is a no-op.
#[derive(Debug)]
pub struct RandomPolicy<K> {
  keys: Vec<K>,
  // Position of each key in `keys`, for O(1) swap-removal.
  positions: HashMap<K, usize, ahash::RandomState>,
}

impl<K: Eq + Hash + Clone> RandomPolicy<K> {
  pub fn new() -> Self {
    Self {
      keys: Vec::new(),
      positions: HashMap::default(),
    }
  }
}

impl<K: Eq + Hash + Clone> Default for RandomPolicy<K> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K> EvictionPolicy<K> for RandomPolicy<K>
where
  K: Eq + Hash + Clone + Send,
{
  fn on_set(&mut self, key: &K) {
    if !self.positions.contains_key(key) {
      self.positions.insert(key.clone(), self.keys.len());
      self.keys.push(key.clone());
    }
  }

  fn on_remove(&mut self, key: &K) {
    if let Some(pos) = self.positions.remove(key) {
      self.keys.swap_remove(pos);
      if pos < self.keys.len() {
        self.positions.insert(self.keys[pos].clone(), pos);
      }
    }
  }

  fn next_candidate(&self) -> Option<K> {
    self.keys.as_slice().choose(&mut rand::rng()).cloned()
  }

  fn clear(&mut self) {
    self.keys.clear();
    self.positions.clear();
  }
}

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// The entry store and expiration index, always mutated together under the
/// engine lock.
///
/// Values are held in an `Arc<V>` so reads return shared handles without a
/// `V: Clone` bound. Keys absent from the expiration index never expire.
#[derive(Debug)]
pub(crate) struct EntryStore<K, V> {
  entries: HashMap<K, Arc<V>, ahash::RandomState>,
  expiries: HashMap<K, f64, ahash::RandomState>,
}

impl<K, V> EntryStore<K, V>
where
  K: Eq + Hash + Clone,
{
  pub(crate) fn new() -> Self {
    Self {
      entries: HashMap::default(),
      expiries: HashMap::default(),
    }
  }

  #[inline]
  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }

  #[inline]
  pub(crate) fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  #[inline]
  pub(crate) fn contains(&self, key: &K) -> bool {
    self.entries.contains_key(key)
  }

  #[inline]
  pub(crate) fn get(&self, key: &K) -> Option<&Arc<V>> {
    self.entries.get(key)
  }

  /// Inserts or replaces a value. The expiration index is left untouched;
  /// the engine always follows up with `set_expiry` or `clear_expiry`.
  pub(crate) fn insert(&mut self, key: K, value: Arc<V>) -> Option<Arc<V>> {
    self.entries.insert(key, value)
  }

  /// Removes an entry and any recorded expiry.
  pub(crate) fn remove(&mut self, key: &K) -> Option<Arc<V>> {
    self.expiries.remove(key);
    self.entries.remove(key)
  }

  pub(crate) fn set_expiry(&mut self, key: K, expires_at: f64) {
    self.expiries.insert(key, expires_at);
  }

  pub(crate) fn clear_expiry(&mut self, key: &K) {
    self.expiries.remove(key);
  }

  #[inline]
  pub(crate) fn expiry(&self, key: &K) -> Option<f64> {
    self.expiries.get(key).copied()
  }

  /// Whether `key` has a recorded expiry at or before `now`. Keys without a
  /// recorded expiry are never expired here.
  #[inline]
  pub(crate) fn expired_at(&self, key: &K, now: f64) -> bool {
    self.expiries.get(key).is_some_and(|at| *at <= now)
  }

  /// Keys whose recorded expiry is at or before the single `now` timestamp.
  pub(crate) fn expired_keys(&self, now: f64) -> Vec<K> {
    self
      .expiries
      .iter()
      .filter(|(_, at)| **at <= now)
      .map(|(key, _)| key.clone())
      .collect()
  }

  pub(crate) fn keys(&self) -> Vec<K> {
    self.entries.keys().cloned().collect()
  }

  pub(crate) fn values(&self) -> Vec<Arc<V>> {
    self.entries.values().cloned().collect()
  }

  pub(crate) fn items(&self) -> Vec<(K, Arc<V>)> {
    self
      .entries
      .iter()
      .map(|(key, value)| (key.clone(), value.clone()))
      .collect()
  }

  pub(crate) fn expirations(&self) -> Vec<(K, f64)> {
    self
      .expiries
      .iter()
      .map(|(key, at)| (key.clone(), *at))
      .collect()
  }

  pub(crate) fn clear(&mut self) {
    self.entries.clear();
    self.expiries.clear();
  }
}

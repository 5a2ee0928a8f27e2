use crate::builder::{CacheBuilder, CacheConfig};
use crate::cache::Cache;
use crate::error::{ConfigError, RegistryError};

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

/// A name-indexed collection of cache instances.
///
/// Each named cache is an independent instance with its own configuration.
/// `configure` creates or reconfigures; `register` replaces an instance
/// outright. Lookup of an unconfigured name is a distinct error telling the
/// caller to configure first.
pub struct CacheRegistry<K, V> {
  caches: Mutex<HashMap<String, Arc<Cache<K, V>>, ahash::RandomState>>,
}

impl<K, V> CacheRegistry<K, V>
where
  K: Eq + Hash + Clone + Send + 'static,
  V: Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      caches: Mutex::new(HashMap::default()),
    }
  }

  /// Creates the named cache from `config` if absent, otherwise applies
  /// `config` to the existing instance (an existing cache keeps its
  /// eviction policy). Returns the instance either way.
  pub fn configure(&self, name: &str, config: &CacheConfig) -> Result<Arc<Cache<K, V>>, ConfigError> {
    let mut caches = self.caches.lock();
    if let Some(cache) = caches.get(name) {
      cache.configure(config)?;
      return Ok(cache.clone());
    }
    let cache = Arc::new(CacheBuilder::new().apply(config).build()?);
    caches.insert(name.to_string(), cache.clone());
    Ok(cache)
  }

  /// Registers an instance under `name`, replacing any existing one.
  pub fn register(&self, name: &str, cache: Arc<Cache<K, V>>) {
    self.caches.lock().insert(name.to_string(), cache);
  }

  /// Looks up the named cache.
  pub fn get(&self, name: &str) -> Result<Arc<Cache<K, V>>, RegistryError> {
    self
      .caches
      .lock()
      .get(name)
      .cloned()
      .ok_or_else(|| RegistryError::NotConfigured(name.to_string()))
  }

  pub fn contains(&self, name: &str) -> bool {
    self.caches.lock().contains_key(name)
  }

  /// Sorted names of the registered caches.
  pub fn cache_names(&self) -> Vec<String> {
    let mut names: Vec<String> = self.caches.lock().keys().cloned().collect();
    names.sort();
    names
  }

  /// Snapshot of the registered instances.
  pub fn caches(&self) -> Vec<Arc<Cache<K, V>>> {
    self.caches.lock().values().cloned().collect()
  }

  /// Clears every registered cache. The instances stay registered.
  pub fn clear_all(&self) {
    for cache in self.caches() {
      cache.clear();
    }
  }
}

impl<K, V> Default for CacheRegistry<K, V>
where
  K: Eq + Hash + Clone + Send + 'static,
  V: Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

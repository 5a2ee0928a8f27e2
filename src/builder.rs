use crate::cache::{Cache, DefaultValue};
use crate::error::ConfigError;
use crate::listener::{DeleteCallback, EvictionReason, GetCallback, SetCallback};
use crate::policy::PolicyKind;
use crate::time::Timer;

use core::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

/// Default bound on entry count.
pub const DEFAULT_MAXSIZE: u64 = 300;

/// A builder for creating `Cache` instances.
pub struct CacheBuilder<K, V> {
  pub(crate) maxsize: u64,
  pub(crate) ttl: f64,
  pub(crate) timer: Option<Timer>,
  pub(crate) policy: PolicyKind,
  pub(crate) stats_enabled: bool,
  pub(crate) default: Option<DefaultValue<K, V>>,
  pub(crate) on_delete: Option<DeleteCallback<K, V>>,
  pub(crate) on_set: Option<SetCallback<K, V>>,
  pub(crate) on_get: Option<GetCallback<K>>,
  _value_marker: PhantomData<V>,
}

impl<K, V> fmt::Debug for CacheBuilder<K, V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheBuilder")
      .field("maxsize", &self.maxsize)
      .field("ttl", &self.ttl)
      .field("policy", &self.policy)
      .field("stats_enabled", &self.stats_enabled)
      .field("has_default", &self.default.is_some())
      .finish_non_exhaustive()
  }
}

impl<K, V> CacheBuilder<K, V> {
  pub fn new() -> Self {
    Self {
      maxsize: DEFAULT_MAXSIZE,
      ttl: 0.0,
      timer: None,
      policy: PolicyKind::default(),
      stats_enabled: true,
      default: None,
      on_delete: None,
      on_set: None,
      on_get: None,
      _value_marker: PhantomData,
    }
  }

  /// Sets the maximum number of entries. `0` means unbounded.
  pub fn maxsize(mut self, maxsize: u64) -> Self {
    self.maxsize = maxsize;
    self
  }

  /// Removes the entry-count bound.
  pub fn unbounded(mut self) -> Self {
    self.maxsize = 0;
    self
  }

  /// Sets the default TTL in seconds for all entries. `0` (the default)
  /// means entries do not expire.
  pub fn ttl(mut self, ttl: f64) -> Self {
    self.ttl = ttl;
    self
  }

  /// Sets the time source used for expiry computation. Defaults to a
  /// monotonic clock; inject a manual timer for deterministic tests.
  pub fn timer(mut self, timer: impl Fn() -> f64 + Send + Sync + 'static) -> Self {
    self.timer = Some(Arc::new(timer));
    self
  }

  /// Sets the eviction policy. Defaults to FIFO.
  pub fn policy(mut self, policy: PolicyKind) -> Self {
    self.policy = policy;
    self
  }

  /// Whether the statistics tracker starts enabled. Defaults to `true`.
  pub fn stats(mut self, enabled: bool) -> Self {
    self.stats_enabled = enabled;
    self
  }

  /// Sets a static fallback value returned by `get` on a miss. The fallback
  /// is returned, not stored.
  pub fn default_value(mut self, value: V) -> Self {
    self.default = Some(DefaultValue::Static(Arc::new(value)));
    self
  }

  /// Sets a fallback function invoked with the key on a miss. Its result is
  /// stored via `set` and then returned.
  pub fn default_with(mut self, f: impl Fn(&K) -> V + Send + Sync + 'static) -> Self {
    self.default = Some(DefaultValue::Computed(Arc::new(f)));
    self
  }

  /// Called after every removal with the entry and the removal cause.
  pub fn on_delete(mut self, f: impl Fn(&K, &Arc<V>, EvictionReason) + Send + Sync + 'static) -> Self {
    self.on_delete = Some(Arc::new(f));
    self
  }

  /// Called after every `set` with the replaced and new values.
  pub fn on_set(mut self, f: impl Fn(&K, Option<&Arc<V>>, &Arc<V>) + Send + Sync + 'static) -> Self {
    self.on_set = Some(Arc::new(f));
    self
  }

  /// Called after every `get` with whether the key held a live value.
  pub fn on_get(mut self, f: impl Fn(&K, bool) + Send + Sync + 'static) -> Self {
    self.on_get = Some(Arc::new(f));
    self
  }

  /// Applies a runtime configuration on top of the builder's settings.
  pub fn apply(mut self, config: &CacheConfig) -> Self {
    if let Some(maxsize) = config.maxsize {
      self.maxsize = maxsize;
    }
    if let Some(ttl) = config.ttl {
      self.ttl = ttl;
    }
    if let Some(timer) = &config.timer {
      self.timer = Some(timer.clone());
    }
    if let Some(policy) = config.policy {
      self.policy = policy;
    }
    if let Some(stats) = config.stats {
      self.stats_enabled = stats;
    }
    self
  }
}

impl<K, V> Default for CacheBuilder<K, V> {
  fn default() -> Self {
    Self::new()
  }
}

impl<K, V> CacheBuilder<K, V>
where
  K: Eq + Hash + Clone + Send + 'static,
  V: Send + Sync + 'static,
{
  /// Builds the cache, validating the configuration first. The TTL must be
  /// a finite number of seconds greater than or equal to zero.
  pub fn build(self) -> Result<Cache<K, V>, ConfigError> {
    validate_ttl(self.ttl)?;
    Ok(Cache::from_builder(self))
  }
}

/// A runtime configuration for `Cache::configure` and the registry.
///
/// Unset fields leave the current setting untouched. `policy` and `stats`
/// only apply when the registry creates a new cache; an existing cache
/// keeps its policy.
#[derive(Clone, Default)]
pub struct CacheConfig {
  pub maxsize: Option<u64>,
  pub ttl: Option<f64>,
  pub timer: Option<Timer>,
  pub policy: Option<PolicyKind>,
  pub stats: Option<bool>,
}

impl fmt::Debug for CacheConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheConfig")
      .field("maxsize", &self.maxsize)
      .field("ttl", &self.ttl)
      .field("has_timer", &self.timer.is_some())
      .field("policy", &self.policy)
      .field("stats", &self.stats)
      .finish()
  }
}

impl CacheConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn maxsize(mut self, maxsize: u64) -> Self {
    self.maxsize = Some(maxsize);
    self
  }

  pub fn ttl(mut self, ttl: f64) -> Self {
    self.ttl = Some(ttl);
    self
  }

  pub fn timer(mut self, timer: impl Fn() -> f64 + Send + Sync + 'static) -> Self {
    self.timer = Some(Arc::new(timer));
    self
  }

  pub fn policy(mut self, policy: PolicyKind) -> Self {
    self.policy = Some(policy);
    self
  }

  pub fn stats(mut self, enabled: bool) -> Self {
    self.stats = Some(enabled);
    self
  }

  pub(crate) fn validate(&self) -> Result<(), ConfigError> {
    if let Some(ttl) = self.ttl {
      validate_ttl(ttl)?;
    }
    Ok(())
  }
}

/// Rejects NaN, infinite, and negative TTLs.
pub(crate) fn validate_ttl(ttl: f64) -> Result<(), ConfigError> {
  if !ttl.is_finite() || ttl < 0.0 {
    return Err(ConfigError::InvalidTtl(ttl));
  }
  Ok(())
}

use crate::builder::CacheBuilder;
use crate::cache::Cache;
use crate::error::ConfigError;
use crate::policy::PolicyKind;

use once_cell::sync::Lazy;
use std::any::TypeId;
use std::future::Future;
use std::hash::{BuildHasher, Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

/// Default entry bound for memoizer-owned caches.
pub const MEMO_MAXSIZE: u64 = 128;

// One hasher state for every memo key computed in this process, so equal
// arguments always hash to the same key.
static MEMO_HASHER: Lazy<ahash::RandomState> = Lazy::new(ahash::RandomState::new);

/// Derives a `u64` cache key from an argument value, for callers building
/// their own hash-keyed caches.
///
/// A pure function of the argument's `Hash` and, when `typed`, its
/// `TypeId`: with `typed`, arguments that hash identically but have
/// different types (say `String` and `&str`) produce distinct keys. The
/// memoizers below do not use this -- they key by the argument value
/// itself, so hash collisions cannot alias their entries.
pub fn memo_key<A: Hash + 'static>(args: &A, typed: bool) -> u64 {
  let mut hasher = MEMO_HASHER.build_hasher();
  if typed {
    TypeId::of::<A>().hash(&mut hasher);
  }
  args.hash(&mut hasher);
  hasher.finish()
}

/// Wraps a function with a memoizing cache.
///
/// Each wrapper owns an independent cache keyed by the argument value:
/// repeated calls with equal arguments hit the same entry, and distinct
/// arguments always occupy distinct entries. The underlying cache (and
/// therefore eviction, TTL, and statistics) is exposed via `cache()`, and
/// the unwrapped function via `uncached()`.
pub struct Memoized<A, R, F> {
  cache: Cache<A, R>,
  func: F,
}

impl<A, R, F> Memoized<A, R, F>
where
  A: Eq + Hash + Clone + Send + 'static,
  R: Send + Sync + 'static,
  F: Fn(&A) -> R,
{
  /// Memoizes `func` with a FIFO cache of `MEMO_MAXSIZE` entries.
  pub fn new(func: F) -> Self {
    Self {
      cache: Cache::from_builder(CacheBuilder::new().maxsize(MEMO_MAXSIZE)),
      func,
    }
  }

  /// Memoizes `func` with an explicit bound, TTL, and eviction policy.
  pub fn with_settings(func: F, maxsize: u64, ttl: f64, policy: PolicyKind) -> Result<Self, ConfigError> {
    let cache = CacheBuilder::new().maxsize(maxsize).ttl(ttl).policy(policy).build()?;
    Ok(Self { cache, func })
  }

  /// Returns the cached result for `args`, computing and storing it on a
  /// miss. The cache lock is not held while the function runs.
  pub fn call(&self, args: &A) -> Arc<R> {
    if let Some(hit) = self.cache.get(args) {
      return hit;
    }
    let value = Arc::new((self.func)(args));
    self.cache.set_entry(args.clone(), value.clone(), None);
    value
  }

  /// The memoizer's cache, keyed by the argument value.
  pub fn cache(&self) -> &Cache<A, R> {
    &self.cache
  }

  /// The wrapped function, bypassing the cache.
  pub fn uncached(&self) -> &F {
    &self.func
  }
}

/// Memoizes a future-returning function.
///
/// The lookup and the final store are each synchronous critical sections;
/// the wrapped future is awaited in between with no lock held.
pub struct AsyncMemoized<A, R, F, Fut> {
  cache: Cache<A, R>,
  func: F,
  _future: PhantomData<fn() -> Fut>,
}

impl<A, R, F, Fut> AsyncMemoized<A, R, F, Fut>
where
  A: Eq + Hash + Clone + Send + 'static,
  R: Send + Sync + 'static,
  F: Fn(&A) -> Fut,
  Fut: Future<Output = R>,
{
  /// Memoizes `func` with a FIFO cache of `MEMO_MAXSIZE` entries.
  pub fn new(func: F) -> Self {
    Self {
      cache: Cache::from_builder(CacheBuilder::new().maxsize(MEMO_MAXSIZE)),
      func,
      _future: PhantomData,
    }
  }

  /// Memoizes `func` with an explicit bound, TTL, and eviction policy.
  pub fn with_settings(func: F, maxsize: u64, ttl: f64, policy: PolicyKind) -> Result<Self, ConfigError> {
    let cache = CacheBuilder::new().maxsize(maxsize).ttl(ttl).policy(policy).build()?;
    Ok(Self {
      cache,
      func,
      _future: PhantomData,
    })
  }

  /// Returns the cached result for `args`, awaiting and storing the wrapped
  /// future on a miss.
  pub async fn call(&self, args: &A) -> Arc<R> {
    if let Some(hit) = self.cache.get(args) {
      return hit;
    }
    let value = Arc::new((self.func)(args).await);
    self.cache.set_entry(args.clone(), value.clone(), None);
    value
  }

  /// The memoizer's cache, keyed by the argument value.
  pub fn cache(&self) -> &Cache<A, R> {
    &self.cache
  }
}

//! An in-process, thread-safe, bounded key/value cache.
//!
//! # Features
//! - **Bounded storage**: entry-count limit enforced on every insert.
//! - **Six eviction policies**: FIFO (default), LIFO, LRU, MRU, LFU, and
//!   random replacement, all over one policy seam.
//! - **TTL expiration**: per-cache default and per-entry overrides, checked
//!   lazily on access or sweep -- no background threads.
//! - **Statistics**: hit/miss/eviction counters with pause and reset.
//! - **Memoization**: sync and async function-result caching built on the
//!   core `get`/`set` contract.
//! - **Registry**: a name-indexed collection of independently configured
//!   cache instances.
//! - **Persistence** (optional `persist` feature): a pass-through disk
//!   store for individual values.
//!
//! ```
//! use cachet::{Cache, PolicyKind};
//!
//! let cache: cachet::Cache<String, u32> = Cache::builder()
//!   .maxsize(2)
//!   .policy(PolicyKind::Lru)
//!   .build()
//!   .unwrap();
//!
//! cache.set("a".into(), 1);
//! cache.set("b".into(), 2);
//! cache.set("c".into(), 3); // evicts "a"
//! assert!(!cache.has(&"a".into()));
//! ```

// Public modules that form the API
pub mod builder;
pub mod cache;
pub mod error;
pub mod filter;
pub mod listener;
pub mod memo;
pub mod policy;
pub mod registry;
pub mod stats;
pub mod time;

#[cfg(feature = "persist")]
pub mod persist;

// Internal, crate-only modules
mod store;

// Re-export the primary user-facing types for convenience
pub use builder::{CacheBuilder, CacheConfig, DEFAULT_MAXSIZE};
pub use cache::Cache;
pub use error::{CacheError, ConfigError, RegistryError};
pub use filter::{KeyFilter, KeyText};
pub use listener::EvictionReason;
pub use memo::{memo_key, AsyncMemoized, Memoized};
pub use policy::{EvictionPolicy, PolicyKind};
pub use registry::CacheRegistry;
pub use stats::{Stats, StatsTracker};
pub use time::Timer;

#[cfg(feature = "persist")]
pub use error::PersistError;
#[cfg(feature = "persist")]
pub use persist::{DiskStore, PersistedEntry};

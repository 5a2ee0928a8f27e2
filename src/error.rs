use std::fmt;

/// Errors raised while validating cache configuration.
///
/// Configuration errors are reported synchronously by `CacheBuilder::build`,
/// `Cache::configure`, and the per-call TTL setters, before any entries are
/// touched.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
  /// The TTL was negative, NaN, or infinite. A TTL must be a finite number
  /// of seconds greater than or equal to zero (zero meaning "no expiry").
  InvalidTtl(f64),
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::InvalidTtl(ttl) => {
        write!(f, "ttl must be a finite number >= 0, got {ttl}")
      }
    }
  }
}

impl std::error::Error for ConfigError {}

/// Errors raised by cache operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
  /// `pop_next` was called on a cache with no entries.
  Empty,
}

impl fmt::Display for CacheError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CacheError::Empty => write!(f, "cache is empty"),
    }
  }
}

impl std::error::Error for CacheError {}

/// Errors raised by the cache registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
  /// No cache has been configured under the requested name.
  NotConfigured(String),
}

impl fmt::Display for RegistryError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RegistryError::NotConfigured(name) => write!(
        f,
        "cache not configured for {name:?}; call configure({name:?}, ..) to create it first"
      ),
    }
  }
}

impl std::error::Error for RegistryError {}

/// Errors raised by the disk persistence collaborator.
#[cfg(feature = "persist")]
#[derive(Debug)]
pub enum PersistError {
  Io(std::io::Error),
  Serde(serde_json::Error),
}

#[cfg(feature = "persist")]
impl fmt::Display for PersistError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PersistError::Io(err) => write!(f, "persistence i/o error: {err}"),
      PersistError::Serde(err) => write!(f, "persistence encoding error: {err}"),
    }
  }
}

#[cfg(feature = "persist")]
impl std::error::Error for PersistError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      PersistError::Io(err) => Some(err),
      PersistError::Serde(err) => Some(err),
    }
  }
}

#[cfg(feature = "persist")]
impl From<std::io::Error> for PersistError {
  fn from(err: std::io::Error) -> Self {
    PersistError::Io(err)
  }
}

#[cfg(feature = "persist")]
impl From<serde_json::Error> for PersistError {
  fn from(err: serde_json::Error) -> Self {
    PersistError::Serde(err)
  }
}

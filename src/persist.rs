#![cfg(feature = "persist")]

use crate::error::PersistError;
use crate::time::{self, Timer};

use std::fs;
use std::hash::BuildHasher;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

// Fixed seeds so a key maps to the same file across processes.
const PATH_SEEDS: (u64, u64, u64, u64) = (
  0x9e37_79b9_7f4a_7c15,
  0x6a09_e667_f3bc_c908,
  0xbb67_ae85_84ca_a73b,
  0x3c6e_f372_fe94_f82b,
);

/// A persisted cache record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedEntry<V> {
  /// Timestamp when the record was written.
  pub created: f64,
  /// Absolute expiry, compared like the in-memory expiration index.
  pub expires: Option<f64>,
  pub value: V,
}

#[derive(Serialize)]
struct RecordRef<'a, V> {
  created: f64,
  expires: Option<f64>,
  value: &'a V,
}

// Reads only the expiry, for purging without knowing the value type.
#[derive(Deserialize)]
struct RecordHeader {
  expires: Option<f64>,
}

/// A pass-through disk store for individual cache values.
///
/// Each key maps deterministically to one JSON file under the store
/// directory, holding `{created, expires, value}`. Reads honor the same
/// expiry comparison as in-memory entries; an expired record is deleted and
/// reported as absent.
pub struct DiskStore {
  dir: PathBuf,
  timer: Timer,
}

impl DiskStore {
  /// Opens (and creates if needed) a store rooted at `dir`.
  pub fn new(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
    Self::with_timer(dir, time::default_timer())
  }

  /// Like `new` with an injected time source.
  pub fn with_timer(dir: impl Into<PathBuf>, timer: Timer) -> Result<Self, PersistError> {
    let dir = dir.into();
    fs::create_dir_all(&dir)?;
    Ok(Self { dir, timer })
  }

  /// The file backing `key`. Deterministic: equal keys map to equal paths.
  pub fn path_for(&self, key: &str) -> PathBuf {
    let (k0, k1, k2, k3) = PATH_SEEDS;
    let state = ahash::RandomState::with_seeds(k0, k1, k2, k3);
    let hash = state.hash_one(key);
    self.dir.join(format!("{hash:016x}.json"))
  }

  /// Writes a record for `key`. A `ttl` of `None` or `0` stores a
  /// non-expiring record.
  pub fn write<V: Serialize>(&self, key: &str, value: &V, ttl: Option<f64>) -> Result<(), PersistError> {
    let now = (self.timer)();
    let expires = ttl.filter(|ttl| *ttl > 0.0).map(|ttl| now + ttl);
    let record = RecordRef {
      created: now,
      expires,
      value,
    };
    let bytes = serde_json::to_vec(&record)?;
    fs::write(self.path_for(key), bytes)?;
    Ok(())
  }

  /// Reads the record for `key`, or `None` if absent or expired. An
  /// expired record is deleted in place.
  pub fn read<V: DeserializeOwned>(&self, key: &str) -> Result<Option<PersistedEntry<V>>, PersistError> {
    let path = self.path_for(key);
    let bytes = match fs::read(&path) {
      Ok(bytes) => bytes,
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
      Err(err) => return Err(err.into()),
    };
    let entry: PersistedEntry<V> = serde_json::from_slice(&bytes)?;
    let now = (self.timer)();
    if entry.expires.is_some_and(|at| at <= now) {
      fs::remove_file(&path)?;
      return Ok(None);
    }
    Ok(Some(entry))
  }

  /// Deletes the record for `key`, returning `1` if one existed.
  pub fn delete(&self, key: &str) -> Result<usize, PersistError> {
    match fs::remove_file(self.path_for(key)) {
      Ok(()) => Ok(1),
      Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(0),
      Err(err) => Err(err.into()),
    }
  }

  /// Deletes every record, returning the count.
  pub fn purge(&self) -> Result<usize, PersistError> {
    let mut count = 0;
    for path in self.record_paths()? {
      fs::remove_file(&path)?;
      count += 1;
    }
    if count > 0 {
      debug!("purged {count} persisted records");
    }
    Ok(count)
  }

  /// Deletes only the records whose expiry is at or before a single "now"
  /// timestamp, returning the count. Unreadable records are skipped.
  pub fn purge_expired(&self) -> Result<usize, PersistError> {
    let now = (self.timer)();
    let mut count = 0;
    for path in self.record_paths()? {
      let Ok(bytes) = fs::read(&path) else { continue };
      let Ok(header) = serde_json::from_slice::<RecordHeader>(&bytes) else {
        continue;
      };
      if header.expires.is_some_and(|at| at <= now) {
        fs::remove_file(&path)?;
        count += 1;
      }
    }
    if count > 0 {
      debug!("purged {count} expired persisted records");
    }
    Ok(count)
  }

  fn record_paths(&self) -> Result<Vec<PathBuf>, PersistError> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(&self.dir)? {
      let path = entry?.path();
      if path.extension().is_some_and(|ext| ext == "json") {
        paths.push(path);
      }
    }
    Ok(paths)
  }

  /// The store directory.
  pub fn dir(&self) -> &Path {
    &self.dir
  }
}

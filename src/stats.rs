use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_utils::CachePadded;

/// A thread-safe statistics tracker for a single cache instance.
///
/// All counters are atomic so updates never take the engine lock. Increments
/// are conditional on the tracker being enabled and not paused. Disabling
/// resets the counters; pausing only freezes them.
#[derive(Debug)]
pub struct StatsTracker {
  hits: CachePadded<AtomicU64>,
  misses: CachePadded<AtomicU64>,
  evictions: CachePadded<AtomicU64>,
  enabled: AtomicBool,
  paused: AtomicBool,
}

impl StatsTracker {
  pub(crate) fn new(enabled: bool) -> Self {
    Self {
      hits: CachePadded::new(AtomicU64::new(0)),
      misses: CachePadded::new(AtomicU64::new(0)),
      evictions: CachePadded::new(AtomicU64::new(0)),
      enabled: AtomicBool::new(enabled),
      paused: AtomicBool::new(false),
    }
  }

  #[inline]
  fn active(&self) -> bool {
    self.enabled.load(Ordering::Relaxed) && !self.paused.load(Ordering::Relaxed)
  }

  pub(crate) fn record_hit(&self) {
    if self.active() {
      self.hits.fetch_add(1, Ordering::Relaxed);
    }
  }

  pub(crate) fn record_miss(&self) {
    if self.active() {
      self.misses.fetch_add(1, Ordering::Relaxed);
    }
  }

  pub(crate) fn add_evictions(&self, count: u64) {
    if count > 0 && self.active() {
      self.evictions.fetch_add(count, Ordering::Relaxed);
    }
  }

  /// Enables the tracker. Counters resume from their current values.
  pub fn enable(&self) {
    self.enabled.store(true, Ordering::Relaxed);
  }

  /// Disables the tracker. Implies `reset`.
  pub fn disable(&self) {
    self.reset();
    self.enabled.store(false, Ordering::Relaxed);
  }

  pub fn is_enabled(&self) -> bool {
    self.enabled.load(Ordering::Relaxed)
  }

  /// Freezes the counters without resetting them.
  pub fn pause(&self) {
    self.paused.store(true, Ordering::Relaxed);
  }

  pub fn resume(&self) {
    self.paused.store(false, Ordering::Relaxed);
  }

  pub fn is_paused(&self) -> bool {
    self.paused.load(Ordering::Relaxed)
  }

  /// Zeroes all counters.
  pub fn reset(&self) {
    self.hits.store(0, Ordering::Relaxed);
    self.misses.store(0, Ordering::Relaxed);
    self.evictions.store(0, Ordering::Relaxed);
  }

  /// Takes a point-in-time snapshot. `entry_count` is sampled by the caller
  /// at snapshot time, not accumulated.
  pub(crate) fn snapshot(&self, entry_count: usize) -> Stats {
    Stats {
      hits: self.hits.load(Ordering::Relaxed),
      misses: self.misses.load(Ordering::Relaxed),
      evictions: self.evictions.load(Ordering::Relaxed),
      entry_count,
    }
  }
}

/// An immutable snapshot of cache statistics.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Stats {
  /// The number of lookups that returned a live value.
  pub hits: u64,
  /// The number of lookups that did not.
  pub misses: u64,
  /// The number of entries removed by capacity pressure or expiry.
  pub evictions: u64,
  /// The number of entries at snapshot time.
  pub entry_count: usize,
}

impl Stats {
  /// Total number of recorded lookups.
  pub fn accesses(&self) -> u64 {
    self.hits + self.misses
  }

  /// `hits / accesses`. Returns `1.0` when there have been no accesses.
  pub fn hit_rate(&self) -> f64 {
    if self.accesses() == 0 {
      return 1.0;
    }
    self.hits as f64 / self.accesses() as f64
  }

  /// `misses / accesses`. Returns `0.0` when there have been no accesses.
  pub fn miss_rate(&self) -> f64 {
    if self.accesses() == 0 {
      return 0.0;
    }
    self.misses as f64 / self.accesses() as f64
  }

  /// `evictions / accesses`. Returns `1.0` when there have been no accesses.
  pub fn eviction_rate(&self) -> f64 {
    if self.accesses() == 0 {
      return 1.0;
    }
    self.evictions as f64 / self.accesses() as f64
  }
}

impl fmt::Debug for Stats {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Stats")
      .field("hits", &self.hits)
      .field("misses", &self.misses)
      .field("evictions", &self.evictions)
      .field("entry_count", &self.entry_count)
      .field("hit_rate", &self.hit_rate())
      .field("miss_rate", &self.miss_rate())
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_zero_access_rate_defaults() {
    let tracker = StatsTracker::new(true);
    let stats = tracker.snapshot(0);
    assert_eq!(stats.hit_rate(), 1.0);
    assert_eq!(stats.miss_rate(), 0.0);
    assert_eq!(stats.eviction_rate(), 1.0);
  }

  #[test]
  fn test_paused_counters_freeze() {
    let tracker = StatsTracker::new(true);
    tracker.record_hit();
    tracker.pause();
    tracker.record_hit();
    tracker.record_miss();
    assert_eq!(tracker.snapshot(0).hits, 1);
    assert_eq!(tracker.snapshot(0).misses, 0);

    tracker.resume();
    tracker.record_miss();
    assert_eq!(tracker.snapshot(0).misses, 1);
  }

  #[test]
  fn test_disable_implies_reset() {
    let tracker = StatsTracker::new(true);
    tracker.record_hit();
    tracker.record_miss();
    tracker.disable();
    assert!(!tracker.is_enabled());

    let stats = tracker.snapshot(0);
    assert_eq!(stats.hits, 0);
    assert_eq!(stats.misses, 0);

    // While disabled, nothing is recorded.
    tracker.record_hit();
    assert_eq!(tracker.snapshot(0).hits, 0);
  }
}

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A hand-advanced clock, injected as the cache timer for deterministic
/// TTL tests.
#[derive(Clone, Default)]
pub struct ManualClock {
  now_bits: Arc<AtomicU64>,
}

impl ManualClock {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn now(&self) -> f64 {
    f64::from_bits(self.now_bits.load(Ordering::Relaxed))
  }

  pub fn set(&self, now: f64) {
    self.now_bits.store(now.to_bits(), Ordering::Relaxed);
  }

  pub fn advance(&self, secs: f64) {
    self.set(self.now() + secs);
  }

  /// A timer closure reading this clock, for `CacheBuilder::timer`.
  pub fn timer(&self) -> impl Fn() -> f64 + Send + Sync + 'static {
    let clock = self.clone();
    move || clock.now()
  }
}

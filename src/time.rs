use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Instant;

/// The time source used for TTL expiry computation.
///
/// A timer is any zero-argument function returning the current time as a
/// monotonically comparable number of seconds. The cache only ever compares
/// and adds these values, so any unit-consistent source works. Injecting a
/// manual timer makes expiration fully deterministic in tests.
pub type Timer = Arc<dyn Fn() -> f64 + Send + Sync>;

// The single, static reference point for the default timer.
// Initialized lazily on first use.
static CACHE_EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

/// Current time in seconds since the crate's epoch.
#[inline]
pub(crate) fn now_seconds() -> f64 {
  Instant::now()
    .saturating_duration_since(*CACHE_EPOCH)
    .as_secs_f64()
}

/// The default timer: monotonic seconds since the crate's epoch.
pub(crate) fn default_timer() -> Timer {
  Arc::new(now_seconds)
}

use cachet::{AsyncMemoized, Memoized, PolicyKind};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mod common;

#[test]
fn test_repeated_calls_hit_the_cache() {
  let calls = Arc::new(AtomicUsize::new(0));
  let calls_in = calls.clone();
  let memo = Memoized::new(move |n: &u64| {
    calls_in.fetch_add(1, Ordering::SeqCst);
    n * 2
  });

  assert_eq!(*memo.call(&21), 42);
  assert_eq!(*memo.call(&21), 42);
  assert_eq!(*memo.call(&5), 10);
  assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_distinct_args_get_distinct_entries() {
  let memo = Memoized::new(|s: &String| s.len());
  assert_eq!(*memo.call(&"ab".to_string()), 2);
  assert_eq!(*memo.call(&"abcd".to_string()), 4);
  assert_eq!(memo.cache().len(), 2);
}

#[test]
fn test_memo_cache_is_inspectable() {
  let memo = Memoized::new(|n: &u64| n + 1);
  memo.call(&1);
  memo.call(&1);
  memo.call(&2);

  let stats = memo.cache().stats();
  assert_eq!(stats.hits, 1);
  assert_eq!(stats.misses, 2);
  assert_eq!(stats.entry_count, 2);
}

#[test]
fn test_clearing_the_cache_forces_recompute() {
  let calls = Arc::new(AtomicUsize::new(0));
  let calls_in = calls.clone();
  let memo = Memoized::new(move |n: &u64| {
    calls_in.fetch_add(1, Ordering::SeqCst);
    *n
  });

  memo.call(&7);
  memo.cache().clear();
  memo.call(&7);
  assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_with_settings_bounds_the_cache() {
  let memo = Memoized::with_settings(|n: &u64| *n, 2, 0.0, PolicyKind::Lru).unwrap();
  memo.call(&1);
  memo.call(&2);
  memo.call(&3);
  assert_eq!(memo.cache().len(), 2);

  assert!(Memoized::with_settings(|n: &u64| *n, 2, f64::NAN, PolicyKind::Lru).is_err());
}

#[test]
fn test_uncached_bypasses_the_cache() {
  let memo = Memoized::new(|n: &u64| n * 10);
  assert_eq!((memo.uncached())(&3), 30);
  assert!(memo.cache().is_empty());
}

#[test]
fn test_cache_is_keyed_by_argument_value() {
  // Entries live under the argument itself, not a derived hash, so two
  // distinct arguments can never alias one entry.
  let memo = Memoized::new(|s: &String| s.len());
  memo.call(&"abc".to_string());

  assert!(memo.cache().has(&"abc".to_string()));
  assert!(!memo.cache().has(&"abd".to_string()));
  assert_eq!(*memo.call(&"abd".to_string()), 3);
  assert_eq!(memo.cache().len(), 2);
}

#[tokio::test]
async fn test_async_memo_awaits_once() {
  let calls = Arc::new(AtomicUsize::new(0));
  let calls_in = calls.clone();
  let memo = AsyncMemoized::new(move |n: &u64| {
    let calls = calls_in.clone();
    let n = *n;
    async move {
      calls.fetch_add(1, Ordering::SeqCst);
      n * 2
    }
  });

  assert_eq!(*memo.call(&21).await, 42);
  assert_eq!(*memo.call(&21).await, 42);
  assert_eq!(calls.load(Ordering::SeqCst), 1);
  assert_eq!(memo.cache().len(), 1);
}

#[tokio::test]
async fn test_async_memo_with_settings() {
  let memo = AsyncMemoized::with_settings(|n: &u64| std::future::ready(*n), 2, 0.0, PolicyKind::Fifo).unwrap();
  memo.call(&1).await;
  memo.call(&2).await;
  memo.call(&3).await;
  assert_eq!(memo.cache().len(), 2);
}

use cachet::{Cache, EvictionReason};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

mod common;

#[test]
fn test_set_and_get() {
  let cache: Cache<String, i32> = Cache::new();
  cache.set("key1".to_string(), 10);

  assert_eq!(cache.get(&"key1".to_string()), Some(Arc::new(10)));
  assert!(cache.get(&"missing".to_string()).is_none());
  assert_eq!(cache.len(), 1);
}

#[test]
fn test_set_replaces_value() {
  let cache: Cache<String, i32> = Cache::new();
  cache.set("key1".to_string(), 10);
  cache.set("key1".to_string(), 20);

  assert_eq!(cache.get(&"key1".to_string()), Some(Arc::new(20)));
  assert_eq!(cache.len(), 1);
}

#[test]
fn test_has_does_not_touch_stats() {
  let cache: Cache<String, i32> = Cache::new();
  cache.set("key1".to_string(), 10);

  assert!(cache.has(&"key1".to_string()));
  assert!(!cache.has(&"missing".to_string()));

  let stats = cache.stats();
  assert_eq!(stats.hits, 0);
  assert_eq!(stats.misses, 0);
}

#[test]
fn test_add_does_not_overwrite() {
  let cache: Cache<String, i32> = Cache::new();
  cache.add("key1".to_string(), 1);
  cache.add("key1".to_string(), 2);
  assert_eq!(cache.get(&"key1".to_string()), Some(Arc::new(1)));

  // set always overwrites
  cache.set("key1".to_string(), 3);
  assert_eq!(cache.get(&"key1".to_string()), Some(Arc::new(3)));
}

#[test]
fn test_add_sweep_and_insert_are_one_step() {
  let clock = common::ManualClock::new();
  let writer: Arc<Mutex<Option<Arc<Cache<String, i32>>>>> = Arc::new(Mutex::new(None));
  let writer_in = writer.clone();
  let cache: Arc<Cache<String, i32>> = Arc::new(
    Cache::builder()
      .ttl(5.0)
      .timer(clock.timer())
      .on_delete(move |key: &String, _value: &Arc<i32>, _reason| {
        if let Some(cache) = writer_in.lock().unwrap().as_ref() {
          cache.set(key.clone(), 99);
        }
      })
      .build()
      .unwrap(),
  );
  *writer.lock().unwrap() = Some(cache.clone());

  cache.set("k".to_string(), 1);
  clock.advance(10.0);

  // Expiring the stale entry and the conditional insert share one lock
  // acquisition, so the callback's write lands strictly after `add`
  // completes and is the value that survives.
  cache.add("k".to_string(), 7);
  assert_eq!(cache.get(&"k".to_string()), Some(Arc::new(99)));
}

#[test]
fn test_delete_returns_count() {
  let cache: Cache<String, i32> = Cache::new();
  cache.set("key1".to_string(), 10);

  assert_eq!(cache.delete(&"key1".to_string()), 1);
  assert_eq!(cache.delete(&"key1".to_string()), 0);
  assert!(!cache.has(&"key1".to_string()));
}

#[test]
fn test_clear_empties_everything() {
  let cache: Cache<String, i32> = Cache::new();
  cache.set_many(vec![("a".to_string(), 1), ("b".to_string(), 2)]);
  assert_eq!(cache.len(), 2);

  cache.clear();
  assert_eq!(cache.len(), 0);
  assert!(cache.is_empty());
  assert!(!cache.has(&"a".to_string()));
  assert!(!cache.has(&"b".to_string()));
}

#[test]
fn test_get_or_uses_per_call_default() {
  let cache: Cache<String, i32> = Cache::new();
  assert_eq!(cache.get_or(&"missing".to_string(), 42), Arc::new(42));
  // The per-call default is not stored.
  assert!(!cache.has(&"missing".to_string()));
}

#[test]
fn test_static_default_is_returned_not_stored() {
  let cache: Cache<String, i32> = Cache::builder().default_value(7).build().unwrap();
  assert_eq!(cache.get(&"missing".to_string()), Some(Arc::new(7)));
  assert!(!cache.has(&"missing".to_string()));
}

#[test]
fn test_computed_default_is_stored() {
  let calls = Arc::new(AtomicUsize::new(0));
  let calls_in = calls.clone();
  let cache: Cache<String, usize> = Cache::builder()
    .default_with(move |key: &String| {
      calls_in.fetch_add(1, Ordering::SeqCst);
      key.len()
    })
    .build()
    .unwrap();

  assert_eq!(cache.get(&"four".to_string()), Some(Arc::new(4)));
  assert!(cache.has(&"four".to_string()));

  // Second get is a hit; the default is not invoked again.
  assert_eq!(cache.get(&"four".to_string()), Some(Arc::new(4)));
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_get_or_insert_with_computes_once() {
  let cache: Cache<String, i32> = Cache::new();
  let first = cache.get_or_insert_with("k".to_string(), |_| 1);
  let second = cache.get_or_insert_with("k".to_string(), |_| 2);
  assert_eq!(first, Arc::new(1));
  assert_eq!(second, Arc::new(1));
}

#[test]
fn test_values_are_shared_handles() {
  let cache: Cache<String, Vec<i32>> = Cache::new();
  cache.set("k".to_string(), vec![1, 2, 3]);

  let a = cache.get(&"k".to_string()).unwrap();
  let b = cache.get(&"k".to_string()).unwrap();
  assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_snapshot_accessors() {
  let cache: Cache<String, i32> = Cache::new();
  cache.set("a".to_string(), 1);
  cache.set("b".to_string(), 2);

  let mut keys = cache.keys();
  keys.sort();
  assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);

  let mut items = cache.items();
  items.sort_by(|(a, _), (b, _)| a.cmp(b));
  assert_eq!(items.len(), 2);
  assert_eq!(*items[0].1, 1);
  assert_eq!(cache.values().len(), 2);
}

#[test]
fn test_delete_callback_reports_cause() {
  let seen: Arc<Mutex<Vec<(String, i32, EvictionReason)>>> = Arc::new(Mutex::new(Vec::new()));
  let seen_in = seen.clone();
  let cache: Cache<String, i32> = Cache::builder()
    .maxsize(1)
    .on_delete(move |key: &String, value: &Arc<i32>, reason| {
      seen_in.lock().unwrap().push((key.clone(), **value, reason));
    })
    .build()
    .unwrap();

  cache.set("a".to_string(), 1);
  cache.set("b".to_string(), 2); // evicts "a"
  cache.delete(&"b".to_string());

  let seen = seen.lock().unwrap();
  assert_eq!(seen[0], ("a".to_string(), 1, EvictionReason::Capacity));
  assert_eq!(seen[1], ("b".to_string(), 2, EvictionReason::Invalidated));
}

#[test]
fn test_set_and_get_callbacks() {
  let sets: Arc<Mutex<Vec<(Option<i32>, i32)>>> = Arc::new(Mutex::new(Vec::new()));
  let gets: Arc<Mutex<Vec<(String, bool)>>> = Arc::new(Mutex::new(Vec::new()));
  let sets_in = sets.clone();
  let gets_in = gets.clone();

  let cache: Cache<String, i32> = Cache::builder()
    .on_set(move |_key: &String, old: Option<&Arc<i32>>, new: &Arc<i32>| {
      sets_in.lock().unwrap().push((old.map(|v| **v), **new));
    })
    .on_get(move |key: &String, found| {
      gets_in.lock().unwrap().push((key.clone(), found));
    })
    .build()
    .unwrap();

  cache.set("k".to_string(), 1);
  cache.set("k".to_string(), 2);
  cache.get(&"k".to_string());
  cache.get(&"missing".to_string());

  assert_eq!(*sets.lock().unwrap(), vec![(None, 1), (Some(1), 2)]);
  assert_eq!(
    *gets.lock().unwrap(),
    vec![("k".to_string(), true), ("missing".to_string(), false)]
  );
}

#[test]
fn test_callbacks_may_reenter_the_cache() {
  // Callbacks fire after the lock is released, so calling back into a
  // cache from one must not deadlock.
  let other: Arc<Cache<String, i32>> = Arc::new(Cache::new());
  let other_in = other.clone();
  let observed = Arc::new(Mutex::new(None::<usize>));
  let observed_in = observed.clone();

  let cache: Cache<String, i32> = Cache::builder()
    .on_delete(move |key: &String, value: &Arc<i32>, _reason| {
      other_in.set(key.clone(), **value);
      *observed_in.lock().unwrap() = Some(other_in.len());
    })
    .build()
    .unwrap();

  cache.set("a".to_string(), 1);
  cache.delete(&"a".to_string());

  assert_eq!(*observed.lock().unwrap(), Some(1));
  assert_eq!(other.get(&"a".to_string()), Some(Arc::new(1)));
}

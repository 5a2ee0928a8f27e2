use cachet::{Cache, PolicyKind};

use std::sync::Arc;
use std::thread;

mod common;

#[test]
fn test_concurrent_mixed_operations() {
  let cache: Arc<Cache<u64, u64>> = Arc::new(
    Cache::builder()
      .maxsize(64)
      .policy(PolicyKind::Lru)
      .build()
      .unwrap(),
  );

  let mut handles = Vec::new();
  for t in 0..8u64 {
    let cache = cache.clone();
    handles.push(thread::spawn(move || {
      for i in 0..1_000u64 {
        let key = (t * 31 + i) % 200;
        match i % 5 {
          0 | 1 => cache.set(key, i),
          2 => {
            cache.get(&key);
          }
          3 => {
            cache.delete(&key);
          }
          _ => {
            cache.evict();
          }
        }
        assert!(cache.len() <= 64, "size bound violated");
      }
    }));
  }
  for handle in handles {
    handle.join().unwrap();
  }

  assert!(cache.len() <= 64);
  assert!(cache.stats().accesses() > 0);
}

#[test]
fn test_concurrent_add_first_writer_wins() {
  let cache: Arc<Cache<u64, u64>> = Arc::new(Cache::builder().unbounded().build().unwrap());

  let mut handles = Vec::new();
  for t in 0..8u64 {
    let cache = cache.clone();
    handles.push(thread::spawn(move || {
      let mut observed = Vec::with_capacity(100);
      for key in 0..100u64 {
        cache.add(key, t);
        observed.push((key, *cache.get(&key).unwrap()));
      }
      observed
    }));
  }
  let observations: Vec<Vec<(u64, u64)>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

  // The check and the insert are one atomic step, so the first inserted
  // value is never overwritten: every thread's post-add read matches the
  // final value.
  for (key, value) in observations.into_iter().flatten() {
    assert_eq!(*cache.get(&key).unwrap(), value, "key {key} changed after add");
  }
  assert_eq!(cache.len(), 100);
}

#[test]
fn test_concurrent_writers_settle_consistently() {
  let cache: Arc<Cache<u64, u64>> = Arc::new(Cache::builder().maxsize(50).build().unwrap());

  let mut handles = Vec::new();
  for t in 0..4u64 {
    let cache = cache.clone();
    handles.push(thread::spawn(move || {
      for key in 0..500u64 {
        cache.set(key % 100, t);
      }
    }));
  }
  for handle in handles {
    handle.join().unwrap();
  }

  // Every surviving value was written by one of the threads.
  assert!(cache.len() <= 50);
  for value in cache.values() {
    assert!(*value < 4);
  }
}

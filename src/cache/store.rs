//! In-memory query cache shared by every list view.
//!
//! Keys map to the last fetched result for `(family, params)`. Results are
//! authoritative until explicitly invalidated by a mutation on their family;
//! there is no time-based expiry and nothing survives a restart. Identical
//! in-flight fetches are de-duplicated, and completions are validated
//! against the newest ticket for their key so an abandoned response never
//! overwrites newer state.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::keys::{Family, QueryKey};

struct Entry {
  family: Family,
  description: String,
  /// Last applied result, serialized. Kept across invalidation so views can
  /// render the previous page while the refetch is in flight.
  data: Option<Value>,
  error: Option<String>,
  /// Explicitly invalidated; the next observer triggers a refetch.
  stale: bool,
  /// Ticket of the newest spawned fetch. Completions with an older ticket
  /// are discarded (last write wins).
  latest: u64,
  in_flight: bool,
}

impl Entry {
  fn new(key: &QueryKey) -> Self {
    Self {
      family: key.family,
      description: key.description(),
      data: None,
      error: None,
      stale: false,
      latest: 0,
      in_flight: false,
    }
  }
}

struct Inner {
  entries: HashMap<String, Entry>,
  /// Bumped on every visible state change; views re-decode when it moves.
  version: u64,
}

/// Snapshot of one key's state, decoded for the caller.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
  pub data: Option<T>,
  pub error: Option<String>,
  /// No usable data yet; render skeletons.
  pub is_loading: bool,
  /// Data present, background revalidation pending or in flight.
  pub is_refetching: bool,
}

/// Process-wide keyed cache with invalidation-on-mutation.
#[derive(Clone)]
pub struct QueryCache {
  inner: Arc<Mutex<Inner>>,
}

impl Default for QueryCache {
  fn default() -> Self {
    Self::new()
  }
}

impl QueryCache {
  pub fn new() -> Self {
    Self {
      inner: Arc::new(Mutex::new(Inner {
        entries: HashMap::new(),
        version: 0,
      })),
    }
  }

  fn lock(&self) -> MutexGuard<'_, Inner> {
    match self.inner.lock() {
      Ok(guard) => guard,
      Err(poisoned) => poisoned.into_inner(),
    }
  }

  /// Current change counter.
  pub fn version(&self) -> u64 {
    self.lock().version
  }

  /// Make sure `key` is being fetched if it has no fresh result.
  ///
  /// No-op when the key holds a fresh result, a not-yet-retried error, or an
  /// identical fetch is already in flight — the fetcher closure is only
  /// invoked when a fetch is actually spawned. An invalidated key with a
  /// fetch still outstanding spawns a superseding fetch; the older
  /// completion will be discarded by its stale ticket.
  pub fn ensure<T, F, Fut>(&self, key: &QueryKey, fetcher: F)
  where
    T: Serialize + Send + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    let hash = key.cache_hash();

    let ticket = {
      let mut inner = self.lock();
      let entry = inner
        .entries
        .entry(hash.clone())
        .or_insert_with(|| Entry::new(key));

      let settled = entry.data.is_some() || entry.error.is_some() || entry.in_flight;
      if settled && !entry.stale {
        return;
      }

      entry.latest += 1;
      entry.in_flight = true;
      entry.stale = false;
      let ticket = entry.latest;
      debug!(key = %entry.description, ticket, "spawning fetch");
      inner.version += 1;
      ticket
    };

    let future = fetcher();
    let inner = Arc::clone(&self.inner);
    tokio::spawn(async move {
      let result = future
        .await
        .and_then(|data| serde_json::to_value(&data).map_err(|e| e.to_string()));

      let mut inner = match inner.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
      };
      let Some(entry) = inner.entries.get_mut(&hash) else {
        return;
      };
      if ticket != entry.latest {
        debug!(key = %entry.description, ticket, "discarding superseded response");
        return;
      }

      entry.in_flight = false;
      match result {
        Ok(value) => {
          entry.data = Some(value);
          entry.error = None;
        }
        Err(message) => {
          // Keep any previous page; the view decides how to surface this.
          warn!(key = %entry.description, error = %message, "fetch failed");
          entry.error = Some(message);
        }
      }
      inner.version += 1;
    });
  }

  /// Decode the current state of `key`.
  ///
  /// A key that has never been ensured reports loading, matching the first
  /// render before the event loop ticks.
  pub fn snapshot<T: DeserializeOwned>(&self, key: &QueryKey) -> Snapshot<T> {
    let inner = self.lock();
    match inner.entries.get(&key.cache_hash()) {
      None => Snapshot {
        data: None,
        error: None,
        is_loading: true,
        is_refetching: false,
      },
      Some(entry) => {
        let data: Option<T> = entry
          .data
          .as_ref()
          .and_then(|value| serde_json::from_value(value.clone()).ok());
        Snapshot {
          is_loading: data.is_none() && entry.error.is_none(),
          is_refetching: data.is_some() && (entry.in_flight || entry.stale),
          error: entry.error.clone(),
          data,
        }
      }
    }
  }

  /// Mark every cached key belonging to one of `families` stale.
  ///
  /// Stale keys keep their data for stale-while-revalidate rendering; the
  /// next `ensure` on each spawns a fresh fetch.
  pub fn invalidate(&self, families: &[Family]) {
    let mut inner = self.lock();
    let mut marked = 0usize;
    for entry in inner.entries.values_mut() {
      if families.contains(&entry.family) {
        // Also makes a not-yet-retried error retryable
        entry.stale = true;
        marked += 1;
      }
    }
    if marked > 0 {
      debug!(?families, marked, "invalidated cached queries");
      inner.version += 1;
    }
  }

  /// Force a refetch of a single key (manual refresh).
  pub fn refetch(&self, key: &QueryKey) {
    let mut inner = self.lock();
    if let Some(entry) = inner.entries.get_mut(&key.cache_hash()) {
      entry.stale = true;
      inner.version += 1;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::keys::ListParams;
  use std::sync::atomic::{AtomicU32, Ordering};
  use std::time::Duration;

  fn counting_fetcher(
    counter: &Arc<AtomicU32>,
    result: Vec<u32>,
  ) -> impl FnOnce() -> std::pin::Pin<Box<dyn Future<Output = Result<Vec<u32>, String>> + Send>> {
    let counter = Arc::clone(counter);
    move || {
      counter.fetch_add(1, Ordering::SeqCst);
      Box::pin(async move { Ok(result) })
    }
  }

  async fn settle() {
    tokio::time::sleep(Duration::from_millis(25)).await;
  }

  #[tokio::test]
  async fn test_identical_keys_share_one_fetch() {
    let cache = QueryCache::new();
    let key = QueryKey::unfiltered(Family::Skills);
    let calls = Arc::new(AtomicU32::new(0));

    // Two observers of the same key within one tick
    cache.ensure(&key, counting_fetcher(&calls, vec![1, 2, 3]));
    cache.ensure(&key, counting_fetcher(&calls, vec![1, 2, 3]));
    settle().await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let snap: Snapshot<Vec<u32>> = cache.snapshot(&key);
    assert_eq!(snap.data, Some(vec![1, 2, 3]));
    assert!(!snap.is_loading);
  }

  #[tokio::test]
  async fn test_fresh_result_not_refetched() {
    let cache = QueryCache::new();
    let key = QueryKey::unfiltered(Family::Awards);
    let calls = Arc::new(AtomicU32::new(0));

    cache.ensure(&key, counting_fetcher(&calls, vec![1]));
    settle().await;
    cache.ensure(&key, counting_fetcher(&calls, vec![1]));
    settle().await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_invalidation_marks_whole_family_and_dependents() {
    let cache = QueryCache::new();
    let unfiltered = QueryKey::unfiltered(Family::Technologies);
    let filtered = QueryKey::new(
      Family::Technologies,
      ListParams::default().with_q("rust"),
    );
    let aggregate = QueryKey::unfiltered(Family::ProjectTechnologies);
    let unrelated = QueryKey::unfiltered(Family::Skills);
    let calls = Arc::new(AtomicU32::new(0));

    for key in [&unfiltered, &filtered, &aggregate, &unrelated] {
      cache.ensure(key, counting_fetcher(&calls, vec![1]));
    }
    settle().await;
    assert_eq!(calls.load(Ordering::SeqCst), 4);

    cache.invalidate(&Family::Technologies.invalidation_set());

    // Every key of the family and its dependent aggregate refetches
    for key in [&unfiltered, &filtered, &aggregate, &unrelated] {
      cache.ensure(key, counting_fetcher(&calls, vec![2]));
    }
    settle().await;
    assert_eq!(calls.load(Ordering::SeqCst), 7);

    let untouched: Snapshot<Vec<u32>> = cache.snapshot(&unrelated);
    assert_eq!(untouched.data, Some(vec![1]));
  }

  #[tokio::test]
  async fn test_stale_while_revalidate_keeps_previous_page() {
    let cache = QueryCache::new();
    let key = QueryKey::unfiltered(Family::Skills);

    cache.ensure(&key, || async { Ok(vec![1u32]) });
    settle().await;

    cache.invalidate(&[Family::Skills]);
    cache.ensure(&key, || async {
      tokio::time::sleep(Duration::from_millis(50)).await;
      Ok(vec![2u32])
    });

    // Previous page stays rendered while the refetch is in flight
    let during: Snapshot<Vec<u32>> = cache.snapshot(&key);
    assert_eq!(during.data, Some(vec![1]));
    assert!(during.is_refetching);
    assert!(!during.is_loading);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let after: Snapshot<Vec<u32>> = cache.snapshot(&key);
    assert_eq!(after.data, Some(vec![2]));
    assert!(!after.is_refetching);
  }

  #[tokio::test]
  async fn test_superseded_response_is_discarded() {
    let cache = QueryCache::new();
    let key = QueryKey::unfiltered(Family::Skills);

    // Slow fetch spawned first...
    cache.ensure(&key, || async {
      tokio::time::sleep(Duration::from_millis(80)).await;
      Ok(vec!["old".to_string()])
    });
    // ...superseded by an invalidation-triggered refetch that lands first
    cache.invalidate(&[Family::Skills]);
    cache.ensure(&key, || async { Ok(vec!["new".to_string()]) });

    tokio::time::sleep(Duration::from_millis(150)).await;
    let snap: Snapshot<Vec<String>> = cache.snapshot(&key);
    assert_eq!(snap.data, Some(vec!["new".to_string()]));
  }

  #[tokio::test]
  async fn test_failed_refetch_keeps_previous_data() {
    let cache = QueryCache::new();
    let key = QueryKey::unfiltered(Family::Skills);

    cache.ensure(&key, || async { Ok(vec![1u32]) });
    settle().await;
    cache.invalidate(&[Family::Skills]);
    cache.ensure(&key, || async { Err::<Vec<u32>, _>("boom".to_string()) });
    settle().await;

    let snap: Snapshot<Vec<u32>> = cache.snapshot(&key);
    assert_eq!(snap.data, Some(vec![1]));
    assert_eq!(snap.error.as_deref(), Some("boom"));
  }

  #[tokio::test]
  async fn test_error_not_retried_until_invalidated() {
    let cache = QueryCache::new();
    let key = QueryKey::unfiltered(Family::Skills);
    let calls = Arc::new(AtomicU32::new(0));

    let failing = |counter: &Arc<AtomicU32>| {
      let counter = Arc::clone(counter);
      move || {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { Err::<Vec<u32>, _>("down".to_string()) }
      }
    };

    cache.ensure(&key, failing(&calls));
    settle().await;
    cache.ensure(&key, failing(&calls));
    settle().await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Manual refresh retries
    cache.refetch(&key);
    cache.ensure(&key, failing(&calls));
    settle().await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }
}

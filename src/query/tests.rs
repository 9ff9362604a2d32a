//! Query State Tests
//!
//! Timing-sensitive cases run on a paused clock.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use super::*;

/// Fetcher that answers with its call number after `delays[call - 1]` ms
fn counting_fetcher(
    delays: &'static [u64],
) -> (Arc<AtomicU32>, impl Fn(String) -> QueryFuture<u32> + Send + Sync + 'static) {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let fetcher = move |_key: String| {
        let call = counter.fetch_add(1, Ordering::SeqCst) + 1;
        let delay = delays.get(call as usize - 1).copied().unwrap_or(0);
        Box::pin(async move {
            sleep(Duration::from_millis(delay)).await;
            Ok::<u32, ApiError>(call)
        }) as QueryFuture<u32>
    };
    (calls, fetcher)
}

#[tokio::test]
async fn test_new_query_is_idle() {
    let (calls, fetcher) = counting_fetcher(&[]);
    let query = Query::new("accounts", fetcher);

    let snapshot = query.snapshot();
    assert_eq!(snapshot.status, QueryStatus::Idle);
    assert!(!snapshot.is_loading);
    assert!(snapshot.data.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_mount_loads_data() {
    let (_, fetcher) = counting_fetcher(&[5]);
    let query = Query::new("accounts", fetcher);

    let handle = query.mount();
    assert!(query.is_loading());
    assert_eq!(query.status(), QueryStatus::Loading);

    handle.await.unwrap();
    assert_eq!(query.data(), Some(1));
    assert_eq!(query.status(), QueryStatus::Success);
    assert!(!query.is_loading());
    assert!(query.error().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_later_refetch_is_not_overwritten_by_slow_earlier_response() {
    let (_, fetcher) = counting_fetcher(&[100, 10]);
    let query = Query::new("accounts", fetcher);

    let first = query.mount();
    let second = query.refetch();

    second.await.unwrap();
    assert_eq!(query.data(), Some(2));
    assert!(!query.is_loading());

    first.await.unwrap();
    let snapshot = query.snapshot();
    assert_eq!(snapshot.data, Some(2));
    assert_eq!(snapshot.status, QueryStatus::Success);
    assert!(!snapshot.is_loading);
}

#[tokio::test(start_paused = true)]
async fn test_stays_loading_while_newest_fetch_runs() {
    let (_, fetcher) = counting_fetcher(&[10, 100]);
    let query = Query::new("accounts", fetcher);

    let first = query.mount();
    let second = query.refetch();

    first.await.unwrap();
    assert!(query.is_loading());
    assert_eq!(query.data(), None);

    second.await.unwrap();
    assert_eq!(query.data(), Some(2));
}

#[tokio::test]
async fn test_failure_keeps_previous_data() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let query = Query::new("goals", move |_key| {
        let call = counter.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if call == 1 {
                Ok(vec!["Car".to_string()])
            } else {
                Err(ApiError::Remote("status 500: boom".into()))
            }
        }
    });

    query.mount().await.unwrap();
    query.refetch().await.unwrap();

    let snapshot = query.snapshot();
    assert_eq!(snapshot.status, QueryStatus::Failure);
    assert_eq!(snapshot.data, Some(vec!["Car".to_string()]));
    assert_eq!(snapshot.error, Some(ApiError::Remote("status 500: boom".into())));
    assert!(!snapshot.is_loading);
}

#[tokio::test]
async fn test_refetch_clears_error_while_loading() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let query = Query::new("goals", move |_key| {
        let call = counter.fetch_add(1, Ordering::SeqCst) + 1;
        async move {
            if call == 1 {
                Err(ApiError::NotFound("saving_goals x".into()))
            } else {
                Ok(call)
            }
        }
    });

    query.mount().await.unwrap();
    assert!(query.error().is_some());

    let handle = query.refetch();
    assert!(query.error().is_none());
    assert!(query.is_loading());

    handle.await.unwrap();
    assert_eq!(query.data(), Some(2));
    assert_eq!(query.status(), QueryStatus::Success);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_surfaces_as_error() {
    let (_, fetcher) = counting_fetcher(&[10_000]);
    let options = QueryOptions {
        timeout: Some(Duration::from_secs(1)),
    };
    let query = Query::with_options("accounts", fetcher, options);

    query.mount().await.unwrap();

    let snapshot = query.snapshot();
    assert_eq!(snapshot.error, Some(ApiError::Timeout(Duration::from_secs(1))));
    assert_eq!(snapshot.status, QueryStatus::Failure);
    assert!(!snapshot.is_loading);
}

#[tokio::test]
async fn test_set_key_refetches_only_on_change() {
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let log = seen.clone();
    let query = Query::new("2025-01", move |key: String| {
        log.lock().unwrap().push(key.clone());
        async move { Ok::<_, ApiError>(key.len()) }
    });

    query.mount().await.unwrap();
    assert!(query.set_key("2025-01").is_none());

    query.set_key("2025-02").unwrap().await.unwrap();

    assert_eq!(query.key(), "2025-02");
    assert_eq!(*seen.lock().unwrap(), vec!["2025-01", "2025-02"]);
}

#[tokio::test]
async fn test_subscribers_observe_transitions() {
    let (_, fetcher) = counting_fetcher(&[0]);
    let query = Query::new("accounts", fetcher);
    let mut receiver = query.subscribe();

    query.mount();
    let settled = query.settled().await;

    assert_eq!(settled.data, Some(1));
    assert!(receiver.has_changed().unwrap());
    assert_eq!(receiver.borrow_and_update().status, QueryStatus::Success);
}

#[tokio::test]
async fn test_clones_share_state() {
    let (_, fetcher) = counting_fetcher(&[0]);
    let query = Query::new("accounts", fetcher);
    let other = query.clone();

    other.mount().await.unwrap();

    assert_eq!(query.data(), Some(1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refetches_from_clones_always_settle() {
    let (calls, fetcher) = counting_fetcher(&[]);
    let query = Query::new("accounts", fetcher);

    let tasks: Vec<_> = (0..64)
        .map(|_| {
            let query = query.clone();
            tokio::spawn(async move { query.refetch().await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let snapshot = tokio::time::timeout(Duration::from_secs(5), query.settled())
        .await
        .expect("query stuck in Loading");
    assert!(!snapshot.is_loading);
    assert_eq!(snapshot.status, QueryStatus::Success);
    assert_eq!(calls.load(Ordering::SeqCst), 64);
}

use super::*;
use crate::position::PositionReport;
use crate::snapshot::SnapshotSource;
use chrono::{Duration, Utc};
use std::sync::Arc;
use std::thread;

#[test]
fn test_upsert_creates_record() {
    let store = PositionStore::new();

    let record = store.upsert(PositionReport::new("d1", -17.8, 31.0));

    assert_eq!(record.id, "d1");
    assert_eq!(record.lat, -17.8);
    assert_eq!(record.lng, 31.0);
    assert_eq!(store.get("d1").unwrap(), record);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_upsert_replaces_existing_record() {
    let store = PositionStore::new();

    store.upsert(PositionReport::new("d1", -17.8, 31.0));
    store.upsert(PositionReport::new("d1", -17.81, 31.01));

    assert_eq!(store.len(), 1);
    let record = store.get("d1").unwrap();
    assert_eq!(record.lat, -17.81);
    assert_eq!(record.lng, 31.01);
}

#[test]
fn test_upsert_same_payload_is_idempotent() {
    let store = PositionStore::new();

    store.upsert(PositionReport::new("d1", 1.0, 2.0));
    store.upsert(PositionReport::new("d1", 1.0, 2.0));

    let all = store.all();
    assert_eq!(all.len(), 1);
    assert_eq!((all[0].lat, all[0].lng), (1.0, 2.0));
}

#[test]
fn test_get_nonexistent_record() {
    let store = PositionStore::new();
    assert!(store.get("nobody").is_none());
    assert!(store.is_empty());
}

#[test]
fn test_all_is_sorted_by_id() {
    let store = PositionStore::new();
    store.upsert(PositionReport::new("c", 0.0, 0.0));
    store.upsert(PositionReport::new("a", 0.0, 0.0));
    store.upsert(PositionReport::new("b", 0.0, 0.0));

    let ids: Vec<String> = store.all().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[test]
fn test_store_is_a_snapshot_source() {
    let store = PositionStore::new();
    store.upsert(PositionReport::new("a", 1.0, 1.0));

    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "a");
}

#[test]
fn test_evict_older_than_removes_only_stale() {
    let store = PositionStore::new();
    store.upsert(PositionReport::new("old", 0.0, 0.0));

    // Everything so far is older than a cutoff in the future
    let cutoff = Utc::now() + Duration::seconds(1);
    let evicted = store.evict_older_than(cutoff);

    assert_eq!(evicted, vec!["old".to_string()]);
    assert!(store.is_empty());
}

#[test]
fn test_evict_keeps_fresh_records() {
    let store = PositionStore::new();
    store.upsert(PositionReport::new("fresh", 0.0, 0.0));

    let cutoff = Utc::now() - Duration::seconds(60);
    assert!(store.evict_older_than(cutoff).is_empty());
    assert_eq!(store.len(), 1);
}

#[test]
fn test_concurrent_producers_distinct_ids() {
    let store = Arc::new(PositionStore::new());
    let mut handles = vec![];

    for id in ["a", "b"] {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            store.upsert(PositionReport::new(id, -17.8, 31.0));
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    let ids: Vec<String> = store.all().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn test_concurrent_updates_same_id_leave_one_record() {
    let store = Arc::new(PositionStore::new());
    let mut handles = vec![];

    for i in 0..10 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            store.upsert(PositionReport::new("shared", i as f64, i as f64));
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_sweeper_evicts_and_announces() {
    use crate::hub::{BroadcastHub, HubEvent};
    use crate::ingest::UpdateIngest;
    use std::time::Duration as StdDuration;

    let store = Arc::new(PositionStore::new());
    let hub = Arc::new(BroadcastHub::default());
    let ingest = Arc::new(UpdateIngest::new(Arc::clone(&store), Arc::clone(&hub)));
    let mut sub = hub.subscribe();

    store.upsert(PositionReport::new("idle", 0.0, 0.0));
    tokio::time::sleep(StdDuration::from_millis(20)).await;

    let sweeper = tokio::spawn(run_eviction_sweeper(
        Arc::clone(&ingest),
        StdDuration::from_millis(1),
        StdDuration::from_millis(10),
    ));

    let event = tokio::time::timeout(StdDuration::from_secs(1), sub.recv())
        .await
        .expect("no eviction broadcast");
    assert_eq!(event, Some(HubEvent::Evicted { id: "idle".into() }));
    assert!(store.is_empty());

    sweeper.abort();
}

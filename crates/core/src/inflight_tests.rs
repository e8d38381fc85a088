// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn entry(id: &str, worker: &str, started_at_ms: u64) -> InFlightEntry {
    InFlightEntry::new(JobId::new(id), WorkerId::new(worker), started_at_ms)
}

#[test]
fn snapshot_orders_oldest_first() {
    let snapshot = Snapshot::new(
        500,
        vec![
            entry("c", "dispatcher-1", 300),
            entry("a", "dispatcher-2", 100),
            entry("b", "dispatcher-3", 100),
        ],
    );

    let ids: Vec<&str> = snapshot.entries().iter().map(|e| e.job_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(snapshot.len(), 3);
    assert!(snapshot.contains("b"));
    assert!(!snapshot.contains("z"));
}

#[test]
fn empty_snapshot() {
    let snapshot = Snapshot::default();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.len(), 0);
}

#[test]
fn elapsed_saturates_when_clock_is_behind() {
    let e = entry("a", "dispatcher-1", 1_000);
    assert_eq!(e.elapsed_ms(1_750), 750);
    assert_eq!(e.elapsed_ms(900), 0);
}

#[test]
fn entry_serializes_with_plain_ids() {
    let json = serde_json::to_value(entry("msg-9", "dispatcher-1", 7)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "job_id": "msg-9",
            "worker": "dispatcher-1",
            "started_at_ms": 7
        })
    );
}

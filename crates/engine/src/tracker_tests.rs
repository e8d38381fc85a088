// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sqsd_core::test_support::entry;
use std::sync::atomic::{AtomicBool, Ordering};

#[test]
fn register_then_unregister() {
    let tracker = JobTracker::new();
    tracker.register(entry("a", "dispatcher-1", 10)).unwrap();
    tracker.register(entry("b", "dispatcher-2", 20)).unwrap();
    assert_eq!(tracker.count(), 2);

    let removed = tracker.unregister(&JobId::new("a")).unwrap();
    assert_eq!(removed.worker, "dispatcher-1");
    assert_eq!(tracker.count(), 1);
}

#[test]
fn duplicate_registration_is_rejected() {
    let tracker = JobTracker::new();
    tracker.register(entry("a", "dispatcher-1", 10)).unwrap();

    let err = tracker.register(entry("a", "dispatcher-2", 11)).unwrap_err();
    assert_eq!(err, TrackerError::AlreadyRegistered(JobId::new("a")));
    assert_eq!(tracker.snapshot(0).entries()[0].worker, "dispatcher-1");
}

#[test]
fn unregistering_unknown_job_fails() {
    let tracker = JobTracker::new();
    assert_eq!(
        tracker.unregister(&JobId::new("ghost")),
        Err(TrackerError::NotRegistered(JobId::new("ghost")))
    );
}

#[test]
fn snapshot_is_unaffected_by_later_mutation() {
    let tracker = JobTracker::new();
    tracker.register(entry("a", "dispatcher-1", 10)).unwrap();
    let snapshot = tracker.snapshot(99);

    tracker.unregister(&JobId::new("a")).unwrap();
    tracker.register(entry("b", "dispatcher-1", 20)).unwrap();

    assert_eq!(snapshot.taken_at_ms, 99);
    assert!(snapshot.contains("a"));
    assert!(!snapshot.contains("b"));
}

#[test]
fn concurrent_workers_and_snapshots_stay_consistent() {
    const WORKERS: usize = 8;
    const ROUNDS: usize = 500;

    let tracker = JobTracker::new();
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let tracker = tracker.clone();
        let done = Arc::clone(&done);
        std::thread::spawn(move || {
            let mut max_seen = 0;
            while !done.load(Ordering::SeqCst) {
                let snapshot = tracker.snapshot(0);
                assert!(snapshot.len() <= WORKERS);
                max_seen = max_seen.max(snapshot.len());
            }
            max_seen
        })
    };

    let workers: Vec<_> = (0..WORKERS)
        .map(|w| {
            let tracker = tracker.clone();
            std::thread::spawn(move || {
                for round in 0..ROUNDS {
                    let job = format!("w{w}-r{round}");
                    tracker
                        .register(entry(&job, &format!("dispatcher-{w}"), round as u64))
                        .unwrap();
                    tracker.unregister(&JobId::new(job)).unwrap();
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }
    done.store(true, Ordering::SeqCst);
    let max_seen = reader.join().unwrap();

    assert!(max_seen <= WORKERS);
    assert_eq!(tracker.count(), 0);
}

mod model {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[derive(Debug, Clone)]
    enum Op {
        Register(u8),
        Unregister(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..6).prop_map(Op::Register),
            (0u8..6).prop_map(Op::Unregister),
        ]
    }

    proptest! {
        #[test]
        fn tracker_matches_set_model(ops in proptest::collection::vec(op(), 0..64)) {
            let tracker = JobTracker::new();
            let mut model = BTreeSet::new();

            for (step, op) in ops.into_iter().enumerate() {
                match op {
                    Op::Register(n) => {
                        let id = format!("job-{n}");
                        let result = tracker.register(entry(&id, "dispatcher-1", step as u64));
                        prop_assert_eq!(result.is_ok(), model.insert(id));
                    }
                    Op::Unregister(n) => {
                        let id = format!("job-{n}");
                        let result = tracker.unregister(&JobId::new(id.as_str()));
                        prop_assert_eq!(result.is_ok(), model.remove(&id));
                    }
                }
                prop_assert_eq!(tracker.count(), model.len());
            }

            let snapshot = tracker.snapshot(0);
            let ids: BTreeSet<String> = snapshot
                .entries()
                .iter()
                .map(|e| e.job_id.to_string())
                .collect();
            prop_assert_eq!(ids, model);
        }
    }
}

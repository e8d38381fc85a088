// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sqsd_daemon::WorkingEntry;

fn entry(id: &str, worker: &str, started_at_ms: u64) -> WorkingEntry {
    WorkingEntry {
        id: id.to_string(),
        started_at_ms,
        worker: worker.to_string(),
    }
}

fn render(workings: &Workings) -> String {
    let mut buf = Vec::new();
    table(workings, Table::with_color(columns(), false))
        .render(&mut buf)
        .unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn rows_follow_snapshot_order() {
    let workings = Workings {
        taken_at_ms: 1_700_000_125_000,
        jobs: vec![
            entry("msg-1", "dispatcher-2", 1_700_000_000_000),
            entry("msg-7", "dispatcher-1", 1_700_000_124_500),
        ],
    };

    let out = render(&workings);
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("ID"));
    assert!(lines[1].starts_with("msg-1  dispatcher-2"), "{}", lines[1]);
    assert!(lines[1].contains(" 2m "), "{}", lines[1]);
    assert!(lines[2].contains("500ms"), "{}", lines[2]);
    assert!(lines[2].ends_with("1700000124500"));
}

#[test]
fn no_jobs_renders_nothing() {
    let workings = Workings {
        taken_at_ms: 1,
        jobs: vec![],
    };
    assert_eq!(render(&workings), "");
}

#[test]
fn json_shape() {
    let workings = Workings {
        taken_at_ms: 10,
        jobs: vec![entry("msg-1", "dispatcher-1", 5)],
    };
    let value = serde_json::to_value(&workings).unwrap();
    assert_eq!(value["taken_at_ms"], 10);
    assert_eq!(value["jobs"][0]["id"], "msg-1");
    assert_eq!(value["jobs"][0]["worker"], "dispatcher-1");
}

//! Engine Contract Test: Reconcile Decisions
//!
//! Verifies the add / replace / no-op decision rule end to end through
//! the engine, including the exact shape of the mutation issued.
//!
//! Constraints verified:
//! - Empty snapshot → one mutation adding (ip/32, label)
//! - Stale labeled entry → one mutation that adds the new prefix and
//!   removes the old one in the same call, never two calls
//! - Converged labeled entry → no mutation at all

mod common;

use common::*;
use plsync_core::{ReconcileDecision, SyncConfig, SyncEngine, VersionToken};

fn engine_for(store: MockStore, label: &str) -> SyncEngine {
    let config = SyncConfig::new("pl-0a1b2c").with_description(label);
    SyncEngine::new(
        Box::new(FixedIpSource::new(ip("203.0.113.7"))),
        Box::new(store),
        config,
    )
    .expect("engine construction succeeds")
}

#[tokio::test]
async fn empty_snapshot_adds_one_entry() {
    // Scenario: fresh list, our label nowhere to be found

    let (store, recorder) = MockStore::new("pl-0a1b2c", 3, vec![]);
    let engine = engine_for(store, "home-ip");

    let report = engine.run().await.expect("run succeeds");

    assert!(matches!(report.decision, ReconcileDecision::Add { .. }));
    assert!(report.mutated);
    assert_eq!(report.new_version, Some(VersionToken(4)));

    let calls = recorder.modify_calls();
    assert_eq!(calls.len(), 1, "expected exactly one modify call");
    assert_eq!(calls[0].add, vec![entry("203.0.113.7/32", "home-ip")]);
    assert!(calls[0].remove.is_empty());
}

#[tokio::test]
async fn stale_entry_is_replaced_in_one_call() {
    // Scenario: label present with an outdated prefix

    let (store, recorder) = MockStore::new(
        "pl-0a1b2c",
        7,
        vec![
            entry("192.0.2.0/24", "office"),
            entry("198.51.100.2/32", "home-ip"),
        ],
    );
    let engine = engine_for(store, "home-ip");

    let report = engine.run().await.expect("run succeeds");

    assert!(matches!(report.decision, ReconcileDecision::Replace { .. }));

    let calls = recorder.modify_calls();
    assert_eq!(
        calls.len(),
        1,
        "replace must be a single atomic add+remove call"
    );
    assert_eq!(calls[0].add, vec![entry("203.0.113.7/32", "home-ip")]);
    assert_eq!(calls[0].remove, vec![entry("198.51.100.2/32", "home-ip")]);
}

#[tokio::test]
async fn converged_entry_is_left_alone() {
    // Scenario: the labeled entry already holds the resolved address

    let (store, recorder) = MockStore::new(
        "pl-0a1b2c",
        7,
        vec![entry("203.0.113.7/32", "home-ip")],
    );
    let engine = engine_for(store, "home-ip");

    let report = engine.run().await.expect("run succeeds");

    assert_eq!(
        report.decision,
        ReconcileDecision::NoOp {
            cidr: "203.0.113.7/32".into()
        }
    );
    assert!(!report.mutated);
    assert_eq!(report.new_version, None);
    assert_eq!(
        recorder.modify_call_count(),
        0,
        "no-op must not issue any mutation"
    );
}

#[tokio::test]
async fn repeated_runs_stay_idempotent() {
    // Idempotence: unchanged inputs keep choosing NoOp, run after run

    let (store, recorder) = MockStore::new(
        "pl-0a1b2c",
        7,
        vec![entry("203.0.113.7/32", "home-ip")],
    );
    let engine = engine_for(store, "home-ip");

    for _ in 0..3 {
        let report = engine.run().await.expect("run succeeds");
        assert!(!report.mutated);
    }

    assert_eq!(recorder.modify_call_count(), 0);
    assert_eq!(recorder.describe_call_count(), 3, "each run reads fresh");
}

#[tokio::test]
async fn unknown_list_id_fails_the_run() {
    let (store, recorder) = MockStore::new("pl-other", 1, vec![]);
    let config = SyncConfig::new("pl-missing").with_description("home-ip");
    let engine = SyncEngine::new(
        Box::new(FixedIpSource::new(ip("203.0.113.7"))),
        Box::new(store),
        config,
    )
    .expect("engine construction succeeds");

    let err = engine.run().await.expect_err("run must fail");
    assert!(err.is_remote());
    assert_eq!(recorder.modify_call_count(), 0);
}

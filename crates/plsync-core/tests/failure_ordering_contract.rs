//! Engine Contract Test: Failure Ordering
//!
//! IP resolution is a hard prerequisite. When the lookup fails the run
//! aborts before touching the remote list API at all.

mod common;

use common::*;
use plsync_core::{Error, SyncConfig, SyncEngine};

#[tokio::test]
async fn failed_ip_lookup_makes_no_remote_calls() {
    let (store, recorder) = MockStore::new("pl-0a1b2c", 7, vec![]);

    let engine = SyncEngine::new(
        Box::new(FailingIpSource),
        Box::new(store),
        SyncConfig::new("pl-0a1b2c").with_description("home-ip"),
    )
    .expect("engine construction succeeds");

    let err = engine.run().await.expect_err("run must fail");

    assert!(matches!(err, Error::Network(_)), "unexpected error: {err}");
    assert_eq!(recorder.describe_call_count(), 0);
    assert_eq!(recorder.entries_call_count(), 0);
    assert_eq!(recorder.modify_call_count(), 0);
}

#[tokio::test]
async fn invalid_config_is_rejected_before_any_call() {
    let (store, recorder) = MockStore::new("pl-0a1b2c", 7, vec![]);

    let result = SyncEngine::new(
        Box::new(FixedIpSource::new(ip("203.0.113.7"))),
        Box::new(store),
        SyncConfig::new(""),
    );

    assert!(matches!(result, Err(Error::Config(_))));
    assert_eq!(recorder.describe_call_count(), 0);
}

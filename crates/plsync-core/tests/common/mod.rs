//! Test doubles and common utilities for engine contract tests
//!
//! These doubles record every call so tests can assert not just the
//! engine's decision but exactly which remote operations it issued.

// Each test binary compiles this module separately and uses a subset.
#![allow(dead_code)]

use plsync_core::error::{Error, Result};
use plsync_core::model::{AllowListEntry, VersionToken};
use plsync_core::traits::{AllowListStore, ListDescription, PublicIpSource};
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A PublicIpSource that always resolves to a fixed address
pub struct FixedIpSource {
    ip: IpAddr,
    call_count: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PublicIpSource for FixedIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }
}

/// A PublicIpSource whose lookup always fails (simulated timeout)
pub struct FailingIpSource;

#[async_trait::async_trait]
impl PublicIpSource for FailingIpSource {
    async fn current(&self) -> Result<IpAddr> {
        Err(Error::network("request timed out"))
    }
}

/// One recorded modify call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyCall {
    pub list_id: String,
    pub current_version: VersionToken,
    pub add: Vec<AllowListEntry>,
    pub remove: Vec<AllowListEntry>,
}

/// Shared counters/recordings so tests keep access after boxing the store
#[derive(Clone, Default)]
pub struct StoreRecorder {
    describe_calls: Arc<AtomicUsize>,
    entries_calls: Arc<AtomicUsize>,
    modify_calls: Arc<Mutex<Vec<ModifyCall>>>,
}

impl StoreRecorder {
    pub fn describe_call_count(&self) -> usize {
        self.describe_calls.load(Ordering::SeqCst)
    }

    pub fn entries_call_count(&self) -> usize {
        self.entries_calls.load(Ordering::SeqCst)
    }

    pub fn modify_calls(&self) -> Vec<ModifyCall> {
        self.modify_calls.lock().unwrap().clone()
    }

    pub fn modify_call_count(&self) -> usize {
        self.modify_calls.lock().unwrap().len()
    }
}

/// A mock AllowListStore with preset remote state
pub struct MockStore {
    list_id: String,
    version: VersionToken,
    entries: Vec<AllowListEntry>,
    /// When true, every modify call is rejected with a version conflict
    reject_modify: bool,
    recorder: StoreRecorder,
}

impl MockStore {
    pub fn new(
        list_id: impl Into<String>,
        version: i64,
        entries: Vec<AllowListEntry>,
    ) -> (Self, StoreRecorder) {
        let recorder = StoreRecorder::default();
        let store = Self {
            list_id: list_id.into(),
            version: VersionToken(version),
            entries,
            reject_modify: false,
            recorder: recorder.clone(),
        };
        (store, recorder)
    }

    /// Simulate a concurrent writer: reject every mutation as stale
    pub fn rejecting_modify(mut self) -> Self {
        self.reject_modify = true;
        self
    }
}

#[async_trait::async_trait]
impl AllowListStore for MockStore {
    async fn describe(&self, list_id: &str) -> Result<ListDescription> {
        self.recorder.describe_calls.fetch_add(1, Ordering::SeqCst);

        if list_id != self.list_id {
            return Err(Error::not_found(list_id));
        }

        Ok(ListDescription {
            id: self.list_id.clone(),
            name: Some("test-list".to_string()),
            version: self.version,
        })
    }

    async fn entries(&self, list_id: &str, _max_results: u32) -> Result<Vec<AllowListEntry>> {
        self.recorder.entries_calls.fetch_add(1, Ordering::SeqCst);

        if list_id != self.list_id {
            return Err(Error::not_found(list_id));
        }

        Ok(self.entries.clone())
    }

    async fn modify(
        &self,
        list_id: &str,
        current_version: VersionToken,
        add: &[AllowListEntry],
        remove: &[AllowListEntry],
    ) -> Result<VersionToken> {
        self.recorder.modify_calls.lock().unwrap().push(ModifyCall {
            list_id: list_id.to_string(),
            current_version,
            add: add.to_vec(),
            remove: remove.to_vec(),
        });

        if self.reject_modify || current_version != self.version {
            return Err(Error::VersionConflict {
                list_id: list_id.to_string(),
                presented: current_version.0,
            });
        }

        Ok(VersionToken(self.version.0 + 1))
    }
}

/// Parse an address literal, panicking on bad fixtures
pub fn ip(s: &str) -> IpAddr {
    s.parse().expect("valid test address")
}

/// Entry fixture shorthand
pub fn entry(cidr: &str, description: &str) -> AllowListEntry {
    AllowListEntry::new(cidr, Some(description.to_string()))
}

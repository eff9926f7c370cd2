//! Data model for the allow-list resource
//!
//! These types mirror what the remote API returns: a prefix list is an
//! ordered set of CIDR entries plus a monotonically advancing version
//! number used as an optimistic-concurrency token.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Opaque revision token for a prefix-list resource.
///
/// Every mutation must present the token read in the same run; the remote
/// API rejects the call if the live version has since advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(pub i64);

impl std::fmt::Display for VersionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One entry of the remote allow-list: a CIDR prefix plus an optional
/// description used as this tool's match key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowListEntry {
    /// Network prefix in CIDR notation (e.g. "203.0.113.7/32")
    pub cidr: String,

    /// Free-form description. The remote API does not enforce uniqueness;
    /// this tool treats it as a logical key (first match wins).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AllowListEntry {
    /// Create an entry from a CIDR prefix and an optional description
    pub fn new(cidr: impl Into<String>, description: Option<String>) -> Self {
        Self {
            cidr: cidr.into(),
            description,
        }
    }
}

/// Point-in-time view of the remote resource: all entries plus the
/// version token that was live when they were read.
///
/// Read fresh at the start of each run, never cached across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowListSnapshot {
    /// Version token live at read time
    pub version: VersionToken,

    /// Entries in remote order
    pub entries: Vec<AllowListEntry>,
}

/// What the reconciler decided to do for one run.
///
/// Derived purely from a snapshot and the resolved address; computed and
/// consumed within a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileDecision {
    /// The labeled entry already holds the resolved address
    NoOp {
        /// The prefix already present
        cidr: String,
    },

    /// No entry carries the label; add a fresh one
    Add {
        /// The entry to add
        entry: AllowListEntry,
    },

    /// A labeled entry exists with a stale prefix; swap it out in one
    /// atomic mutation
    Replace {
        /// The stale entry to remove
        old: AllowListEntry,
        /// The replacement entry to add
        new: AllowListEntry,
    },
}

impl ReconcileDecision {
    /// Whether applying this decision requires a mutation call
    pub fn mutates(&self) -> bool {
        !matches!(self, Self::NoOp { .. })
    }
}

/// Format an address as a single-host prefix: "/32" for IPv4, "/128"
/// for IPv6.
pub fn host_prefix(addr: IpAddr) -> String {
    match addr {
        IpAddr::V4(v4) => format!("{v4}/32"),
        IpAddr::V6(v6) => format!("{v6}/128"),
    }
}

/// Find the first entry whose description equals `label`.
///
/// The comparison is literal: an absent label only matches entries with
/// no description. Multiple entries may carry the same description in
/// the remote system; first match wins and ties are not otherwise
/// broken.
pub fn find_labeled<'a>(
    entries: &'a [AllowListEntry],
    label: Option<&str>,
) -> Option<&'a AllowListEntry> {
    entries.iter().find(|e| e.description.as_deref() == label)
}

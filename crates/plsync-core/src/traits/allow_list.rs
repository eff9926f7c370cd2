// # Allow-List Store Trait
//
// Defines the interface for the remote prefix-list management API.
//
// ## Implementations
//
// - JSON-over-HTTPS client: `plsync-provider-http` crate
//
// ## Operations
//
// The remote API offers exactly three operations, and the engine needs
// no more:
//
// 1. `describe`: current metadata for a list, including its version
//    token
// 2. `entries`: the list's entries, up to a page-size cap
// 3. `modify`: atomically apply add/remove operations, conditioned on a
//    version token
//
// ## Versioning contract
//
// `modify` is the only mutation and it is guarded: the call presents
// the version token read earlier in the same run, and the remote
// resource MUST atomically reject the mutation if its live version has
// advanced. Implementations surface that rejection as
// `Error::VersionConflict`; they never retry or re-read on conflict.

use crate::model::{AllowListEntry, VersionToken};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Metadata describing a prefix-list resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDescription {
    /// Resource id
    pub id: String,

    /// Human-readable resource name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Version token live at describe time
    pub version: VersionToken,
}

/// Trait for remote allow-list API implementations
///
/// Implementations are stateless single-shot clients: one API call per
/// method invocation, errors propagated to the engine, no retry or
/// backoff, no caching.
#[async_trait]
pub trait AllowListStore: Send + Sync {
    /// Describe a prefix-list resource, returning its current version
    /// token among other metadata
    async fn describe(&self, list_id: &str) -> Result<ListDescription, crate::Error>;

    /// Read the entries of a prefix-list resource
    ///
    /// Requests at most `max_results` entries. The engine does not
    /// paginate; lists larger than the cap are truncated.
    async fn entries(
        &self,
        list_id: &str,
        max_results: u32,
    ) -> Result<Vec<AllowListEntry>, crate::Error>;

    /// Atomically apply add/remove operations to a prefix-list resource
    ///
    /// `current_version` is the optimistic-concurrency precondition: if
    /// the live version differs, the remote rejects the whole call and
    /// the implementation returns `Error::VersionConflict`. On success,
    /// returns the resource's new version token.
    async fn modify(
        &self,
        list_id: &str,
        current_version: VersionToken,
        add: &[AllowListEntry],
        remove: &[AllowListEntry],
    ) -> Result<VersionToken, crate::Error>;
}

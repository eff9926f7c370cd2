// # plsync-core
//
// Core library for the prefix-list IP reconciler.
//
// ## Architecture Overview
//
// This library provides the core functionality for keeping one labeled
// entry of a remote allow-list in sync with the caller's public IP:
// - **PublicIpSource**: Trait for resolving the current public address
// - **AllowListStore**: Trait for the remote prefix-list API
//   (describe / entries / version-guarded modify)
// - **SyncEngine**: Run-to-completion engine that resolves, snapshots,
//   decides and conditionally mutates
//
// ## Design Principles
//
// 1. **Separation of Concerns**: decision logic is separate from the
//    HTTP integrations, which live in their own crates
// 2. **Run-to-completion**: one linear pass per invocation, no retries,
//    no background work; an external scheduler provides periodicity
// 3. **Optimistic concurrency**: every mutation carries the version
//    token read in the same run, so a stale run loses instead of
//    clobbering a concurrent writer

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod traits;

// Re-export core types for convenience
pub use config::SyncConfig;
pub use engine::{RunReport, SyncEngine, plan};
pub use error::{Error, Result};
pub use model::{
    AllowListEntry, AllowListSnapshot, ReconcileDecision, VersionToken, find_labeled, host_prefix,
};
pub use traits::{AllowListStore, ListDescription, PublicIpSource};

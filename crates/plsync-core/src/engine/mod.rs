//! Core reconciliation engine
//!
//! The SyncEngine is responsible for:
//! - Resolving the current public IP via PublicIpSource
//! - Reading a snapshot (entries + version token) via AllowListStore
//! - Deciding between NoOp, Add and Replace
//! - Applying the decision with the snapshot's version as precondition
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐      ┌──────────────┐      ┌────────────────┐
//! │ PublicIpSource │ ───► │  SyncEngine  │ ───► │ AllowListStore │
//! │  (resolve IP)  │      │   (decide)   │      │ (read, modify) │
//! └────────────────┘      └──────────────┘      └────────────────┘
//! ```
//!
//! ## Run flow
//!
//! 1. Resolve public IP (hard prerequisite, no fallback)
//! 2. Describe the resource → version token
//! 3. Read entries (same logical snapshot as the version)
//! 4. Plan: first entry matching the configured description wins
//! 5. NoOp → done; Add/Replace → one atomic modify call carrying the
//!    snapshot version
//!
//! A run is strictly sequential and one-way; a failed run is not
//! resumed, the next scheduled invocation starts fresh.

use crate::config::SyncConfig;
use crate::error::Result;
use crate::model::{
    AllowListEntry, AllowListSnapshot, ReconcileDecision, VersionToken, find_labeled, host_prefix,
};
use crate::traits::{AllowListStore, PublicIpSource};
use std::net::IpAddr;
use tracing::{debug, info};

/// Summary of one completed run, for logging and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// The resolved public address
    pub resolved_ip: IpAddr,

    /// The resolved address as a host prefix
    pub cidr: String,

    /// What the engine decided
    pub decision: ReconcileDecision,

    /// Whether a mutation call was issued (false for NoOp and dry-run)
    pub mutated: bool,

    /// Version token returned by the mutation, when one was issued
    pub new_version: Option<VersionToken>,
}

/// Decide what to do for one run.
///
/// Pure function over the snapshot entries: scan for the first entry
/// whose description equals `label`, then
/// - no match → Add
/// - match with the same prefix → NoOp
/// - match with a different prefix → Replace (add + remove in one call)
pub fn plan(
    entries: &[AllowListEntry],
    target: IpAddr,
    label: Option<&str>,
) -> ReconcileDecision {
    let cidr = host_prefix(target);

    match find_labeled(entries, label) {
        None => ReconcileDecision::Add {
            entry: AllowListEntry::new(cidr, label.map(str::to_owned)),
        },
        Some(existing) if existing.cidr == cidr => ReconcileDecision::NoOp { cidr },
        Some(existing) => ReconcileDecision::Replace {
            old: existing.clone(),
            new: AllowListEntry::new(cidr, label.map(str::to_owned)),
        },
    }
}

/// Run-to-completion reconciliation engine
///
/// Constructed once per run from a config value object and boxed
/// collaborator implementations; holds no state across runs.
pub struct SyncEngine {
    /// Public-IP source
    ip_source: Box<dyn PublicIpSource>,

    /// Remote allow-list client
    store: Box<dyn AllowListStore>,

    /// Reconciler configuration
    config: SyncConfig,
}

impl SyncEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: public-IP source implementation
    /// - `store`: remote allow-list client implementation
    /// - `config`: reconciler configuration (validated here)
    pub fn new(
        ip_source: Box<dyn PublicIpSource>,
        store: Box<dyn AllowListStore>,
        config: SyncConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ip_source,
            store,
            config,
        })
    }

    /// Run one reconciliation to completion
    ///
    /// # Returns
    ///
    /// - `Ok(RunReport)`: the run converged (NoOp or applied mutation)
    /// - `Err(Error)`: IP lookup or remote API failure; nothing to roll
    ///   back, all mutations are single atomic calls
    pub async fn run(&self) -> Result<RunReport> {
        let resolved_ip = self.ip_source.current().await?;
        info!("Current public IP address: {resolved_ip}");

        let snapshot = self.read_snapshot().await?;
        debug!(
            "Snapshot of {}: {} entries at version {}",
            self.config.prefix_list_id,
            snapshot.entries.len(),
            snapshot.version
        );

        let label = self.config.entry_description.as_deref();
        let decision = plan(&snapshot.entries, resolved_ip, label);
        let cidr = host_prefix(resolved_ip);

        let new_version = self.apply(&decision, snapshot.version).await?;

        Ok(RunReport {
            resolved_ip,
            cidr,
            mutated: new_version.is_some(),
            new_version,
            decision,
        })
    }

    /// Read version token and entries as one logical snapshot.
    ///
    /// Two API calls, version first; both belong to the same run and the
    /// version guards any mutation derived from the entries.
    async fn read_snapshot(&self) -> Result<AllowListSnapshot> {
        let description = self.store.describe(&self.config.prefix_list_id).await?;
        let entries = self
            .store
            .entries(&self.config.prefix_list_id, self.config.max_entries)
            .await?;

        Ok(AllowListSnapshot {
            version: description.version,
            entries,
        })
    }

    /// Apply a decision, returning the new version when a mutation was
    /// issued
    async fn apply(
        &self,
        decision: &ReconcileDecision,
        current_version: VersionToken,
    ) -> Result<Option<VersionToken>> {
        let list_id = &self.config.prefix_list_id;

        let (add, remove): (Vec<AllowListEntry>, Vec<AllowListEntry>) = match decision {
            ReconcileDecision::NoOp { cidr } => {
                info!("No update needed. Current IP {cidr} already in prefix list.");
                return Ok(None);
            }
            ReconcileDecision::Add { entry } => {
                info!("Adding new entry {} to prefix list {list_id}", entry.cidr);
                (vec![entry.clone()], Vec::new())
            }
            ReconcileDecision::Replace { old, new } => {
                info!(
                    "Updating existing entry from {} to {} in prefix list {list_id}",
                    old.cidr, new.cidr
                );
                (vec![new.clone()], vec![old.clone()])
            }
        };

        if self.config.dry_run {
            info!("Dry-run: skipping modify call against version {current_version}");
            return Ok(None);
        }

        let new_version = self
            .store
            .modify(list_id, current_version, &add, &remove)
            .await?;

        info!("Prefix list {list_id} now at version {new_version}");
        Ok(Some(new_version))
    }
}

//! Configuration types for the reconciler
//!
//! Configuration is a plain value object constructed once at process
//! start and passed into the engine; no component reads process state
//! (environment, globals) on its own.

use serde::{Deserialize, Serialize};

/// Default cap on the number of entries requested from the remote API.
///
/// The reader does not paginate; lists larger than this cap are not
/// fully visible to the reconciler.
pub const DEFAULT_MAX_ENTRIES: u32 = 100;

/// Reconciler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Id of the prefix-list resource to reconcile
    pub prefix_list_id: String,

    /// Description used as the logical key identifying "our" entry.
    /// `None` means entries without a description are matched.
    #[serde(default)]
    pub entry_description: Option<String>,

    /// Maximum entries to request when reading the snapshot
    #[serde(default = "default_max_entries")]
    pub max_entries: u32,

    /// Dry-run mode: read and decide, but never mutate
    #[serde(default)]
    pub dry_run: bool,
}

impl SyncConfig {
    /// Create a configuration for the given prefix list
    pub fn new(prefix_list_id: impl Into<String>) -> Self {
        Self {
            prefix_list_id: prefix_list_id.into(),
            entry_description: None,
            max_entries: DEFAULT_MAX_ENTRIES,
            dry_run: false,
        }
    }

    /// Set the entry description key
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.entry_description = Some(description.into());
        self
    }

    /// Set the entry page cap
    pub fn with_max_entries(mut self, max_entries: u32) -> Self {
        self.max_entries = max_entries;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.prefix_list_id.is_empty() {
            return Err(crate::Error::config("Prefix list id cannot be empty"));
        }
        if self.max_entries == 0 {
            return Err(crate::Error::config("Entry page cap must be > 0"));
        }
        Ok(())
    }
}

fn default_max_entries() -> u32 {
    DEFAULT_MAX_ENTRIES
}

//! Error types for the prefix-list reconciler
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for reconciler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the reconciler
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing or invalid values, detected before
    /// any network call)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Public-IP lookup failures (timeout, DNS, non-success status,
    /// unparseable response body)
    #[error("Network error: {0}")]
    Network(String),

    /// Prefix-list resource not found
    #[error("Prefix list not found: {0}")]
    NotFound(String),

    /// Credentials rejected by the remote API
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Mutation rejected because the resource version advanced since the
    /// snapshot was read
    #[error("Version conflict on {list_id}: presented version {presented}")]
    VersionConflict {
        /// Prefix-list resource id
        list_id: String,
        /// Version token presented with the rejected mutation
        presented: i64,
    },

    /// Any other failure from the remote list API
    #[error("Remote API error: {0}")]
    Remote(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an access-denied error
    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }

    /// Create a remote API error
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// True for errors coming from the remote list API (as opposed to
    /// configuration or IP-lookup failures)
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_)
                | Self::AccessDenied(_)
                | Self::VersionConflict { .. }
                | Self::Remote(_)
        )
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Remote(err.to_string())
    }
}

//! Trait definitions for the reconciler's external collaborators

pub mod allow_list;
pub mod ip_source;

pub use allow_list::{AllowListStore, ListDescription};
pub use ip_source::PublicIpSource;

// # Public IP Source Trait
//
// Defines the interface for resolving the caller's current public IP
// address.
//
// ## Implementations
//
// - HTTP echo service: `plsync-ip-http` crate
// - Future: STUN, router UPnP queries
//
// ## Usage
//
// ```rust,ignore
// use plsync_core::PublicIpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* PublicIpSource implementation */;
//     let current_ip = source.current().await?;
//     println!("Current public IP: {current_ip}");
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for public-IP source implementations
///
/// IP resolution is a hard prerequisite for a run: on failure the run
/// aborts before any remote-list call is made. Implementations must
/// bound the lookup with a transport-level timeout so the run cannot
/// hang indefinitely, and must not retry; a failed lookup fails the run
/// and the next scheduled invocation starts fresh.
#[async_trait]
pub trait PublicIpSource: Send + Sync {
    /// Resolve the caller's current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The current public address
    /// - `Err(Error::Network)`: If the lookup cannot be completed
    async fn current(&self) -> Result<IpAddr, crate::Error>;
}

// # HTTP Public IP Source
//
// This crate resolves the caller's public IP address by asking an
// external echo service (e.g. ifconfig.me, icanhazip.com) over HTTPS.
//
// ## Contract
//
// One outbound request per run, bounded by a short timeout so the whole
// run cannot hang. Any transport failure, non-success status or
// unparseable body fails the run; there is no fallback service and no
// retry.

use plsync_core::traits::PublicIpSource;
use plsync_core::{Error, Result};

use std::net::IpAddr;
use std::time::Duration;

/// Default echo service queried when none is configured
pub const DEFAULT_IP_URL: &str = "https://ifconfig.me";

/// Default lookup timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Known-good echo services returning the bare address as plain text
#[allow(dead_code)]
const KNOWN_IP_SERVICES: &[&str] = &[
    "https://ifconfig.me",
    "https://api.ipify.org",
    "https://icanhazip.com",
];

/// HTTP-based public IP source
pub struct HttpIpSource {
    /// URL of the echo service
    url: String,

    /// HTTP client (carries the lookup timeout)
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a source against the default echo service with the
    /// default timeout
    pub fn new() -> Result<Self> {
        Self::with_url(DEFAULT_IP_URL)
    }

    /// Create a source against a specific echo service URL
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    /// Create a source with a custom timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl PublicIpSource for HttpIpSource {
    async fn current(&self) -> Result<IpAddr> {
        tracing::debug!("Resolving public IP via {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("IP lookup request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::network(format!(
                "IP lookup returned HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read IP lookup response: {e}")))?;

        let ip_text = body.trim();
        ip_text
            .parse::<IpAddr>()
            .map_err(|_| Error::network(format!("Echo service returned non-address: {ip_text:?}")))
    }
}

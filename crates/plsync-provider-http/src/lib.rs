// # Managed Prefix List HTTP Client
//
// This crate implements `AllowListStore` against the prefix-list
// service's JSON management API.
//
// ## API Reference
//
// - Describe list:  GET  `/v1/prefix-lists/:id`
// - List entries:   GET  `/v1/prefix-lists/:id/entries?max_results=N`
// - Modify list:    POST `/v1/prefix-lists/:id/modify`
//
// The modify call carries `current_version` as an optimistic-concurrency
// precondition; the service answers 409 when the live version has
// advanced, and this client surfaces that as `Error::VersionConflict`
// without retrying.
//
// ## Status mapping
//
// - 404         → `Error::NotFound`
// - 401 / 403   → `Error::AccessDenied`
// - 409         → `Error::VersionConflict` (modify only)
// - other 4xx/5xx → `Error::Remote`
//
// ## Security Requirements
//
// - The secret access key NEVER appears in logs or `Debug` output
// - Requests are authenticated with an HMAC-SHA256 signature over
//   `METHOD\nPATH\nDATE`, sent alongside the access-key id

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::Duration;

use plsync_core::model::{AllowListEntry, VersionToken};
use plsync_core::traits::{AllowListStore, ListDescription};
use plsync_core::{Error, Result};

/// Default HTTP timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Signature scheme identifier sent in the Authorization header
const SIGNATURE_SCHEME: &str = "PLS1";

type HmacSha256 = Hmac<Sha256>;

/// API credentials: access-key id plus secret key.
///
/// The Debug implementation intentionally does NOT expose the secret.
#[derive(Clone)]
pub struct Credentials {
    /// Access-key id, sent in the clear with each request
    pub access_key_id: String,

    /// Secret key, used only to sign requests
    secret_access_key: SecretString,
}

impl Credentials {
    /// Create credentials from an access-key id and secret key
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: SecretString::from(secret_access_key.into()),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<REDACTED>")
            .finish()
    }
}

/// Request body for the modify operation
#[derive(Debug, Serialize)]
struct ModifyRequest<'a> {
    current_version: VersionToken,
    add_entries: &'a [AllowListEntry],
    remove_entries: &'a [AllowListEntry],
}

/// Response body of the list-entries operation
#[derive(Debug, Deserialize)]
struct EntriesResponse {
    entries: Vec<AllowListEntry>,
}

/// Response body of the modify operation
#[derive(Debug, Deserialize)]
struct ModifyResponse {
    version: VersionToken,
}

/// HTTP client for the managed prefix list API
pub struct HttpAllowListStore {
    /// API base URL, without trailing slash
    endpoint: String,

    /// Target region for the remote resource
    region: String,

    /// Signing credentials
    credentials: Credentials,

    /// HTTP client for API requests
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpAllowListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAllowListStore")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl HttpAllowListStore {
    /// Create a new client
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g. "https://network.example-cloud.com")
    /// - `region`: target region, sent as a request header
    /// - `credentials`: signing credentials
    pub fn new(
        endpoint: impl Into<String>,
        region: impl Into<String>,
        credentials: Credentials,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::remote(format!("Failed to build HTTP client: {e}")))?;

        Self::from_reqwest(endpoint, region, credentials, client)
    }

    /// Create a client around an existing `reqwest::Client` (tests)
    pub fn from_reqwest(
        endpoint: impl Into<String>,
        region: impl Into<String>,
        credentials: Credentials,
        client: reqwest::Client,
    ) -> Result<Self> {
        let endpoint = endpoint.into();
        let endpoint = endpoint.trim_end_matches('/').to_string();

        if credentials.access_key_id.is_empty() {
            return Err(Error::config("Access key id cannot be empty"));
        }
        if credentials.secret_access_key.expose_secret().is_empty() {
            return Err(Error::config("Secret access key cannot be empty"));
        }

        Ok(Self {
            endpoint,
            region: region.into(),
            credentials,
            client,
        })
    }

    /// Sign `METHOD\nPATH\nDATE` with the secret key
    fn signature(&self, method: &str, path: &str, date: &str) -> Result<String> {
        let canonical = format!("{method}\n{path}\n{date}");

        let mut mac =
            HmacSha256::new_from_slice(self.credentials.secret_access_key.expose_secret().as_bytes())
                .map_err(|e| Error::remote(format!("Failed to initialise signer: {e}")))?;
        mac.update(canonical.as_bytes());

        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    /// Attach date, region and signature headers to a request
    fn signed(&self, request: reqwest::RequestBuilder, method: &str, path: &str) -> Result<reqwest::RequestBuilder> {
        let date = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let signature = self.signature(method, path, &date)?;

        Ok(request
            .header("x-pls-date", date)
            .header("x-pls-region", &self.region)
            .header(
                "authorization",
                format!(
                    "{SIGNATURE_SCHEME} Credential={}, Signature={signature}",
                    self.credentials.access_key_id
                ),
            ))
    }

    /// Map a non-success response to an error, consuming the body for
    /// the message
    async fn error_for(&self, list_id: &str, response: reqwest::Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            404 => Error::not_found(list_id),
            401 | 403 => Error::access_denied(format!("{status}: {body}")),
            _ => Error::remote(format!("{status}: {body}")),
        }
    }
}

#[async_trait]
impl AllowListStore for HttpAllowListStore {
    async fn describe(&self, list_id: &str) -> Result<ListDescription> {
        let path = format!("/v1/prefix-lists/{list_id}");
        let url = format!("{}{path}", self.endpoint);

        tracing::debug!("Describing prefix list {list_id}");

        let request = self.signed(self.client.get(&url), "GET", &path)?;
        let response = request
            .send()
            .await
            .map_err(|e| Error::remote(format!("Describe request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(self.error_for(list_id, response).await);
        }

        response
            .json::<ListDescription>()
            .await
            .map_err(|e| Error::remote(format!("Malformed describe response: {e}")))
    }

    async fn entries(&self, list_id: &str, max_results: u32) -> Result<Vec<AllowListEntry>> {
        let path = format!("/v1/prefix-lists/{list_id}/entries");
        let url = format!("{}{path}", self.endpoint);

        tracing::debug!("Listing up to {max_results} entries of prefix list {list_id}");

        let request = self.signed(
            self.client
                .get(&url)
                .query(&[("max_results", max_results)]),
            "GET",
            &path,
        )?;
        let response = request
            .send()
            .await
            .map_err(|e| Error::remote(format!("Entries request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(self.error_for(list_id, response).await);
        }

        let body = response
            .json::<EntriesResponse>()
            .await
            .map_err(|e| Error::remote(format!("Malformed entries response: {e}")))?;

        Ok(body.entries)
    }

    async fn modify(
        &self,
        list_id: &str,
        current_version: VersionToken,
        add: &[AllowListEntry],
        remove: &[AllowListEntry],
    ) -> Result<VersionToken> {
        let path = format!("/v1/prefix-lists/{list_id}/modify");
        let url = format!("{}{path}", self.endpoint);

        tracing::debug!(
            "Modifying prefix list {list_id} at version {current_version} (+{} -{})",
            add.len(),
            remove.len()
        );

        let body = ModifyRequest {
            current_version,
            add_entries: add,
            remove_entries: remove,
        };

        let request = self.signed(self.client.post(&url).json(&body), "POST", &path)?;
        let response = request
            .send()
            .await
            .map_err(|e| Error::remote(format!("Modify request failed: {e}")))?;

        if response.status().as_u16() == 409 {
            return Err(Error::VersionConflict {
                list_id: list_id.to_string(),
                presented: current_version.0,
            });
        }

        if !response.status().is_success() {
            return Err(self.error_for(list_id, response).await);
        }

        let body = response
            .json::<ModifyResponse>()
            .await
            .map_err(|e| Error::remote(format!("Malformed modify response: {e}")))?;

        Ok(body.version)
    }
}

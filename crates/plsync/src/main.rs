// # plsync - Prefix List IP Updater
//
// Run-to-completion binary: resolve the current public IP, then
// reconcile one labeled entry of a remote managed prefix list so it
// holds that address. Periodicity comes from the invoking scheduler
// (cron, systemd timer); the process itself performs exactly one run
// and exits.
//
// This is a thin integration layer: all reconciliation logic lives in
// plsync-core, the HTTP integrations in plsync-ip-http and
// plsync-provider-http.
//
// ## Configuration
//
// All configuration is done via environment variables, read once at
// startup:
//
// ### Required
// - `PLSYNC_ACCESS_KEY_ID`: API access-key id
// - `PLSYNC_SECRET_ACCESS_KEY`: API secret key
// - `PLSYNC_REGION`: target region for the prefix-list resource
// - `PLSYNC_PREFIX_LIST_ID`: id of the prefix list to reconcile
// - `PLSYNC_ENDPOINT`: base URL of the prefix-list management API
//
// ### Optional
// - `PLSYNC_ENTRY_DESCRIPTION`: description key identifying "our" entry
//   (absent = match entries without a description)
// - `PLSYNC_IP_URL`: public-IP echo service (default https://ifconfig.me)
// - `PLSYNC_MAX_ENTRIES`: entry page cap (default 100; larger lists are
//   not paginated)
// - `PLSYNC_DRY_RUN`: "1"/"true" to decide without mutating
// - `PLSYNC_LOG`: log level (default info)
//
// ## Example
//
// ```bash
// export PLSYNC_ACCESS_KEY_ID=AKIDEXAMPLE
// export PLSYNC_SECRET_ACCESS_KEY=...
// export PLSYNC_REGION=eu-west-1
// export PLSYNC_PREFIX_LIST_ID=pl-0a1b2c
// export PLSYNC_ENDPOINT=https://network.example-cloud.com
// export PLSYNC_ENTRY_DESCRIPTION=home-ip
//
// plsync
// ```

use plsync_core::{Error, ReconcileDecision, SyncConfig, SyncEngine};
use plsync_ip_http::{DEFAULT_IP_URL, HttpIpSource};
use plsync_provider_http::{Credentials, HttpAllowListStore};

use std::env;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the different termination scenarios
///
/// - 0: converged (no-op or applied mutation)
/// - 1: configuration error, detected before any network call
/// - 2: runtime error (IP lookup or remote API failure)
#[derive(Debug, Clone, Copy)]
enum PlsyncExitCode {
    /// Converged successfully
    Success = 0,
    /// Missing or invalid configuration
    ConfigError = 1,
    /// IP lookup or remote API failure
    RuntimeError = 2,
}

impl From<PlsyncExitCode> for ExitCode {
    fn from(code: PlsyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration, read once from the environment
#[derive(Debug)]
struct Config {
    access_key_id: String,
    secret_access_key: String,
    region: String,
    prefix_list_id: String,
    endpoint: String,
    entry_description: Option<String>,
    ip_url: String,
    max_entries: u32,
    dry_run: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Reports every missing required variable in a single error so the
    /// operator can fix them all at once.
    fn from_env() -> Result<Self, Error> {
        const REQUIRED: &[&str] = &[
            "PLSYNC_ACCESS_KEY_ID",
            "PLSYNC_SECRET_ACCESS_KEY",
            "PLSYNC_REGION",
            "PLSYNC_PREFIX_LIST_ID",
            "PLSYNC_ENDPOINT",
        ];

        let missing: Vec<&str> = REQUIRED
            .iter()
            .copied()
            .filter(|name| env::var(name).map(|v| v.is_empty()).unwrap_or(true))
            .collect();

        if !missing.is_empty() {
            return Err(Error::config(format!(
                "Missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let max_entries = match env::var("PLSYNC_MAX_ENTRIES") {
            Ok(raw) => raw.parse::<u32>().map_err(|_| {
                Error::config(format!("PLSYNC_MAX_ENTRIES is not a number: {raw}"))
            })?,
            Err(_) => plsync_core::config::DEFAULT_MAX_ENTRIES,
        };

        Ok(Self {
            access_key_id: env::var("PLSYNC_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: env::var("PLSYNC_SECRET_ACCESS_KEY").unwrap_or_default(),
            region: env::var("PLSYNC_REGION").unwrap_or_default(),
            prefix_list_id: env::var("PLSYNC_PREFIX_LIST_ID").unwrap_or_default(),
            endpoint: env::var("PLSYNC_ENDPOINT").unwrap_or_default(),
            entry_description: env::var("PLSYNC_ENTRY_DESCRIPTION").ok(),
            ip_url: env::var("PLSYNC_IP_URL").unwrap_or_else(|_| DEFAULT_IP_URL.to_string()),
            max_entries,
            dry_run: env::var("PLSYNC_DRY_RUN")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
        })
    }
}

/// Interpret a boolean environment flag
fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// Wire the integrations into the engine and run once
async fn run(config: Config) -> Result<(), Error> {
    info!("Prefix list id: {}", config.prefix_list_id);
    info!(
        "Entry description: {}",
        config.entry_description.as_deref().unwrap_or("<none>")
    );
    if config.dry_run {
        info!("Dry-run mode: no mutation will be applied");
    }

    let ip_source = HttpIpSource::with_url(&config.ip_url)?;
    let store = HttpAllowListStore::new(
        &config.endpoint,
        &config.region,
        Credentials::new(&config.access_key_id, &config.secret_access_key),
    )?;

    let mut sync_config =
        SyncConfig::new(&config.prefix_list_id).with_max_entries(config.max_entries);
    sync_config.entry_description = config.entry_description;
    sync_config = sync_config.with_dry_run(config.dry_run);

    let engine = SyncEngine::new(Box::new(ip_source), Box::new(store), sync_config)?;
    let report = engine.run().await?;

    match &report.decision {
        ReconcileDecision::NoOp { cidr } => {
            info!("No update needed. Current IP {cidr} already in prefix list.");
        }
        ReconcileDecision::Add { entry } => {
            info!("Added new entry to prefix list with IP: {}", entry.cidr);
        }
        ReconcileDecision::Replace { old, new } => {
            info!(
                "Successfully updated prefix list from {} to {}",
                old.cidr, new.cidr
            );
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Configure logging before anything else so config errors are visible
    let log_level = env::var("PLSYNC_LOG").unwrap_or_else(|_| "info".to_string());
    let level = Level::from_str(&log_level).unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to initialise logging");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            error!("Please set these in the invoking environment");
            return PlsyncExitCode::ConfigError.into();
        }
    };

    match run(config).await {
        Ok(()) => PlsyncExitCode::Success.into(),
        Err(e @ Error::Config(_)) => {
            error!("{e}");
            PlsyncExitCode::ConfigError.into()
        }
        Err(e) => {
            error!("{e}");
            PlsyncExitCode::RuntimeError.into()
        }
    }
}

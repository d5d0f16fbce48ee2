//! CLI glue for leanix-publish: argument parsing, config resolution and wiring
//! of the real HTTP clients into [`leanix_publish_core::publish::publish`].
//!
//! All flags are optional. Invoked with no arguments, everything comes from
//! the `LEANIX_*` environment (see [`crate::load_config`]).

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use leanix_publish_core::auth::OAuthTokenFetcher;
use leanix_publish_core::discovery::DiscoveryClient;
use leanix_publish_core::publish::{publish, PublishReport};
use leanix_publish_core::PublishError;

use crate::load_config::{load_config, ConfigOverrides};

/// CLI for leanix-publish: upload a service manifest and register its SBOM.
#[derive(Parser, Debug, Default)]
#[clap(
    name = "leanix-publish",
    version,
    about = "Upload a service manifest to LeanIX and register its SBOM against the fact sheet"
)]
pub struct Cli {
    /// Manifest file to upload (overrides LEANIX_MANIFEST_FILE, default leanix.yaml)
    #[clap(long)]
    pub manifest: Option<PathBuf>,

    /// SBOM file to register (overrides LEANIX_SBOM_FILE, default sbom.json)
    #[clap(long)]
    pub sbom: Option<PathBuf>,

    /// Workspace subdomain (overrides LEANIX_SUBDOMAIN, default leanix)
    #[clap(long)]
    pub subdomain: Option<String>,

    /// Full services base URL (overrides LEANIX_BASE_URL)
    #[clap(long)]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds (overrides LEANIX_REQUEST_TIMEOUT_SECS, default 20)
    #[clap(long)]
    pub timeout_secs: Option<u64>,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            manifest_file: self.manifest.clone(),
            sbom_file: self.sbom.clone(),
            subdomain: self.subdomain.clone(),
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Async entrypoint shared by `main()` and integration tests.
pub async fn run(cli: Cli) -> Result<PublishReport> {
    let config = load_config(&cli.overrides())?;
    config.trace_loaded();

    let tokens = OAuthTokenFetcher::new(&config.endpoints, config.timeout)?;
    let api = DiscoveryClient::new(config.endpoints.clone(), config.timeout)?;

    let report = publish(&config, &tokens, &api).await?;
    tracing::info!(command = "publish", ?report, "Publish complete");
    Ok(report)
}

/// Exit code for an error returned by [`run`]; 1 for anything unclassified.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<PublishError>()
        .map(PublishError::exit_code)
        .unwrap_or(1)
}

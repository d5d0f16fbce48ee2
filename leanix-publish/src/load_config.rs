//! `load_config` module: resolves the process environment (plus CLI overrides) into a validated `PublishConfig`.
//!
//! # Responsibilities
//! - Read `LEANIX_*` environment variables; a `.env` file is loaded by `main` beforehand
//! - Apply CLI overrides on top of the environment, then defaults
//! - Reject a missing API token, a malformed subdomain or base URL, or a zero/non-numeric timeout
//!
//! # Errors
//! Every failure is a [`PublishError::Configuration`], which the CLI maps to exit code 2.
//! Secrets are never logged; only whether they are present.
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use leanix_publish_core::config::{
    Credentials, Endpoints, PublishConfig, DEFAULT_MANIFEST_FILE, DEFAULT_SBOM_FILE,
    DEFAULT_SUBDOMAIN, DEFAULT_TIMEOUT,
};
use leanix_publish_core::PublishError;
use regex::Regex;
use tracing::{error, info};

pub const ENV_API_TOKEN: &str = "LEANIX_API_TOKEN";
pub const ENV_SUBDOMAIN: &str = "LEANIX_SUBDOMAIN";
pub const ENV_BASE_URL: &str = "LEANIX_BASE_URL";
pub const ENV_MANIFEST_FILE: &str = "LEANIX_MANIFEST_FILE";
pub const ENV_SBOM_FILE: &str = "LEANIX_SBOM_FILE";
pub const ENV_TIMEOUT_SECS: &str = "LEANIX_REQUEST_TIMEOUT_SECS";

static SUBDOMAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").expect("subdomain pattern is valid")
});

/// Values given on the command line; each wins over its environment variable.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub manifest_file: Option<PathBuf>,
    pub sbom_file: Option<PathBuf>,
    pub subdomain: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Unset and blank variables are both treated as absent.
fn env_raw(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        Ok(_) => {
            info!(var = key, "Environment variable is blank, ignoring");
            None
        }
        Err(_) => None,
    }
}

fn env_var(key: &str) -> Option<String> {
    env_raw(key).map(|value| value.trim().to_string())
}

/// File paths are taken verbatim; surrounding whitespace is part of the name.
fn env_path(key: &str) -> Option<PathBuf> {
    env_raw(key).map(PathBuf::from)
}

pub fn load_config(overrides: &ConfigOverrides) -> Result<PublishConfig, PublishError> {
    let api_token = match env_var(ENV_API_TOKEN) {
        Some(token) => {
            info!("{ENV_API_TOKEN} found in env");
            token
        }
        None => {
            error!("{ENV_API_TOKEN} environment variable not set");
            return Err(PublishError::Configuration(format!(
                "{ENV_API_TOKEN} must be set to a valid API token"
            )));
        }
    };

    let subdomain = overrides
        .subdomain
        .clone()
        .or_else(|| env_var(ENV_SUBDOMAIN))
        .unwrap_or_else(|| DEFAULT_SUBDOMAIN.to_string());
    if !SUBDOMAIN.is_match(&subdomain) {
        error!(subdomain = %subdomain, "Invalid LeanIX subdomain");
        return Err(PublishError::Configuration(format!(
            "invalid subdomain {subdomain:?}: expected lowercase letters, digits and hyphens"
        )));
    }

    let endpoints = match overrides.base_url.clone().or_else(|| env_var(ENV_BASE_URL)) {
        Some(url) if url.starts_with("https://") || url.starts_with("http://") => {
            info!(base_url = %url, "Using explicit base URL");
            Endpoints::from_base_url(url)
        }
        Some(url) => {
            error!(base_url = %url, "Base URL must start with http:// or https://");
            return Err(PublishError::Configuration(format!(
                "invalid base URL {url:?}: must start with http:// or https://"
            )));
        }
        None => Endpoints::for_subdomain(&subdomain),
    };

    let timeout = match overrides.timeout_secs {
        Some(0) => {
            error!("--timeout-secs must be positive");
            return Err(PublishError::Configuration(
                "--timeout-secs must be at least one second".into(),
            ));
        }
        Some(secs) => Duration::from_secs(secs),
        None => match env_var(ENV_TIMEOUT_SECS) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        },
    };

    let manifest_file = overrides
        .manifest_file
        .clone()
        .or_else(|| env_path(ENV_MANIFEST_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST_FILE));
    let sbom_file = overrides
        .sbom_file
        .clone()
        .or_else(|| env_path(ENV_SBOM_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SBOM_FILE));

    info!(
        subdomain = %subdomain,
        manifest_file = %manifest_file.display(),
        "Config loaded and merged successfully"
    );

    Ok(PublishConfig {
        credentials: Credentials {
            api_token,
            subdomain,
        },
        endpoints,
        manifest_file,
        sbom_file,
        timeout,
    })
}

fn parse_timeout(raw: &str) -> Result<Duration, PublishError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        Ok(_) => {
            error!("{ENV_TIMEOUT_SECS} must be positive");
            Err(PublishError::Configuration(format!(
                "{ENV_TIMEOUT_SECS} must be at least one second"
            )))
        }
        Err(e) => {
            error!(error = ?e, raw = %raw, "{ENV_TIMEOUT_SECS} must be a valid integer");
            Err(PublishError::Configuration(format!(
                "{ENV_TIMEOUT_SECS} must be a positive integer: {e}"
            )))
        }
    }
}

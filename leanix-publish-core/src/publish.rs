//! Top-level run: validate manifest → obtain token → upload manifest → register SBOM.
//!
//! The run is strictly sequential and fail-fast. Each step's outcome is
//! logged with a `stage` field (see [`PublishStage`]); the first error ends
//! the run in [`PublishStage::Failed`] and is returned unchanged.
//!
//! # Navigation
//! - Main entrypoint: [`publish`]
//! - Individual steps: [`upload_manifest_file`], [`register_sboms`]
//! - Output: [`PublishReport`]

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::config::PublishConfig;
use crate::contract::{AccessToken, DiscoveryApi, TokenProvider};
use crate::error::PublishError;
use crate::files::{ensure_file, LocalFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStage {
    Start,
    ManifestValidated,
    TokenObtained,
    ManifestUploaded,
    SbomChecked,
    SbomUploaded,
    SbomSkipped,
    Done,
    Failed,
}

impl fmt::Display for PublishStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishStage::Start => "START",
            PublishStage::ManifestValidated => "MANIFEST_VALIDATED",
            PublishStage::TokenObtained => "TOKEN_OBTAINED",
            PublishStage::ManifestUploaded => "MANIFEST_UPLOADED",
            PublishStage::SbomChecked => "SBOM_CHECKED",
            PublishStage::SbomUploaded => "SBOM_UPLOADED",
            PublishStage::SbomSkipped => "SBOM_SKIPPED",
            PublishStage::Done => "DONE",
            PublishStage::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// What was sent for one local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub name: String,
    pub size: usize,
    pub sha256: String,
}

impl From<&LocalFile> for FileReport {
    fn from(file: &LocalFile) -> Self {
        Self {
            name: file.name.clone(),
            size: file.contents.len(),
            sha256: file.sha256(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SbomOutcome {
    Registered(FileReport),
    /// No SBOM file at `path`; nothing was sent.
    Skipped { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub fact_sheet_id: String,
    pub manifest: FileReport,
    pub sbom: SbomOutcome,
}

pub async fn publish<T, A>(
    config: &PublishConfig,
    tokens: &T,
    api: &A,
) -> Result<PublishReport, PublishError>
where
    T: TokenProvider + ?Sized,
    A: DiscoveryApi + ?Sized,
{
    info!(stage = %PublishStage::Start, manifest_file = %config.manifest_file.display(), "Starting publish run");

    match run_stages(config, tokens, api).await {
        Ok(report) => {
            info!(
                stage = %PublishStage::Done,
                fact_sheet_id = %report.fact_sheet_id,
                "Publish run complete"
            );
            Ok(report)
        }
        Err(e) => {
            error!(stage = %PublishStage::Failed, error = %e, exit_code = e.exit_code(), "Publish run failed");
            Err(e)
        }
    }
}

async fn run_stages<T, A>(
    config: &PublishConfig,
    tokens: &T,
    api: &A,
) -> Result<PublishReport, PublishError>
where
    T: TokenProvider + ?Sized,
    A: DiscoveryApi + ?Sized,
{
    // Local validation first so a missing manifest never costs a network call.
    let manifest = LocalFile::read(&config.manifest_file)?;
    info!(stage = %PublishStage::ManifestValidated, file = %manifest.name, "Processing manifest file");

    let token = tokens.fetch_token(&config.credentials).await?;
    info!(stage = %PublishStage::TokenObtained, "Access token obtained");

    let fact_sheet_id = upload_manifest_file(api, &token, &manifest).await?;
    let sbom = register_sboms(api, &token, &fact_sheet_id, &config.sbom_file).await?;

    Ok(PublishReport {
        fact_sheet_id,
        manifest: FileReport::from(&manifest),
        sbom,
    })
}

/// Creates or updates the fact sheet for `manifest` and returns its ID.
///
/// A successful upload that returns no ID is [`PublishError::MissingIdentifier`].
pub async fn upload_manifest_file<A>(
    api: &A,
    token: &AccessToken,
    manifest: &LocalFile,
) -> Result<String, PublishError>
where
    A: DiscoveryApi + ?Sized,
{
    let result = api.upload_manifest(token, manifest).await?;
    match result.fact_sheet_id {
        Some(id) => {
            info!(
                stage = %PublishStage::ManifestUploaded,
                status = %result.status,
                fact_sheet_id = %id,
                sha256 = %manifest.sha256(),
                "Manifest uploaded"
            );
            Ok(id)
        }
        None => {
            error!(status = %result.status, file = %manifest.name, "Service did not return a fact sheet ID");
            Err(PublishError::MissingIdentifier)
        }
    }
}

/// Registers the SBOM at `sbom_path` against `fact_sheet_id`.
///
/// A missing SBOM file is not an error: a warning is logged and
/// [`SbomOutcome::Skipped`] returned without calling the API.
pub async fn register_sboms<A>(
    api: &A,
    token: &AccessToken,
    fact_sheet_id: &str,
    sbom_path: &Path,
) -> Result<SbomOutcome, PublishError>
where
    A: DiscoveryApi + ?Sized,
{
    info!(
        stage = %PublishStage::SbomChecked,
        path = %sbom_path.display(),
        fact_sheet_id,
        "Checking for sbom file"
    );
    if ensure_file(sbom_path).is_err() {
        warn!(
            stage = %PublishStage::SbomSkipped,
            path = %sbom_path.display(),
            "No sbom file found"
        );
        return Ok(SbomOutcome::Skipped {
            path: sbom_path.to_path_buf(),
        });
    }

    let sbom = LocalFile::read(sbom_path)?;
    info!(file = %sbom.name, fact_sheet_id, "Processing sbom file");

    api.register_sbom(token, fact_sheet_id, &sbom).await?;
    let report = FileReport::from(&sbom);
    info!(
        stage = %PublishStage::SbomUploaded,
        file = %report.name,
        sha256 = %report.sha256,
        fact_sheet_id,
        "SBOM registered"
    );
    Ok(SbomOutcome::Registered(report))
}

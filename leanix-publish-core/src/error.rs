//! Error taxonomy for a publish run.
//!
//! Every variant is fatal: the orchestrator returns as soon as one is produced
//! and the CLI maps it to a process exit code via [`PublishError::exit_code`].
//! The only non-error outcome on the unhappy path is a missing SBOM file,
//! which is reported as [`crate::publish::SbomOutcome::Skipped`].

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Which upload endpoint rejected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadTarget {
    Manifest,
    Sbom,
}

impl std::fmt::Display for UploadTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadTarget::Manifest => f.write_str("manifest"),
            UploadTarget::Sbom => f.write_str("sbom"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    /// Missing or invalid configuration (e.g. no API token).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A required local file does not exist or is not a regular file.
    #[error("file {} not found", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The OAuth2 token endpoint answered with a non-2xx status.
    #[error("authentication failed with status {status}: {body}")]
    Authentication { status: StatusCode, body: String },

    /// The manifest or SBOM endpoint answered with a non-2xx status.
    #[error("{target} upload failed with status {status}: {body}")]
    Upload {
        target: UploadTarget,
        status: StatusCode,
        body: String,
    },

    /// A 2xx response whose body did not have the expected shape.
    #[error("malformed response: {context}")]
    MalformedResponse { context: String },

    /// The manifest upload succeeded but no fact sheet ID came back.
    #[error("service did not return a fact sheet ID")]
    MissingIdentifier,

    /// Connection failure, timeout or any other reqwest-level failure.
    #[error("transport error during {context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl PublishError {
    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            PublishError::Configuration(_) => 2,
            PublishError::FileNotFound { .. } | PublishError::FileRead { .. } => 3,
            PublishError::Authentication { .. } => 4,
            PublishError::Upload { .. } => 5,
            PublishError::MissingIdentifier => 6,
            PublishError::MalformedResponse { .. } => 7,
            PublishError::Transport { .. } => 8,
        }
    }

    pub(crate) fn malformed(context: impl Into<String>) -> Self {
        PublishError::MalformedResponse {
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_class() {
        let errors = [
            PublishError::Configuration("x".into()),
            PublishError::FileNotFound {
                path: PathBuf::from("leanix.yaml"),
            },
            PublishError::Authentication {
                status: StatusCode::UNAUTHORIZED,
                body: String::new(),
            },
            PublishError::Upload {
                target: UploadTarget::Manifest,
                status: StatusCode::BAD_REQUEST,
                body: String::new(),
            },
            PublishError::MissingIdentifier,
            PublishError::malformed("no json"),
        ];
        let mut codes: Vec<u8> = errors.iter().map(PublishError::exit_code).collect();
        assert!(codes.iter().all(|c| *c != 0 && *c != 1));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn upload_error_message_names_target_and_status() {
        let err = PublishError::Upload {
            target: UploadTarget::Sbom,
            status: StatusCode::UNPROCESSABLE_ENTITY,
            body: "bad sbom".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("sbom upload failed"), "got: {msg}");
        assert!(msg.contains("422"), "got: {msg}");
        assert!(msg.contains("bad sbom"), "got: {msg}");
    }

    #[test]
    fn file_not_found_mentions_path() {
        let err = PublishError::FileNotFound {
            path: PathBuf::from("svc.yaml"),
        };
        assert_eq!(err.to_string(), "file svc.yaml not found");
        assert_eq!(err.exit_code(), 3);
    }
}

//! # contract: seams between the publish orchestrator and the LeanIX API
//!
//! Two traits, each with one production implementation and a `mockall` mock:
//! - [`TokenProvider`] exchanges the API token for a bearer [`AccessToken`]
//!   (see [`crate::auth::OAuthTokenFetcher`]).
//! - [`DiscoveryApi`] uploads manifests and registers SBOMs
//!   (see [`crate::discovery::DiscoveryClient`]).
//!
//! The access token is passed explicitly to every [`DiscoveryApi`] call rather
//! than stashed in process-wide state.
//!
//! Mocks (`MockTokenProvider`, `MockDiscoveryApi`) are generated under `cfg(test)`
//! and the default `test-export-mocks` feature so integration tests can use them.

use async_trait::async_trait;
use mockall::automock;
use reqwest::StatusCode;

use crate::config::Credentials;
use crate::error::PublishError;
use crate::files::LocalFile;

/// Bearer token from the client-credentials grant. No expiry tracking.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken(<{} chars>)", self.0.len())
    }
}

/// Outcome of a successful (2xx) manifest upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub status: StatusCode,
    /// `data.factSheetId` from the response body, if present.
    pub fact_sheet_id: Option<String>,
}

/// Obtains the bearer token used by every subsequent call.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn fetch_token(&self, credentials: &Credentials) -> Result<AccessToken, PublishError>;
}

/// Technology-discovery endpoints of the LeanIX API.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DiscoveryApi: Send + Sync {
    /// Create or update the fact sheet described by `manifest`.
    ///
    /// Non-2xx responses are errors; a 2xx response without a fact sheet ID is
    /// returned as-is and left to the caller to reject.
    async fn upload_manifest(
        &self,
        token: &AccessToken,
        manifest: &LocalFile,
    ) -> Result<UploadResult, PublishError>;

    /// Attach `sbom` to the fact sheet `fact_sheet_id`.
    async fn register_sbom(
        &self,
        token: &AccessToken,
        fact_sheet_id: &str,
        sbom: &LocalFile,
    ) -> Result<(), PublishError>;
}

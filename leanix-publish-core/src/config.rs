use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info};

/// Request timeout applied to every HTTP call unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_SUBDOMAIN: &str = "leanix";
pub const DEFAULT_MANIFEST_FILE: &str = "leanix.yaml";
pub const DEFAULT_SBOM_FILE: &str = "sbom.json";

/// Username paired with the API token for the client-credentials grant.
pub const TOKEN_USERNAME: &str = "apitoken";

/// Technical-user credentials. Read once, never mutated.
#[derive(Clone)]
pub struct Credentials {
    pub api_token: String,
    pub subdomain: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<redacted>")
            .field("subdomain", &self.subdomain)
            .finish()
    }
}

/// The fixed set of URLs a run talks to, all derived from one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    /// `https://{subdomain}.leanix.net/services`
    pub fn for_subdomain(subdomain: &str) -> Self {
        Self::from_base_url(format!("https://{subdomain}.leanix.net/services"))
    }

    pub fn from_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn oauth2_token(&self) -> String {
        format!("{}/mtm/v1/oauth2/token", self.base_url)
    }

    pub fn manifests(&self) -> String {
        format!("{}/technology-discovery/v1/manifests", self.base_url)
    }

    pub fn sboms(&self, fact_sheet_id: &str) -> String {
        format!(
            "{}/technology-discovery/v1/factSheets/{}/sboms",
            self.base_url, fact_sheet_id
        )
    }
}

/// Everything a publish run needs, resolved and validated up front.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub credentials: Credentials,
    pub endpoints: Endpoints,
    pub manifest_file: PathBuf,
    pub sbom_file: PathBuf,
    pub timeout: Duration,
}

impl PublishConfig {
    pub fn trace_loaded(&self) {
        info!(
            subdomain = %self.credentials.subdomain,
            base_url = %self.endpoints.base_url(),
            manifest_file = %self.manifest_file.display(),
            sbom_file = %self.sbom_file.display(),
            timeout_secs = self.timeout.as_secs(),
            "Loaded PublishConfig"
        );
        debug!(?self, "PublishConfig loaded (full debug)");
    }
}

#![doc = "LeanIX technology-discovery client: manifest upload and SBOM registration over multipart HTTP."]
//
//! [`DiscoveryClient`] is the reqwest-backed implementation of
//! [`DiscoveryApi`]. Both calls send a single multipart part and rely on
//! reqwest to set the `Content-Type` boundary header.
//!
//! The part MIME types (`application/yaml`, `application/json`) describe the
//! file kind expected by the API, not a validated content type.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::config::Endpoints;
use crate::contract::{AccessToken, DiscoveryApi, UploadResult};
use crate::error::{PublishError, UploadTarget};
use crate::files::LocalFile;
use crate::http::{build_client, status_and_body, transport};

const MANIFEST_FIELD: &str = "file";
const MANIFEST_MIME: &str = "application/yaml";
const SBOM_FIELD: &str = "sbom";
const SBOM_MIME: &str = "application/json";

#[derive(Debug, Deserialize)]
struct ManifestResponse {
    data: Option<ManifestData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestData {
    fact_sheet_id: Option<String>,
}

pub struct DiscoveryClient {
    http: Client,
    endpoints: Endpoints,
}

impl DiscoveryClient {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self, PublishError> {
        Ok(Self::with_client(build_client(timeout)?, endpoints))
    }

    pub fn with_client(http: Client, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }
}

fn file_part(file: &LocalFile, mime: &str) -> Result<Part, PublishError> {
    Part::bytes(file.contents.clone())
        .file_name(file.name.clone())
        .mime_str(mime)
        .map_err(transport("building multipart body"))
}

#[async_trait]
impl DiscoveryApi for DiscoveryClient {
    async fn upload_manifest(
        &self,
        token: &AccessToken,
        manifest: &LocalFile,
    ) -> Result<UploadResult, PublishError> {
        let url = self.endpoints.manifests();
        info!(file = %manifest.name, url = %url, "Uploading manifest file");

        let form = Form::new().part(MANIFEST_FIELD, file_part(manifest, MANIFEST_MIME)?);
        let resp = self
            .http
            .put(&url)
            .bearer_auth(token.as_str())
            .multipart(form)
            .send()
            .await
            .map_err(transport("manifest upload"))?;

        let (status, body) = status_and_body(resp, "manifest response").await?;
        debug!(status = %status, body = %body, "Manifest endpoint responded");

        if !status.is_success() {
            error!(status = %status, file = %manifest.name, "Manifest upload rejected");
            return Err(PublishError::Upload {
                target: UploadTarget::Manifest,
                status,
                body,
            });
        }
        info!(file = %manifest.name, "Successfully uploaded manifest file");

        Ok(UploadResult {
            status,
            fact_sheet_id: parse_fact_sheet_id(&body)?,
        })
    }

    async fn register_sbom(
        &self,
        token: &AccessToken,
        fact_sheet_id: &str,
        sbom: &LocalFile,
    ) -> Result<(), PublishError> {
        let url = self.endpoints.sboms(fact_sheet_id);
        let form = Form::new().part(SBOM_FIELD, file_part(sbom, SBOM_MIME)?);
        debug!(file = %sbom.name, "Populated payload for SBOM");

        info!(fact_sheet_id, url = %url, "Sending SBOM ingestion request");
        let resp = self
            .http
            .post(&url)
            .bearer_auth(token.as_str())
            .multipart(form)
            .send()
            .await
            .map_err(transport("sbom upload"))?;

        let (status, body) = status_and_body(resp, "sbom response").await?;
        debug!(status = %status, body = %body, "SBOM endpoint responded");

        if !status.is_success() {
            error!(status = %status, fact_sheet_id, "SBOM registration rejected");
            return Err(PublishError::Upload {
                target: UploadTarget::Sbom,
                status,
                body,
            });
        }
        info!(fact_sheet_id, file = %sbom.name, "Submitted SBOM for fact sheet");
        Ok(())
    }
}

/// `data.factSheetId` from a manifest response; empty IDs count as absent.
fn parse_fact_sheet_id(body: &str) -> Result<Option<String>, PublishError> {
    let parsed: ManifestResponse = serde_json::from_str(body).map_err(|e| {
        PublishError::malformed(format!("manifest response is not valid JSON: {e}"))
    })?;
    Ok(parsed
        .data
        .and_then(|d| d.fact_sheet_id)
        .filter(|id| !id.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fact_sheet_id_is_read_from_data() {
        let id = parse_fact_sheet_id(r#"{"data":{"factSheetId":"FS-1","name":"svc"}}"#).unwrap();
        assert_eq!(id.as_deref(), Some("FS-1"));
    }

    #[test]
    fn absent_or_null_identifier_is_none() {
        assert_eq!(parse_fact_sheet_id(r#"{"data":{}}"#).unwrap(), None);
        assert_eq!(parse_fact_sheet_id(r#"{"data":null}"#).unwrap(), None);
        assert_eq!(parse_fact_sheet_id(r#"{}"#).unwrap(), None);
        assert_eq!(
            parse_fact_sheet_id(r#"{"data":{"factSheetId":""}}"#).unwrap(),
            None
        );
    }

    #[test]
    fn non_json_success_body_is_malformed() {
        let err = parse_fact_sheet_id("OK").unwrap_err();
        assert!(matches!(err, PublishError::MalformedResponse { .. }));
    }
}

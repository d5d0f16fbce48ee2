//! OAuth2 client-credentials exchange against the LeanIX MTM service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info};

use crate::config::{Credentials, Endpoints, TOKEN_USERNAME};
use crate::contract::{AccessToken, TokenProvider};
use crate::error::PublishError;
use crate::http::{build_client, status_and_body, transport};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

pub struct OAuthTokenFetcher {
    http: Client,
    token_url: String,
}

impl OAuthTokenFetcher {
    pub fn new(endpoints: &Endpoints, timeout: Duration) -> Result<Self, PublishError> {
        Ok(Self::with_client(build_client(timeout)?, endpoints))
    }

    pub fn with_client(http: Client, endpoints: &Endpoints) -> Self {
        Self {
            http,
            token_url: endpoints.oauth2_token(),
        }
    }
}

#[async_trait]
impl TokenProvider for OAuthTokenFetcher {
    async fn fetch_token(&self, credentials: &Credentials) -> Result<AccessToken, PublishError> {
        if credentials.api_token.trim().is_empty() {
            error!("No API token configured");
            return Err(PublishError::Configuration(
                "a valid API token is required".into(),
            ));
        }

        info!(url = %self.token_url, "Requesting LeanIX access token");
        let resp = self
            .http
            .post(&self.token_url)
            .basic_auth(TOKEN_USERNAME, Some(&credentials.api_token))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(transport("token request"))?;

        let (status, body) = status_and_body(resp, "token response").await?;
        debug!(status = %status, "Token endpoint responded");

        if !status.is_success() {
            error!(status = %status, url = %self.token_url, "Token endpoint rejected credentials");
            return Err(PublishError::Authentication { status, body });
        }

        let token = parse_token_response(&body)?;
        info!(token_len = token.as_str().len(), "Obtained LeanIX access token");
        Ok(token)
    }
}

fn parse_token_response(body: &str) -> Result<AccessToken, PublishError> {
    let parsed: TokenResponse = serde_json::from_str(body)
        .map_err(|e| PublishError::malformed(format!("token response is not valid JSON: {e}")))?;
    match parsed.access_token {
        Some(token) if !token.is_empty() => Ok(AccessToken::new(token)),
        _ => Err(PublishError::malformed(
            "token response has no access_token",
        )),
    }
}

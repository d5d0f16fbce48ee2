use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use tracing::error;

use crate::error::PublishError;

/// Shared reqwest client with the per-request timeout applied uniformly.
pub fn build_client(timeout: Duration) -> Result<Client, PublishError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| PublishError::Transport {
            context: "building HTTP client",
            source: e,
        })
}

pub(crate) fn transport(context: &'static str) -> impl FnOnce(reqwest::Error) -> PublishError {
    move |e| {
        error!(error = ?e, context, timeout = e.is_timeout(), "HTTP transport failure");
        PublishError::Transport { context, source: e }
    }
}

/// Drains a response into its status and body text.
pub(crate) async fn status_and_body(
    resp: Response,
    context: &'static str,
) -> Result<(StatusCode, String), PublishError> {
    let status = resp.status();
    let body = resp.text().await.map_err(transport(context))?;
    Ok((status, body))
}

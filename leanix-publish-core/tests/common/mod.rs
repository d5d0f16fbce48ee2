//! In-process stand-in for the LeanIX endpoints, recording every request.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{post, put};
use axum::{Form, Router};

/// Basic auth header value for `apitoken:test-token`.
pub const TEST_TOKEN_BASIC: &str = "Basic YXBpdG9rZW46dGVzdC10b2tlbg==";

#[derive(Debug, Clone)]
pub struct ReceivedPart {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default, Clone)]
pub struct Recorded {
    pub token_calls: usize,
    pub token_auth: Option<String>,
    pub token_form: HashMap<String, String>,
    pub manifest_calls: usize,
    pub manifest_auth: Option<String>,
    pub manifest_parts: Vec<ReceivedPart>,
    pub sbom_fact_sheet_ids: Vec<String>,
    pub sbom_auth: Option<String>,
    pub sbom_parts: Vec<ReceivedPart>,
}

#[derive(Debug, Clone)]
pub struct Behaviour {
    pub token_status: StatusCode,
    pub token_body: String,
    pub manifest_status: StatusCode,
    pub manifest_body: String,
    pub manifest_delay: Option<Duration>,
    pub sbom_status: StatusCode,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            token_status: StatusCode::OK,
            token_body: r#"{"access_token":"abc","token_type":"bearer","expires_in":3599}"#.into(),
            manifest_status: StatusCode::OK,
            manifest_body: r#"{"data":{"factSheetId":"42"}}"#.into(),
            manifest_delay: None,
            sbom_status: StatusCode::OK,
        }
    }
}

#[derive(Clone)]
struct AppState {
    behaviour: Arc<Behaviour>,
    recorded: Arc<Mutex<Recorded>>,
}

pub struct FakeLeanix {
    /// Equivalent of `https://{subdomain}.leanix.net/services`.
    pub base_url: String,
    recorded: Arc<Mutex<Recorded>>,
}

impl FakeLeanix {
    pub fn recorded(&self) -> Recorded {
        self.recorded.lock().unwrap().clone()
    }
}

pub async fn spawn(behaviour: Behaviour) -> FakeLeanix {
    let recorded = Arc::new(Mutex::new(Recorded::default()));
    let state = AppState {
        behaviour: Arc::new(behaviour),
        recorded: recorded.clone(),
    };
    let app = Router::new()
        .route("/services/mtm/v1/oauth2/token", post(token))
        .route("/services/technology-discovery/v1/manifests", put(manifests))
        .route(
            "/services/technology-discovery/v1/factSheets/{id}/sboms",
            post(sboms),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeLeanix {
        base_url: format!("http://{addr}/services"),
        recorded,
    }
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn collect_parts(mut multipart: Multipart) -> Vec<ReceivedPart> {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap_or_default().to_vec();
        parts.push(ReceivedPart {
            field: field_name,
            file_name,
            content_type,
            bytes,
        });
    }
    parts
}

async fn token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, String) {
    {
        let mut rec = state.recorded.lock().unwrap();
        rec.token_calls += 1;
        rec.token_auth = authorization(&headers);
        rec.token_form = form;
    }
    (state.behaviour.token_status, state.behaviour.token_body.clone())
}

async fn manifests(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> (StatusCode, String) {
    let parts = collect_parts(multipart).await;
    {
        let mut rec = state.recorded.lock().unwrap();
        rec.manifest_calls += 1;
        rec.manifest_auth = authorization(&headers);
        rec.manifest_parts = parts;
    }
    if let Some(delay) = state.behaviour.manifest_delay {
        tokio::time::sleep(delay).await;
    }
    (
        state.behaviour.manifest_status,
        state.behaviour.manifest_body.clone(),
    )
}

async fn sboms(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> (StatusCode, String) {
    let parts = collect_parts(multipart).await;
    {
        let mut rec = state.recorded.lock().unwrap();
        rec.sbom_fact_sheet_ids.push(id);
        rec.sbom_auth = authorization(&headers);
        rec.sbom_parts = parts;
    }
    (state.behaviour.sbom_status, String::from("{}"))
}

//! Fake file API served over real HTTP for end-to-end tests.

#![allow(dead_code)]

use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use codeshare_frontend::config::{ApiSettings, ClipboardSettings, SearchSettings, Settings, TelemetrySettings};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One multipart upload as the fake server saw it.
#[derive(Debug, Clone, Default)]
pub struct ReceivedUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
    pub name: String,
    pub random_number: String,
    pub request_id: Option<String>,
}

#[derive(Default)]
struct Script {
    upload_reply: Option<(StatusCode, Value)>,
    searches: HashMap<String, (Duration, StatusCode, Value)>,
    listing: Option<Value>,
}

#[derive(Clone, Default)]
struct FakeState {
    script: Arc<Mutex<Script>>,
    uploads: Arc<Mutex<Vec<ReceivedUpload>>>,
    searches: Arc<Mutex<Vec<String>>>,
}

pub struct FakeApi {
    pub address: String,
    state: FakeState,
}

impl FakeApi {
    pub async fn spawn() -> Self {
        let state = FakeState::default();

        let app = Router::new()
            .route("/api/upload", post(upload))
            .route("/api/files/search", get(search))
            .route("/api/search", get(listing))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake API");
        let address = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        FakeApi { address, state }
    }

    pub fn reply_to_upload(&self, status: StatusCode, body: Value) {
        self.state.script.lock().unwrap().upload_reply = Some((status, body));
    }

    pub fn reply_to_search(&self, query: &str, delay: Duration, status: StatusCode, body: Value) {
        self.state
            .script
            .lock()
            .unwrap()
            .searches
            .insert(query.to_string(), (delay, status, body));
    }

    pub fn reply_to_listing(&self, body: Value) {
        self.state.script.lock().unwrap().listing = Some(body);
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.state.uploads.lock().unwrap().clone()
    }

    pub fn searches(&self) -> Vec<String> {
        self.state.searches.lock().unwrap().clone()
    }

    pub fn settings(&self) -> Settings {
        settings_for(&self.address)
    }
}

pub fn settings_for(base_url: &str) -> Settings {
    Settings {
        api: ApiSettings {
            base_url: base_url.to_string(),
            upload_path: "/api/upload".to_string(),
            search_path: "/api/files/search".to_string(),
            listing_path: "/api/search".to_string(),
            uploads_path: "/uploads/".to_string(),
            request_timeout_secs: 5,
        },
        search: SearchSettings::default(),
        clipboard: ClipboardSettings::default(),
        telemetry: TelemetrySettings::default(),
    }
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_address() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    address
}

pub fn record(file: &str, name: &str, date: &str) -> Value {
    json!({ "file": file, "name": name, "date": date, "type": "application/pdf" })
}

async fn upload(
    State(state): State<FakeState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, Json<Value>) {
    let mut received = ReceivedUpload {
        request_id: headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        ..Default::default()
    };

    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name().unwrap_or_default() {
            "file" => {
                received.file_name = field.file_name().map(str::to_string);
                received.content_type = field.content_type().map(str::to_string);
                received.data = field.bytes().await.unwrap_or_default().to_vec();
            }
            "name" => received.name = field.text().await.unwrap_or_default(),
            "random_number" => received.random_number = field.text().await.unwrap_or_default(),
            _ => {}
        }
    }

    let reply = state.script.lock().unwrap().upload_reply.clone();
    let echoed: i64 = received.random_number.parse().unwrap_or_default();
    state.uploads.lock().unwrap().push(received);

    match reply {
        Some((status, body)) => (status, Json(body)),
        None => (StatusCode::OK, Json(json!({ "random_number": echoed }))),
    }
}

async fn search(
    State(state): State<FakeState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let query = params.get("random_number").cloned().unwrap_or_default();
    state.searches.lock().unwrap().push(query.clone());

    let scripted = state.script.lock().unwrap().searches.get(&query).cloned();
    let (delay, status, body) = scripted.unwrap_or((Duration::ZERO, StatusCode::OK, json!([])));
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    (status, Json(body))
}

async fn listing(State(state): State<FakeState>) -> Json<Value> {
    let body = state.script.lock().unwrap().listing.clone();
    Json(body.unwrap_or_else(|| json!([])))
}

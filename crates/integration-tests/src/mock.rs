//! A local stand-in for the Harvest API.
//!
//! Serves the endpoints the tools hit, keeps an in-memory candidate store so
//! create/get round-trips work, and can be scripted to answer the next
//! requests with arbitrary statuses to exercise the client's retry behavior.

use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Path, Request, State};
use axum::http::{HeaderValue, StatusCode, header::RETRY_AFTER};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// A response the mock plays back instead of handling the request.
#[derive(Debug, Clone, Copy)]
pub struct Scripted {
    /// The status code to answer with.
    pub status: StatusCode,
    /// Value for a `Retry-After` header, in seconds.
    pub retry_after: Option<u64>,
    /// Hold the response back this long before answering.
    pub delay: Option<Duration>,
}

impl Scripted {
    /// A plain status answer.
    pub fn status(status: u16) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            retry_after: None,
            delay: None,
        }
    }

    /// A throttling answer with a `Retry-After` hint.
    pub fn throttled(retry_after_secs: u64) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            retry_after: Some(retry_after_secs),
            delay: None,
        }
    }

    /// An answer held back long enough to trip the client's request timeout.
    pub fn stalled(delay_secs: u64) -> Self {
        Self {
            status: StatusCode::OK,
            retry_after: None,
            delay: Some(Duration::from_secs(delay_secs)),
        }
    }
}

#[derive(Default)]
struct MockState {
    candidates: Mutex<HashMap<i64, Value>>,
    next_candidate_id: AtomicI64,
    script: Mutex<VecDeque<Scripted>>,
    hits: Mutex<Vec<Instant>>,
}

/// A running mock Harvest server.
pub struct MockHarvest {
    state: Arc<MockState>,
    address: SocketAddr,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockHarvest {
    /// Bind and serve the mock on an ephemeral local port.
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            next_candidate_id: AtomicI64::new(9000),
            ..MockState::default()
        });

        let app = Router::new()
            .route("/v1/jobs", get(list_jobs))
            .route("/v1/jobs/{id}", get(get_job))
            .route("/v1/jobs/{id}/stages", get(list_stages))
            .route("/v1/job_stages", get(list_stages_global))
            .route("/v1/job_stages/{id}", get(get_stage))
            .route("/v1/candidates", get(list_candidates).post(create_candidate))
            .route("/v1/candidates/{id}", get(get_candidate).patch(update_candidate))
            .route("/v1/candidates/{id}/activity_feed/notes", post(create_note))
            .route("/v1/applications", get(list_applications))
            .route("/v1/applications/{id}", get(get_application))
            .route("/v1/applications/{id}/advance", post(advance_application))
            .route("/v1/applications/{id}/reject", post(reject_application))
            .route("/v1/applications/{id}/notes", post(create_note))
            .route("/v1/departments", get(list_departments))
            .route("/v1/offices", get(list_offices))
            .route("/v1/users", get(list_users))
            .layer(middleware::from_fn_with_state(state.clone(), intercept))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            address,
            _handle: handle,
        }
    }

    /// The base URL to point the Harvest client at.
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.address)
    }

    /// Queue responses to play back, in order, before normal handling resumes.
    pub fn script(&self, responses: impl IntoIterator<Item = Scripted>) {
        self.state.script.lock().unwrap().extend(responses);
    }

    /// Number of requests that reached the mock.
    pub fn hit_count(&self) -> usize {
        self.state.hits.lock().unwrap().len()
    }

    /// Arrival timestamps of all requests that reached the mock.
    pub fn hits(&self) -> Vec<Instant> {
        self.state.hits.lock().unwrap().clone()
    }
}

/// Records every request and plays back scripted responses when queued.
async fn intercept(State(state): State<Arc<MockState>>, request: Request, next: Next) -> Response {
    state.hits.lock().unwrap().push(Instant::now());

    let scripted = state.script.lock().unwrap().pop_front();

    if let Some(scripted) = scripted {
        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }

        let mut response = scripted.status.into_response();

        if let Some(secs) = scripted.retry_after {
            response.headers_mut().insert(RETRY_AFTER, HeaderValue::from(secs));
        }

        return response;
    }

    next.run(request).await
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Resource not found" })),
    )
        .into_response()
}

async fn list_jobs() -> Json<Value> {
    Json(json!([
        { "id": 1001, "name": "Staff Engineer", "status": "open" },
        { "id": 1002, "name": "Product Designer", "status": "closed" }
    ]))
}

async fn get_job(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({
        "id": id,
        "name": "Staff Engineer",
        "status": "open",
        "departments": [{ "id": 77, "name": "Engineering" }],
        "offices": [{ "id": 5, "name": "Berlin" }]
    }))
}

async fn list_stages(Path(job_id): Path<i64>) -> Json<Value> {
    Json(json!([
        { "id": 2001, "name": "Application Review", "job_id": job_id },
        { "id": 2002, "name": "Phone Screen", "job_id": job_id },
        { "id": 2003, "name": "Onsite", "job_id": job_id }
    ]))
}

async fn list_stages_global() -> Json<Value> {
    Json(json!([
        { "id": 2001, "name": "Application Review", "job_id": 1001 },
        { "id": 2002, "name": "Phone Screen", "job_id": 1001 }
    ]))
}

async fn get_stage(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({ "id": id, "name": "Phone Screen", "interviews": [] }))
}

async fn list_candidates(State(state): State<Arc<MockState>>) -> Json<Value> {
    let candidates: Vec<Value> = state.candidates.lock().unwrap().values().cloned().collect();
    Json(Value::Array(candidates))
}

async fn create_candidate(State(state): State<Arc<MockState>>, Json(mut body): Json<Value>) -> Json<Value> {
    let id = state.next_candidate_id.fetch_add(1, Ordering::Relaxed);
    body["id"] = json!(id);

    state.candidates.lock().unwrap().insert(id, body.clone());

    Json(body)
}

async fn get_candidate(State(state): State<Arc<MockState>>, Path(id): Path<i64>) -> Response {
    match state.candidates.lock().unwrap().get(&id) {
        Some(candidate) => Json(candidate.clone()).into_response(),
        None => not_found(),
    }
}

async fn update_candidate(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut candidates = state.candidates.lock().unwrap();

    let Some(candidate) = candidates.get_mut(&id) else {
        return not_found();
    };

    if let (Value::Object(stored), Value::Object(update)) = (&mut *candidate, body) {
        for (key, value) in update {
            stored.insert(key, value);
        }
    }

    Json(candidate.clone()).into_response()
}

async fn create_note(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "id": 31337,
        "subject_id": id,
        "body": body["body"],
        "visibility": body["visibility"]
    }))
}

async fn list_applications() -> Json<Value> {
    Json(json!([
        { "id": 11111, "candidate_id": 9000, "status": "active", "current_stage": { "id": 2001, "name": "Application Review" } }
    ]))
}

async fn get_application(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({
        "id": id,
        "candidate_id": 9000,
        "status": "active",
        "current_stage": { "id": 2001, "name": "Application Review" }
    }))
}

async fn advance_application(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    let from = body["from_stage_id"].as_i64().unwrap_or_default();
    let to = body["to_stage_id"].as_i64().unwrap_or(from + 1);

    Json(json!({
        "id": id,
        "status": "active",
        "current_stage": { "id": to, "name": format!("Stage {to}") }
    }))
}

async fn reject_application(Path(id): Path<i64>, Json(body): Json<Value>) -> Json<Value> {
    let reason = body
        .get("rejection_reason_id")
        .cloned()
        .map(|id| json!({ "id": id, "name": "Other" }))
        .unwrap_or(Value::Null);

    Json(json!({
        "id": id,
        "status": "rejected",
        "rejection_reason": reason,
        "rejection_details": { "notes": body.get("notes").cloned().unwrap_or(Value::Null) }
    }))
}

async fn list_departments() -> Json<Value> {
    Json(json!([{ "id": 77, "name": "Engineering" }, { "id": 78, "name": "Design" }]))
}

async fn list_offices() -> Json<Value> {
    Json(json!([{ "id": 5, "name": "Berlin" }, { "id": 6, "name": "New York" }]))
}

async fn list_users() -> Json<Value> {
    Json(json!([{ "id": 42, "name": "Recruiter One", "primary_email_address": "recruiter@example.com" }]))
}

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use document_console::config::ApiSettings;
use document_console::services::{ApiClient, StaticCredentials};
use secrecy::Secret;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_TOKEN: &str = "test-token";

/// Requests the mock backend received, as `(method path, body or query)`.
#[derive(Default)]
pub struct Received {
    entries: Mutex<Vec<(String, Value)>>,
}

impl Received {
    fn push(&self, route: String, payload: Value) {
        self.entries.lock().unwrap().push((route, payload));
    }

    pub fn all(&self) -> Vec<(String, Value)> {
        self.entries.lock().unwrap().clone()
    }
}

#[derive(Clone, Default)]
struct Backend {
    received: Arc<Received>,
    paged: Arc<AtomicBool>,
}

pub struct TestApp {
    pub address: String,
    pub received: Arc<Received>,
    paged: Arc<AtomicBool>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let backend = Backend::default();
        let received = backend.received.clone();
        let paged = backend.paged.clone();

        let router = Router::new()
            .route("/documents", get(list_documents))
            .route("/documents/batch", post(batch_operation))
            .route("/documents/:id", get(get_document).delete(delete_document))
            .route("/documents/:id/content", get(get_content))
            .route("/documents/:id/metadata", post(update_metadata))
            .route("/documents/:id/annotations", post(add_annotation))
            .route("/api/findings", get(list_findings).post(create_finding))
            .route("/api/findings/dashboard/stats", get(findings_stats))
            .route("/api/findings/meetings", post(create_meeting))
            .route("/api/findings/meetings/all", get(list_meetings))
            .route("/api/findings/:id", put(update_finding))
            .route(
                "/api/findings/:id/comments",
                get(list_comments).post(add_comment),
            )
            .with_state(backend);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        TestApp {
            address: format!("http://127.0.0.1:{}", port),
            received,
            paged,
        }
    }

    /// Answer the collection endpoint with a `{documents: [...]}` envelope.
    pub fn use_paged_collection(&self) {
        self.paged.store(true, Ordering::SeqCst);
    }

    pub fn client(&self) -> ApiClient {
        self.client_with_token(Some(TEST_TOKEN))
    }

    pub fn client_with_token(&self, token: Option<&str>) -> ApiClient {
        ApiClient::new(
            &ApiSettings {
                base_url: self.address.clone(),
            },
            Arc::new(StaticCredentials::new(
                token.map(|t| Secret::new(t.to_string())),
            )),
        )
        .expect("Failed to build API client")
    }
}

fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {}", TEST_TOKEN);
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Invalid or expired token" })),
        )
            .into_response()),
    }
}

pub fn summaries() -> Value {
    json!([
        {
            "id": 1,
            "name": "Invoice Q1",
            "type": "application/pdf",
            "uploadDate": "2024-01-15T08:00:00",
            "status": "Processed",
            "content": "payment due"
        },
        {
            "id": "2",
            "name": "Report",
            "type": "application/pdf",
            "upload_date": "2024-02-01T10:30:00Z",
            "status": "Analyzing",
            "content": "summary"
        }
    ])
}

pub fn detail(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Invoice Q1",
        "name": "Invoice Q1",
        "file_type": "pdf",
        "file_size": 20480,
        "content": "payment due",
        "metadata": { "department": "Finance" },
        "aiAnalysis": { "summary": "Quarterly invoice", "risk": { "level": "low" } },
        "annotations": [
            { "id": 1, "text": "Check totals", "user": "auditor", "timestamp": "2024-01-16T09:00:00" }
        ],
        "versions": [
            { "id": 2, "version_number": 2, "content": "v2", "created_at": "2024-01-17T00:00:00Z" },
            { "id": 1, "version_number": 1, "content": "v1", "created_at": "2024-01-15T00:00:00Z" }
        ],
        "relatedDocuments": [],
        "activityLog": [
            { "action": "uploaded", "user": "auditor", "timestamp": "2024-01-15T08:00:00Z" }
        ]
    })
}

/// A detail whose collections are all explicit `null`s.
pub fn sparse_detail(id: &str) -> Value {
    json!({
        "id": id,
        "title": "Scanned receipt",
        "file_type": null,
        "content": null,
        "metadata": null,
        "aiAnalysis": null,
        "annotations": null,
        "versions": null,
        "relatedDocuments": null,
        "activityLog": null,
        "workflow": null
    })
}

async fn list_documents(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    if backend.paged.load(Ordering::SeqCst) {
        Json(json!({ "documents": summaries(), "total": 2, "page": 1, "limit": 20, "total_pages": 1 }))
            .into_response()
    } else {
        Json(summaries()).into_response()
    }
}

async fn get_document(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    match id.as_str() {
        "1" => Json(detail("1")).into_response(),
        "sparse" => Json(sparse_detail("sparse")).into_response(),
        "malformed" => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            "{\"id\": ",
        )
            .into_response(),
        "unavailable" => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "Document service is restarting" })),
        )
            .into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": format!("Document {} not found", id) })),
        )
            .into_response(),
    }
}

async fn get_content(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    if id != "1" {
        return StatusCode::NOT_FOUND.into_response();
    }
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        b"%PDF-1.4 test".to_vec(),
    )
        .into_response()
}

async fn update_metadata(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    backend
        .received
        .push(format!("POST /documents/{}/metadata", id), body);
    Json(json!({ "status": "updated" })).into_response()
}

async fn add_annotation(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    backend
        .received
        .push(format!("POST /documents/{}/annotations", id), body);
    (StatusCode::CREATED, Json(json!({ "id": 2 }))).into_response()
}

async fn batch_operation(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    backend
        .received
        .push("POST /documents/batch".to_string(), body.clone());

    match body["operation"].as_str() {
        Some("explode") => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": "Unsupported operation" })),
        )
            .into_response(),
        Some("lock") => Json(json!({ "success": false, "message": "Documents are locked" }))
            .into_response(),
        _ => {
            let count = body["document_ids"].as_array().map_or(0, Vec::len);
            Json(json!({ "success": true, "message": format!("{} documents processed", count) }))
                .into_response()
        }
    }
}

async fn delete_document(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    if id == "1" {
        StatusCode::NO_CONTENT.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn list_findings(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    backend
        .received
        .push("GET /api/findings".to_string(), json!(query));

    Json(json!({
        "findings": [{
            "id": 11,
            "finding_id": "FND-2024-001",
            "title": "Missing approval signature",
            "description": "Invoice lacks a second approver",
            "finding_type": "compliance",
            "severity": "critical",
            "status": "open",
            "ai_detected": true,
            "ai_confidence_score": 0.92,
            "document_id": 1,
            "assigned_to": null,
            "due_date": null,
            "created_by": "auditor",
            "created_at": "2024-03-01T12:00:00",
            "comments_count": 0
        }],
        "total": 1
    }))
    .into_response()
}

async fn findings_stats(headers: HeaderMap) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    Json(json!({
        "total_findings": 12,
        "open_findings": 5,
        "critical_findings": 2,
        "ai_detected_findings": 7,
        "upcoming_meetings": 1
    }))
    .into_response()
}

async fn list_meetings(headers: HeaderMap) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    Json(json!([{
        "id": 3,
        "meeting_id": "MTG-2024-003",
        "title": "Quarterly audit review",
        "meeting_type": "review",
        "scheduled_time": "2024-04-02T14:00:00Z",
        "duration_minutes": 60,
        "location": null,
        "status": "scheduled",
        "organizer": "lead-auditor",
        "participants": ["auditor", "finance"],
        "agenda": ["Open findings"]
    }]))
    .into_response()
}

async fn add_comment(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    backend
        .received
        .push(format!("POST /api/findings/{}/comments", id), body);
    (StatusCode::CREATED, Json(json!({ "id": 1 }))).into_response()
}

async fn create_finding(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    backend
        .received
        .push("POST /api/findings".to_string(), body);
    (
        StatusCode::CREATED,
        Json(json!({
            "id": 21,
            "finding_id": "FND-2024-021",
            "message": "Finding created successfully"
        })),
    )
        .into_response()
}

async fn update_finding(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    if id != "11" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": format!("Finding {} not found", id) })),
        )
            .into_response();
    }
    backend
        .received
        .push(format!("PUT /api/findings/{}", id), body.clone());
    Json(json!({ "id": 11, "finding_id": "FND-2024-001", "status": body["status"] })).into_response()
}

async fn list_comments(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    if id != "11" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({
        "comments": [
            {
                "id": 1,
                "comment": "Requested second approver",
                "comment_type": "general",
                "created_by": "auditor",
                "created_at": "2024-03-02T09:30:00"
            },
            {
                "id": 2,
                "comment": "Signed approval uploaded",
                "comment_type": "evidence",
                "created_by": "finance",
                "created_at": "2024-03-04T16:10:00Z"
            }
        ]
    }))
    .into_response()
}

async fn create_meeting(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    backend
        .received
        .push("POST /api/findings/meetings".to_string(), body);
    // Created without echoing anything back.
    StatusCode::CREATED.into_response()
}

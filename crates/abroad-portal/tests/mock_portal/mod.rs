//! In-process stand-in for the remote portal API, served on an ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};

pub const ADMIN_TOKEN: &str = "admin-token";
pub const LETTER_TOKEN: &str = "letter-token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    pub letter_id: String,
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub struct Recorded {
    pub authorization: Vec<(String, Option<String>)>,
    pub queries: Vec<(String, HashMap<String, String>)>,
    pub uploads: Vec<RecordedUpload>,
    pub questions: Vec<Value>,
}

pub type Shared = Arc<Mutex<Recorded>>;

pub struct MockPortal {
    pub base_url: String,
    pub recorded: Shared,
}

impl MockPortal {
    pub async fn start() -> Self {
        let recorded: Shared = Arc::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let app = router(recorded.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock portal serves");
        });

        Self {
            base_url: format!("http://{addr}"),
            recorded,
        }
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.recorded.lock().expect("recorded mutex").uploads.clone()
    }

    pub fn authorization_for(&self, route: &str) -> Vec<Option<String>> {
        self.recorded
            .lock()
            .expect("recorded mutex")
            .authorization
            .iter()
            .filter(|(seen, _)| seen == route)
            .map(|(_, header)| header.clone())
            .collect()
    }

    pub fn query_for(&self, route: &str) -> Option<HashMap<String, String>> {
        self.recorded
            .lock()
            .expect("recorded mutex")
            .queries
            .iter()
            .rev()
            .find(|(seen, _)| seen == route)
            .map(|(_, query)| query.clone())
    }
}

fn router(recorded: Shared) -> Router {
    Router::new()
        .route("/api/programs/", get(list_programs).post(create_program))
        .route(
            "/api/programs/:id/application_status/",
            get(application_status),
        )
        .route("/api/documents/", get(documents))
        .route("/api/questions/", get(list_questions).post(create_question))
        .route(
            "/api/questions/:id/",
            patch(update_question).delete(delete_question),
        )
        .route("/api/letters/:id/public_info/", get(letter_info))
        .route("/api/letters/:id/fulfill_letter/", post(fulfill_letter))
        .with_state(recorded)
}

fn record(
    recorded: &Shared,
    route: &str,
    headers: &HeaderMap,
    query: Option<&HashMap<String, String>>,
) {
    let header = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let mut guard = recorded.lock().expect("recorded mutex");
    guard.authorization.push((route.to_string(), header));
    if let Some(query) = query {
        guard.queries.push((route.to_string(), query.clone()));
    }
}

fn is_admin(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {ADMIN_TOKEN}"))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Authentication credentials were not provided."})),
    )
        .into_response()
}

pub fn program_json(id: u64, title: &str, deadline: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "year_semester": "2026 Summer",
        "description": "",
        "faculty_leads": [{"id": id, "display_name": format!("Lead {id}")}],
        "application_open_date": "2026-01-05",
        "application_deadline": deadline,
        "essential_document_deadline": "2026-04-01",
        "start_date": "2026-06-01",
        "end_date": "2026-07-15",
    })
}

async fn list_programs(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&recorded, "programs", &headers, Some(&query));
    let mut programs = vec![
        program_json(1, "Kyoto Summer", "2026-03-13"),
        program_json(2, "Lisbon Fall", "2026-03-20"),
        program_json(3, "Quito Spring", "2026-05-01"),
    ];
    if query.get("exclude_ended").map(String::as_str) != Some("true") {
        programs.push(program_json(4, "Oslo 2019", "2019-01-01"));
    }
    Json(Value::Array(programs))
}

async fn create_program(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&recorded, "create program", &headers, None);
    if !is_admin(&headers) {
        return unauthorized();
    }
    let mut created = program_json(
        50,
        body["title"].as_str().unwrap_or_default(),
        body["application_deadline"].as_str().unwrap_or_default(),
    );
    created["start_date"] = body["start_date"].clone();
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn application_status(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    record(&recorded, "application status", &headers, None);
    match id {
        1 => Json(json!({"application_id": 11, "status": "Applied", "payment_status": "paid"}))
            .into_response(),
        2 => Json(json!({"application_id": 12, "status": "enrolled"})).into_response(),
        3 => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "status backend down"})),
        )
            .into_response(),
        _ => Json(json!({"application_id": null, "status": null})).into_response(),
    }
}

async fn documents(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    record(&recorded, "documents", &headers, Some(&query));
    match query.get("application").map(String::as_str) {
        Some("11") => Json(json!([
            {"id": 1, "type": "Housing Questionnaire", "application": 11, "url": "https://files/1"},
            {"id": 2, "type": "Assumption of Risk", "application": 11},
        ]))
        .into_response(),
        Some("12") => (StatusCode::BAD_GATEWAY, "upstream timeout").into_response(),
        _ => Json(json!([])).into_response(),
    }
}

async fn list_questions(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&recorded, "questions", &headers, Some(&query));
    let program: u64 = query
        .get("program")
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default();
    let guard = recorded.lock().expect("recorded mutex");
    let questions: Vec<Value> = guard
        .questions
        .iter()
        .filter(|question| question["program"] == json!(program))
        .cloned()
        .collect();
    Json(Value::Array(questions))
}

async fn create_question(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&recorded, "create question", &headers, None);
    if !is_admin(&headers) {
        return unauthorized();
    }
    let mut guard = recorded.lock().expect("recorded mutex");
    let id = guard.questions.len() as u64 + 1;
    let question = json!({
        "id": id,
        "text": body["text"],
        "program": body["program"],
        "is_required": body["is_required"],
    });
    guard.questions.push(question.clone());
    (StatusCode::CREATED, Json(question)).into_response()
}

async fn update_question(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(body): Json<Value>,
) -> Response {
    record(&recorded, "update question", &headers, None);
    if !is_admin(&headers) {
        return unauthorized();
    }
    let mut guard = recorded.lock().expect("recorded mutex");
    let Some(question) = guard
        .questions
        .iter_mut()
        .find(|question| question["id"] == json!(id))
    else {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response();
    };
    if let Some(fields) = body.as_object() {
        for (key, value) in fields {
            question[key] = value.clone();
        }
    }
    Json(question.clone()).into_response()
}

async fn delete_question(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response {
    record(&recorded, "delete question", &headers, None);
    if !is_admin(&headers) {
        return unauthorized();
    }
    let mut guard = recorded.lock().expect("recorded mutex");
    guard.questions.retain(|question| question["id"] != json!(id));
    StatusCode::NO_CONTENT.into_response()
}

async fn letter_info(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    record(&recorded, "letter info", &headers, Some(&query));
    let valid = query.get("token").map(String::as_str) == Some(LETTER_TOKEN);
    if !valid {
        return Json(json!({"status": "invalid"}));
    }
    Json(json!({
        "status": "valid",
        "student_name": "Ada Student",
        "program_title": "Kyoto Summer",
        "is_fulfilled": id == "99",
    }))
}

async fn fulfill_letter(
    State(recorded): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    mut multipart: Multipart,
) -> Response {
    record(&recorded, "fulfill letter", &headers, Some(&query));
    if query.get("token").map(String::as_str) != Some(LETTER_TOKEN) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Invalid or expired token."})),
        )
            .into_response();
    }

    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        recorded
            .lock()
            .expect("recorded mutex")
            .uploads
            .push(RecordedUpload {
                letter_id: id.clone(),
                field: name,
                file_name,
                content_type,
                bytes,
                authorization: authorization.clone(),
            });
    }

    (StatusCode::CREATED, Json(json!({"status": "fulfilled"}))).into_response()
}

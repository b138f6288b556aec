//! Student API routes.
//!
//! Transport-free: the server hands over an [`ApiRequest`] with the whole
//! body already collected and writes back the [`ApiResponse`].
//!
//! # Responsibility
//! - Map `/students` requests onto [`StudentService`] calls.
//! - Shape every reply as a JSON envelope: `{students}`, `{message, record}`,
//!   `{message}` on success and `{error}` on failure.
//!
//! # Invariants
//! - Store and payload failures answer 500; only routing answers 404/405.
//! - No field validation: bodies are persisted as given.

use log::{error, warn};
use roster_core::db::{open_db, open_db_in_memory, DbResult};
use roster_core::{
    SqliteStudentRepository, StoreError, StoreResult, StudentFields, StudentService,
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::sync::Mutex;

pub const MSG_ADDED: &str = "Student added successfully";
pub const MSG_UPDATED: &str = "Student updated successfully";
pub const MSG_DELETED: &str = "Student deleted successfully";

const STUDENTS_PATHS: [&str; 2] = ["/students", "/api/students"];
const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Other,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path without the query string.
    pub path: String,
    pub body: Vec<u8>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            path: path.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

impl ApiResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Connection shared by all request threads.
pub struct AppState {
    conn: Mutex<Connection>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open(db_path: impl AsRef<Path>) -> DbResult<Self> {
        open_db(db_path).map(Self::new)
    }

    pub fn in_memory() -> DbResult<Self> {
        open_db_in_memory().map(Self::new)
    }

    /// Runs `op` against a service built over the locked connection.
    pub fn with_service<T>(
        &self,
        op: impl FnOnce(&StudentService<SqliteStudentRepository<'_>>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))?;
        let service = StudentService::new(SqliteStudentRepository::new(&conn));
        op(&service)
    }
}

#[derive(Debug, Deserialize)]
struct CreateBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    subject: String,
    marks: i64,
}

impl CreateBody {
    fn into_fields(self) -> StudentFields {
        StudentFields::new(self.name, self.email, self.subject, self.marks)
    }
}

#[derive(Debug, Deserialize)]
struct UpdateBody {
    #[serde(default, alias = "_id")]
    id: String,
    #[serde(flatten)]
    fields: CreateBody,
}

#[derive(Debug, Deserialize)]
struct DeleteBody {
    #[serde(default, alias = "_id")]
    id: String,
}

/// Failure of a single route; always rendered as `{error}`.
#[derive(Debug)]
enum RouteError {
    Store(StoreError),
    Payload(serde_json::Error),
}

impl From<StoreError> for RouteError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<serde_json::Error> for RouteError {
    fn from(value: serde_json::Error) -> Self {
        Self::Payload(value)
    }
}

impl RouteError {
    fn message(&self) -> String {
        match self {
            Self::Store(err) => err.to_string(),
            Self::Payload(err) => format!("invalid request body: {err}"),
        }
    }
}

/// Dispatches one request. Never panics; every outcome is a response.
pub fn handle_request(state: &AppState, request: &ApiRequest) -> ApiResponse {
    if request.path == HEALTH_PATH {
        return match request.method {
            Method::Get => ApiResponse::json(
                200,
                json!({"status": "ok", "version": roster_core::core_version()}),
            ),
            _ => error_response(405, "method not allowed"),
        };
    }
    if !STUDENTS_PATHS.contains(&request.path.as_str()) {
        return error_response(404, &format!("no route for {}", request.path));
    }

    let outcome = match request.method {
        Method::Get => list(state),
        Method::Post => create(state, &request.body),
        Method::Put => update(state, &request.body),
        Method::Delete => delete(state, &request.body),
        Method::Other => return error_response(405, "method not allowed"),
    };

    outcome.unwrap_or_else(|err| {
        match &err {
            RouteError::Store(_) => error!(
                "event=api_request module=api status=error method={} error={}",
                request.method.as_str(),
                err.message()
            ),
            RouteError::Payload(_) => warn!(
                "event=api_request module=api status=error method={} error={}",
                request.method.as_str(),
                err.message()
            ),
        }
        error_response(500, &err.message())
    })
}

fn list(state: &AppState) -> Result<ApiResponse, RouteError> {
    let students = state.with_service(|service| service.list())?;
    Ok(ApiResponse::json(200, json!({ "students": students })))
}

fn create(state: &AppState, body: &[u8]) -> Result<ApiResponse, RouteError> {
    let payload: CreateBody = serde_json::from_slice(body)?;
    let record = state.with_service(|service| service.create(payload.into_fields()))?;
    Ok(ApiResponse::json(
        200,
        json!({ "message": MSG_ADDED, "record": record }),
    ))
}

fn update(state: &AppState, body: &[u8]) -> Result<ApiResponse, RouteError> {
    let payload: UpdateBody = serde_json::from_slice(body)?;
    let fields = payload.fields.into_fields();
    state.with_service(|service| service.update(&payload.id, &fields))?;
    Ok(ApiResponse::json(200, json!({ "message": MSG_UPDATED })))
}

fn delete(state: &AppState, body: &[u8]) -> Result<ApiResponse, RouteError> {
    let payload: DeleteBody = serde_json::from_slice(body)?;
    state.with_service(|service| service.delete(&payload.id))?;
    Ok(ApiResponse::json(200, json!({ "message": MSG_DELETED })))
}

pub fn error_response(status: u16, message: &str) -> ApiResponse {
    ApiResponse::json(status, json!({ "error": message }))
}

#[cfg(test)]
mod tests {
    use super::{handle_request, ApiRequest, AppState, Method, MSG_ADDED, MSG_DELETED, MSG_UPDATED};
    use serde_json::{json, Value};

    fn call(state: &AppState, method: Method, path: &str, body: Value) -> (u16, Value) {
        let body = if body.is_null() {
            Vec::new()
        } else {
            body.to_string().into_bytes()
        };
        let response = handle_request(state, &ApiRequest::new(method, path, body));
        (response.status, response.body)
    }

    #[test]
    fn create_then_list_returns_record_with_id() {
        let state = AppState::in_memory().unwrap();
        let (status, created) = call(
            &state,
            Method::Post,
            "/students",
            json!({"name": "Ada", "email": "ada@x.io", "subject": "Math", "marks": 95}),
        );
        assert_eq!(status, 200);
        assert_eq!(created["message"], MSG_ADDED);
        let id = created["record"]["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());

        let (status, listed) = call(&state, Method::Get, "/students", Value::Null);
        assert_eq!(status, 200);
        let students = listed["students"].as_array().unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0]["id"], id.as_str());
        assert_eq!(students[0]["marks"], 95);
    }

    #[test]
    fn missing_text_fields_default_to_empty_strings() {
        let state = AppState::in_memory().unwrap();
        let (status, created) = call(&state, Method::Post, "/students", json!({"marks": 150}));
        assert_eq!(status, 200);
        assert_eq!(created["record"]["name"], "");
        assert_eq!(created["record"]["marks"], 150);
    }

    #[test]
    fn bad_payloads_answer_500_with_error_envelope() {
        let state = AppState::in_memory().unwrap();
        let (status, body) = call(
            &state,
            Method::Post,
            "/students",
            json!({"name": "A", "marks": "ninety"}),
        );
        assert_eq!(status, 500);
        assert!(body["error"].as_str().unwrap().contains("invalid request body"));

        let response = handle_request(
            &state,
            &ApiRequest::new(Method::Post, "/students", b"{not json".to_vec()),
        );
        assert_eq!(response.status, 500);
        assert!(response.body.get("error").is_some());
    }

    #[test]
    fn update_and_delete_unknown_ids_succeed_without_changes() {
        let state = AppState::in_memory().unwrap();
        call(
            &state,
            Method::Post,
            "/students",
            json!({"name": "Ada", "email": "a@b.c", "subject": "Math", "marks": 70}),
        );

        let (status, body) = call(
            &state,
            Method::Put,
            "/students",
            json!({"id": "missing", "name": "X", "email": "", "subject": "", "marks": 1}),
        );
        assert_eq!((status, body), (200, json!({"message": MSG_UPDATED})));

        let (status, body) = call(&state, Method::Delete, "/students", json!({"id": "missing"}));
        assert_eq!((status, body), (200, json!({"message": MSG_DELETED})));

        let (_, listed) = call(&state, Method::Get, "/students", Value::Null);
        assert_eq!(listed["students"][0]["name"], "Ada");
        assert_eq!(listed["students"][0]["marks"], 70);
    }

    #[test]
    fn update_accepts_underscore_id_alias() {
        let state = AppState::in_memory().unwrap();
        let (_, created) = call(
            &state,
            Method::Post,
            "/api/students",
            json!({"name": "Ada", "email": "a@b.c", "subject": "Math", "marks": 70}),
        );
        let id = created["record"]["id"].clone();

        call(
            &state,
            Method::Put,
            "/api/students",
            json!({"_id": id, "name": "Ada L", "email": "a@b.c", "subject": "CS", "marks": 88}),
        );

        let (_, listed) = call(&state, Method::Get, "/api/students", Value::Null);
        assert_eq!(listed["students"][0]["subject"], "CS");
        assert_eq!(listed["students"][0]["marks"], 88);
    }

    #[test]
    fn routing_errors_use_404_and_405() {
        let state = AppState::in_memory().unwrap();
        let (status, body) = call(&state, Method::Get, "/courses", Value::Null);
        assert_eq!(status, 404);
        assert!(body["error"].is_string());

        let (status, _) = call(&state, Method::Other, "/students", Value::Null);
        assert_eq!(status, 405);

        let (status, body) = call(&state, Method::Get, "/health", Value::Null);
        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");
    }
}

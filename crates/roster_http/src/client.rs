//! Blocking client for the student API.

use log::debug;
use reqwest::blocking::Client;
use reqwest::Method;
use roster_core::{Student, StudentFields};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

const STUDENTS_PATH: &str = "/students";
const HEALTH_PATH: &str = "/health";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug)]
pub enum ClientError {
    /// Connect, send or receive failed before a status line arrived.
    Transport(reqwest::Error),
    /// Non-2xx reply; `message` is the server's `error` field when present.
    Http { status: u16, message: String },
    Decode(String),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "request failed: {err}"),
            Self::Http { status, message } => write!(f, "server answered {status}: {message}"),
            Self::Decode(message) => write!(f, "unexpected response: {message}"),
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    students: Vec<Student>,
}

#[derive(Debug, Deserialize)]
struct CreateEnvelope {
    record: Student,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    message: String,
}

/// The remote CRUD surface, as the page controller sees it.
pub trait StudentsApi {
    fn list_students(&self) -> ClientResult<Vec<Student>>;
    fn create_student(&self, fields: &StudentFields) -> ClientResult<Student>;
    fn update_student(&self, id: &str, fields: &StudentFields) -> ClientResult<String>;
    fn delete_student(&self, id: &str) -> ClientResult<String>;
}

/// Must not be called from inside an async runtime.
#[derive(Debug, Clone)]
pub struct ApiClient {
    addr: String,
    http: Client,
    timeout: Duration,
}

impl ApiClient {
    /// `addr` is `host:port`, optionally prefixed with `http://`.
    pub fn new(addr: impl Into<String>) -> Self {
        let addr = addr.into();
        let addr = addr
            .strip_prefix("http://")
            .unwrap_or(&addr)
            .trim_end_matches('/')
            .to_string();
        Self {
            addr,
            http: Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Returns the server version reported by `/health`.
    pub fn health(&self) -> ClientResult<String> {
        let body: Value = self.send(Method::GET, HEALTH_PATH, None)?;
        body.get("version")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ClientError::Decode("health reply without version".to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ClientResult<T> {
        let mut request = self
            .http
            .request(method.clone(), self.url(path))
            .timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send()?;
        let status = response.status();
        let bytes = response.bytes()?;
        debug!(
            "event=api_call module=client status={} method={method} path={path} code={}",
            if status.is_success() { "ok" } else { "error" },
            status.as_u16()
        );

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| String::from_utf8_lossy(&bytes).into_owned());
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl StudentsApi for ApiClient {
    fn list_students(&self) -> ClientResult<Vec<Student>> {
        let envelope: ListEnvelope = self.send(Method::GET, STUDENTS_PATH, None)?;
        Ok(envelope.students)
    }

    fn create_student(&self, fields: &StudentFields) -> ClientResult<Student> {
        let body = serde_json::to_value(fields)?;
        let envelope: CreateEnvelope = self.send(Method::POST, STUDENTS_PATH, Some(&body))?;
        Ok(envelope.record)
    }

    fn update_student(&self, id: &str, fields: &StudentFields) -> ClientResult<String> {
        let body = json!({
            "id": id,
            "name": fields.name,
            "email": fields.email,
            "subject": fields.subject,
            "marks": fields.marks,
        });
        let envelope: MessageEnvelope = self.send(Method::PUT, STUDENTS_PATH, Some(&body))?;
        Ok(envelope.message)
    }

    fn delete_student(&self, id: &str) -> ClientResult<String> {
        let body = json!({ "id": id });
        let envelope: MessageEnvelope = self.send(Method::DELETE, STUDENTS_PATH, Some(&body))?;
        Ok(envelope.message)
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiClient, ClientError, StudentsApi};

    #[test]
    fn new_strips_scheme_and_trailing_slash() {
        assert_eq!(ApiClient::new("http://127.0.0.1:3000/").addr(), "127.0.0.1:3000");
        assert_eq!(ApiClient::new("localhost:8080").addr(), "localhost:8080");
        assert_eq!(
            ApiClient::new("localhost:8080").url("/students"),
            "http://localhost:8080/students"
        );
    }

    #[test]
    fn bad_json_maps_to_decode_error() {
        let err = ClientError::from(serde_json::from_str::<u8>("nope").unwrap_err());
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn connecting_to_closed_port_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = ApiClient::new(addr.to_string()).list_students().unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
    }
}

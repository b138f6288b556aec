//! HTTP boundary for the student roster: JSON API server, blocking client,
//! and the page controller that drives the listing from the client side.

pub mod api;
pub mod client;
pub mod config;
pub mod page;
pub mod server;

pub use api::{handle_request, ApiRequest, ApiResponse, AppState, Method};
pub use client::{ApiClient, ClientError, ClientResult, StudentsApi};
pub use config::{ServerConfig, ServerConfigBuilder};
pub use page::{StudentsPage, SubmitError};
pub use server::{Server, ServerError, ShutdownHandle};

//! Core logic for the student roster.
//! Owns the record model, the SQLite record store, the CRUD contract, and the
//! client-side listing/chart/form logic that sits on top of it.

pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use form::student_form::{FormErrors, FormField, StudentForm, ValidationError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::student::{MarksBand, Student, StudentFields, StudentId};
pub use repo::student_repo::{
    SqliteStudentRepository, StoreError, StoreResult, StudentRepository,
};
pub use service::student_service::StudentService;
pub use view::aggregate::{aggregate_by_marks, average_marks, MarksGroup, MarksSummary};
pub use view::listing::{
    run_listing, ListingPage, ListingQuery, SortConfig, SortDirection, SortKey,
};
pub use view::pagination::{PageInfo, Pagination, DEFAULT_PAGE_SIZE};
pub use view::state::{ViewAction, ViewMode, ViewState};

pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

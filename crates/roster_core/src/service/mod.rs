//! CRUD use-case services.
//!
//! # Responsibility
//! - Turn repository calls into the list/create/update/delete contract.
//! - Keep the HTTP layer free of storage details.

pub mod student_service;

//! Record store access.
//!
//! # Responsibility
//! - Define the persistence contract used by the CRUD service.
//! - Keep SQL details behind `SqliteStudentRepository`.
//!
//! # Invariants
//! - Write paths report whether a row matched; they never invent not-found
//!   errors. Deciding what a miss means is the service's job.

pub mod student_repo;

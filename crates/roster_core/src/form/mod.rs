//! Input capture and validation before a record is created.
//!
//! # Invariants
//! - All four fields are validated on every submit; errors never hide each
//!   other.
//! - A failed submit keeps the typed values; a successful one clears them.

pub mod student_form;

//! Student domain model.
//!
//! # Invariants
//! - Every persisted record is identified by a store-assigned `StudentId`.
//! - Deletion is physical; there is no tombstone state.

pub mod student;

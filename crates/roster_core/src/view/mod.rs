//! Client-side views over the full record set.
//!
//! # Responsibility
//! - Derive the table page (sort → filter → paginate) from fetched records.
//! - Derive the marks chart from the filtered set.
//! - Hold UI state as an immutable value recomputed per action.
//!
//! # Invariants
//! - Everything here is pure: same records and state give the same output.
//! - Filtering runs after sorting, so survivors keep sort order.

pub mod aggregate;
pub mod listing;
pub mod pagination;
pub mod state;

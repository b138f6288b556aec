//! Student record.
//!
//! # Responsibility
//! - Define the single entity held by the record store.
//! - Keep the wire shape (`{id, name, email, subject, marks}`) in one place.
//!
//! # Invariants
//! - `id` is assigned once at creation and never rewritten.
//! - Field contents are not checked here: the API persists what it is given,
//!   and the record form is the only validation gate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque record identifier.
///
/// Kept as text: ids arriving on update/delete requests may not be UUIDs, and
/// those must behave as "no match" rather than as decode failures.
pub type StudentId = String;

/// The four caller-supplied fields of a record.
///
/// Used as the create payload and as the full replacement on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentFields {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub marks: i64,
}

impl StudentFields {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        marks: i64,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            marks,
        }
    }
}

/// A persisted student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// `_id` is accepted on input for documents exported from the old store.
    #[serde(alias = "_id")]
    pub id: StudentId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub marks: i64,
}

impl Student {
    /// Creates a record with a freshly generated identifier.
    pub fn new(fields: StudentFields) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), fields)
    }

    /// Rebuilds a record whose identity already exists (read paths, imports).
    pub fn with_id(id: impl Into<StudentId>, fields: StudentFields) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            email: fields.email,
            subject: fields.subject,
            marks: fields.marks,
        }
    }

    /// Replaces every mutable field, keeping the identifier.
    pub fn apply(&mut self, fields: StudentFields) {
        self.name = fields.name;
        self.email = fields.email;
        self.subject = fields.subject;
        self.marks = fields.marks;
    }

    pub fn fields(&self) -> StudentFields {
        StudentFields::new(
            self.name.clone(),
            self.email.clone(),
            self.subject.clone(),
            self.marks,
        )
    }

    pub fn band(&self) -> MarksBand {
        MarksBand::for_marks(self.marks)
    }
}

/// Coarse marks classification used to colour-code the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarksBand {
    /// 80 and above.
    High,
    /// 60..=79.
    Good,
    /// 40..=59.
    Fair,
    /// Below 40.
    Low,
}

impl MarksBand {
    pub fn for_marks(marks: i64) -> Self {
        match marks {
            m if m >= 80 => Self::High,
            m if m >= 60 => Self::Good,
            m if m >= 40 => Self::Fair,
            _ => Self::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Low => "low",
        }
    }
}

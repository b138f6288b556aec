//! "Add student" form state and validation rules.

use crate::model::student::StudentFields;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid email shape regex"));

const MARKS_MIN: i64 = 0;
const MARKS_MAX: i64 = 100;

/// Form input a validation error is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormField {
    Name,
    Email,
    Subject,
    Marks,
}

impl FormField {
    pub const ALL: [FormField; 4] = [Self::Name, Self::Email, Self::Subject, Self::Marks];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Marks => "marks",
        }
    }
}

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    Required,
    InvalidFormat,
    OutOfRange,
}

impl ValidationError {
    /// Short machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::InvalidFormat => "invalid format",
            Self::OutOfRange => "out of range",
        }
    }

    /// Message shown under the input.
    pub fn message(self, field: FormField) -> &'static str {
        match (field, self) {
            (FormField::Name, _) => "Name is required",
            (FormField::Email, Self::Required) => "Email is required",
            (FormField::Email, _) => "Email is invalid",
            (FormField::Subject, _) => "Subject is required",
            (FormField::Marks, Self::Required) => "Marks are required",
            (FormField::Marks, _) => "Marks must be a number between 0 and 100",
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Error for ValidationError {}

/// Per-field errors from one submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: BTreeMap<FormField, ValidationError>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: FormField) -> Option<ValidationError> {
        self.errors.get(&field).copied()
    }

    pub fn fields(&self) -> impl Iterator<Item = FormField> + '_ {
        self.errors.keys().copied()
    }

    /// `(field, message)` pairs in form order.
    pub fn messages(&self) -> impl Iterator<Item = (FormField, &'static str)> + '_ {
        self.errors
            .iter()
            .map(|(field, error)| (*field, error.message(*field)))
    }

    fn insert(&mut self, field: FormField, error: ValidationError) {
        self.errors.insert(field, error);
    }
}

impl Display for FormErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .messages()
            .map(|(_, message)| message)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl Error for FormErrors {}

/// Raw text typed into the add-student form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub marks: String,
    errors: FormErrors,
}

impl StudentForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        marks: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            marks: marks.into(),
            errors: FormErrors::default(),
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Subject => self.subject = value,
            FormField::Marks => self.marks = value,
        }
    }

    /// Errors from the most recent submit.
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// Checks every field without changing the form.
    pub fn validate(&self) -> Result<StudentFields, FormErrors> {
        let mut errors = FormErrors::default();

        if is_blank(&self.name) {
            errors.insert(FormField::Name, ValidationError::Required);
        }

        if is_blank(&self.email) {
            errors.insert(FormField::Email, ValidationError::Required);
        } else if !EMAIL_SHAPE_RE.is_match(&self.email) {
            errors.insert(FormField::Email, ValidationError::InvalidFormat);
        }

        if is_blank(&self.subject) {
            errors.insert(FormField::Subject, ValidationError::Required);
        }

        let marks = if is_blank(&self.marks) {
            errors.insert(FormField::Marks, ValidationError::Required);
            None
        } else {
            match parse_marks(&self.marks) {
                Some(value) => Some(value),
                None => {
                    errors.insert(FormField::Marks, ValidationError::OutOfRange);
                    None
                }
            }
        };

        match marks {
            Some(marks) if errors.is_empty() => Ok(StudentFields::new(
                self.name.clone(),
                self.email.clone(),
                self.subject.clone(),
                marks,
            )),
            _ => Err(errors),
        }
    }

    /// Validates and, on success, hands back the create payload and clears
    /// the inputs. On failure the inputs stay and the errors are recorded.
    pub fn submit(&mut self) -> Result<StudentFields, FormErrors> {
        match self.validate() {
            Ok(fields) => {
                *self = Self::default();
                Ok(fields)
            }
            Err(errors) => {
                debug!(
                    "event=form_submit module=form status=rejected fields={}",
                    errors
                        .fields()
                        .map(FormField::as_str)
                        .collect::<Vec<_>>()
                        .join(",")
                );
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn parse_marks(raw: &str) -> Option<i64> {
    let marks = raw.trim().parse::<i64>().ok()?;
    (MARKS_MIN..=MARKS_MAX).contains(&marks).then_some(marks)
}

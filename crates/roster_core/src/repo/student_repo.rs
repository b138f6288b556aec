//! Student repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/list/get/update/delete over the `students` table.
//! - Decode rows back into [`Student`] and reject rows that cannot be decoded.
//!
//! # Invariants
//! - `list_students` returns natural store order (insertion order).
//! - Writes touch at most one row.

use crate::db::DbError;
use crate::model::student::{Student, StudentFields};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const STUDENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    subject,
    marks
FROM students";

pub type StoreResult<T> = Result<T, StoreError>;

/// Server-side store failure. Surfaced to API callers as an opaque message.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// A persisted row could not be decoded into a record.
    InvalidData(String),
    /// The shared connection is unusable (e.g. a worker panicked holding it).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted student data: {message}"),
            Self::Unavailable(message) => write!(f, "student store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for student records.
pub trait StudentRepository {
    /// Persists a new record exactly as given.
    fn insert_student(&self, student: &Student) -> StoreResult<()>;
    /// Every record in insertion order.
    fn list_students(&self) -> StoreResult<Vec<Student>>;
    fn get_student(&self, id: &str) -> StoreResult<Option<Student>>;
    /// Replaces all four fields; returns `false` when no row matched `id`.
    fn update_student(&self, id: &str, fields: &StudentFields) -> StoreResult<bool>;
    /// Removes the row; returns `false` when no row matched `id`.
    fn delete_student(&self, id: &str) -> StoreResult<bool>;
}

/// SQLite-backed student repository borrowing a migrated connection.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn insert_student(&self, student: &Student) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO students (id, name, email, subject, marks)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                student.id.as_str(),
                student.name.as_str(),
                student.email.as_str(),
                student.subject.as_str(),
                student.marks,
            ],
        )?;
        Ok(())
    }

    fn list_students(&self) -> StoreResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut students = Vec::new();

        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }

        Ok(students)
    }

    fn get_student(&self, id: &str) -> StoreResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_student_row(row)?)),
            None => Ok(None),
        }
    }

    fn update_student(&self, id: &str, fields: &StudentFields) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE students
             SET
                name = ?1,
                email = ?2,
                subject = ?3,
                marks = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                fields.name.as_str(),
                fields.email.as_str(),
                fields.subject.as_str(),
                fields.marks,
                id,
            ],
        )?;
        Ok(changed > 0)
    }

    fn delete_student(&self, id: &str) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_student_row(row: &Row<'_>) -> StoreResult<Student> {
    let id: String = row.get("id")?;
    if id.is_empty() {
        return Err(StoreError::InvalidData(
            "empty identifier in students.id".to_string(),
        ));
    }

    Ok(Student {
        id,
        name: row.get("name")?,
        email: row.get("email")?,
        subject: row.get("subject")?,
        marks: row.get("marks")?,
    })
}

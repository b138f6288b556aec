//! Student CRUD service.
//!
//! # Responsibility
//! - Expose the four CRUD operations the API routes call.
//! - Assign identifiers on create.
//!
//! # Invariants
//! - No field validation happens here; payloads are stored as given.
//! - Update/delete of an unknown id succeed without touching the store.
//! - Every operation is independent; nothing is cached between calls.

use crate::model::student::{Student, StudentFields};
use crate::repo::student_repo::{StoreResult, StudentRepository};
use log::{debug, info};

/// Use-case wrapper around a [`StudentRepository`].
pub struct StudentService<R: StudentRepository> {
    repo: R,
}

impl<R: StudentRepository> StudentService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns every record in natural store order.
    pub fn list(&self) -> StoreResult<Vec<Student>> {
        let students = self.repo.list_students()?;
        debug!(
            "event=student_list module=service status=ok count={}",
            students.len()
        );
        Ok(students)
    }

    /// Persists a new record and returns it with its assigned id.
    pub fn create(&self, fields: StudentFields) -> StoreResult<Student> {
        let student = Student::new(fields);
        self.repo.insert_student(&student)?;
        info!(
            "event=student_create module=service status=ok id={}",
            student.id
        );
        Ok(student)
    }

    /// Replaces all four fields of the record matching `id`.
    ///
    /// An unmatched id is a silent no-op.
    pub fn update(&self, id: &str, fields: &StudentFields) -> StoreResult<()> {
        let matched = self.repo.update_student(id, fields)?;
        info!(
            "event=student_update module=service status=ok id={id} matched={matched}"
        );
        Ok(())
    }

    /// Removes the record matching `id`. An unmatched id is a silent no-op.
    pub fn delete(&self, id: &str) -> StoreResult<()> {
        let matched = self.repo.delete_student(id)?;
        info!(
            "event=student_delete module=service status=ok id={id} matched={matched}"
        );
        Ok(())
    }

    pub fn get(&self, id: &str) -> StoreResult<Option<Student>> {
        self.repo.get_student(id)
    }
}

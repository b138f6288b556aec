//! Students page controller.
//!
//! # Responsibility
//! - Hold the fetched records, the view state and the add-student form.
//! - Re-fetch the full list after every successful mutation.
//!
//! # Invariants
//! - A failed API call is logged and leaves records and view state as they
//!   were.
//! - The form closes only after the record was created.
//! - After a refresh the current page is clamped to the new page count.

use crate::client::{ClientError, StudentsApi};
use log::{info, warn};
use roster_core::{
    FormErrors, ListingPage, MarksSummary, Student, StudentFields, StudentForm, ViewAction,
    ViewState,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum SubmitError {
    /// The form blocked submission; nothing was sent.
    Invalid(FormErrors),
    Api(ClientError),
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(errors) => write!(f, "form has errors: {errors}"),
            Self::Api(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(errors) => Some(errors),
            Self::Api(err) => Some(err),
        }
    }
}

pub struct StudentsPage<A: StudentsApi> {
    api: A,
    records: Vec<Student>,
    view: ViewState,
    form: StudentForm,
}

impl<A: StudentsApi> StudentsPage<A> {
    /// Empty page; call [`Self::refresh`] to load records.
    pub fn new(api: A) -> Self {
        Self {
            api,
            records: Vec::new(),
            view: ViewState::default(),
            form: StudentForm::default(),
        }
    }

    /// Builds the page and runs the initial fetch.
    pub fn load(api: A) -> Self {
        let mut page = Self::new(api);
        page.refresh();
        page
    }

    /// Re-fetches all records. Returns `false` (keeping the old records) on
    /// failure.
    pub fn refresh(&mut self) -> bool {
        match self.api.list_students() {
            Ok(records) => {
                info!(
                    "event=page_refresh module=page status=ok count={}",
                    records.len()
                );
                self.records = records;
                // The current page may no longer exist after a delete.
                self.view = self
                    .view
                    .apply(ViewAction::GoToPage(self.view.page), &self.records);
                true
            }
            Err(err) => {
                warn!("event=page_refresh module=page status=error error={err}");
                false
            }
        }
    }

    pub fn records(&self) -> &[Student] {
        &self.records
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn dispatch(&mut self, action: ViewAction) {
        self.view = self.view.apply(action, &self.records);
    }

    pub fn listing(&self) -> ListingPage {
        self.view.listing(&self.records)
    }

    pub fn chart(&self) -> MarksSummary {
        self.view.chart(&self.records)
    }

    pub fn form(&self) -> &StudentForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut StudentForm {
        &mut self.form
    }

    /// Validates the form and creates the record.
    ///
    /// A valid form is cleared before the request goes out, so an API
    /// failure leaves it empty but open.
    pub fn submit_form(&mut self) -> Result<Student, SubmitError> {
        let fields = self.form.submit().map_err(SubmitError::Invalid)?;
        match self.api.create_student(&fields) {
            Ok(student) => {
                self.refresh();
                self.dispatch(ViewAction::CloseForm);
                Ok(student)
            }
            Err(err) => {
                warn!("event=page_create module=page status=error error={err}");
                Err(SubmitError::Api(err))
            }
        }
    }

    pub fn update_student(&mut self, id: &str, fields: &StudentFields) -> Result<(), ClientError> {
        match self.api.update_student(id, fields) {
            Ok(_) => {
                self.refresh();
                Ok(())
            }
            Err(err) => {
                warn!("event=page_update module=page status=error id={id} error={err}");
                Err(err)
            }
        }
    }

    pub fn delete_student(&mut self, id: &str) -> Result<(), ClientError> {
        match self.api.delete_student(id) {
            Ok(_) => {
                self.refresh();
                Ok(())
            }
            Err(err) => {
                warn!("event=page_delete module=page status=error id={id} error={err}");
                Err(err)
            }
        }
    }
}

//! Immutable page state for the student listing screen.
//!
//! Each user action produces a fresh [`ViewState`]; nothing is mutated in
//! place, so the order in which fields change can never leak into output.

use crate::model::student::Student;
use crate::view::aggregate::{aggregate_by_marks, MarksSummary};
use crate::view::listing::{
    run_listing, sorted_and_filtered, ListingPage, ListingQuery, SortConfig, SortKey,
};
use crate::view::pagination::{Pagination, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// Which projection of the filtered set is on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Table,
    Chart,
}

/// User interactions the listing screen reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Column header click.
    SortBy(SortKey),
    /// Search box edit (full new text, not a delta).
    Search(String),
    GoToPage(usize),
    NextPage,
    PreviousPage,
    SetMode(ViewMode),
    OpenForm,
    CloseForm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub sort: SortConfig,
    pub search: String,
    /// 1-based current page.
    pub page: usize,
    pub page_size: usize,
    pub mode: ViewMode,
    pub form_open: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            sort: SortConfig::default(),
            search: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            mode: ViewMode::Table,
            form_open: false,
        }
    }
}

impl ViewState {
    /// Returns the state after `action`.
    ///
    /// `records` is the current full record set; page moves are clamped
    /// against the pages it produces under this state's sort and search.
    pub fn apply(&self, action: ViewAction, records: &[Student]) -> Self {
        let mut next = self.clone();
        match action {
            ViewAction::SortBy(key) => {
                next.sort = self.sort.toggled(key);
                next.page = 1;
            }
            ViewAction::Search(text) => {
                next.search = text;
                next.page = 1;
            }
            ViewAction::GoToPage(page) => {
                next.page = self.clamp_page(page, records);
            }
            ViewAction::NextPage => {
                next.page = self.clamp_page(self.page.saturating_add(1), records);
            }
            ViewAction::PreviousPage => {
                next.page = self.clamp_page(self.page.saturating_sub(1), records);
            }
            ViewAction::SetMode(mode) => next.mode = mode,
            ViewAction::OpenForm => next.form_open = true,
            ViewAction::CloseForm => next.form_open = false,
        }
        next
    }

    pub fn query(&self) -> ListingQuery {
        ListingQuery {
            sort: self.sort,
            search: self.search.clone(),
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// Sorted and filtered records, before paging.
    pub fn filtered(&self, records: &[Student]) -> Vec<Student> {
        sorted_and_filtered(records, self.sort, &self.search)
    }

    /// The table page for this state.
    pub fn listing(&self, records: &[Student]) -> ListingPage {
        run_listing(records, &self.query())
    }

    /// Chart data over the same filtered set the table pages through.
    pub fn chart(&self, records: &[Student]) -> MarksSummary {
        aggregate_by_marks(&self.filtered(records))
    }

    fn clamp_page(&self, page: usize, records: &[Student]) -> usize {
        let total = self.filtered(records).len();
        let total_pages = Pagination::new(self.page_size).total_pages(total);
        page.clamp(1, total_pages.max(1))
    }
}

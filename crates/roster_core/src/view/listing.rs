//! Sort and filter stages of the listing pipeline.

use crate::model::student::Student;
use crate::view::pagination::{PageInfo, Pagination, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Column a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    Email,
    Subject,
    Marks,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Marks => "marks",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "email" => Some(Self::Email),
            "subject" => Some(Self::Subject),
            "marks" => Some(Self::Marks),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }

    /// Arrow shown next to the active column header.
    pub fn arrow(self) -> char {
        match self {
            Self::Ascending => '↑',
            Self::Descending => '↓',
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortConfig {
    /// Highest marks first.
    fn default() -> Self {
        Self {
            key: SortKey::Marks,
            direction: SortDirection::Descending,
        }
    }
}

impl SortConfig {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Header click: same key flips direction, a new key starts ascending.
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self::new(key, self.direction.reversed())
        } else {
            Self::new(key, SortDirection::Ascending)
        }
    }
}

/// Returns a sorted copy of `records`.
///
/// Equal keys fall back to the record id so the order is total; descending
/// is therefore always the exact reverse of ascending.
pub fn sort_students(records: &[Student], sort: SortConfig) -> Vec<Student> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare_by_key(a, b, sort.key).then_with(|| a.id.cmp(&b.id));
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}

/// Keeps records whose name, email or subject contains `search`,
/// ignoring case. Empty search keeps everything.
pub fn filter_students(records: Vec<Student>, search: &str) -> Vec<Student> {
    if search.is_empty() {
        return records;
    }
    let needle = search.to_lowercase();
    records
        .into_iter()
        .filter(|student| matches_search(student, &needle))
        .collect()
}

/// `needle` must already be lowercased.
pub fn matches_search(student: &Student, needle: &str) -> bool {
    [&student.name, &student.email, &student.subject]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Sort then filter: the set the table pages over and the chart aggregates.
pub fn sorted_and_filtered(records: &[Student], sort: SortConfig, search: &str) -> Vec<Student> {
    filter_students(sort_students(records, sort), search)
}

/// Text ordering that reads like a dictionary: letters compare without case
/// first, lowercase sorts before uppercase on a tie, raw text breaks the rest.
pub fn collate(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

fn compare_by_key(a: &Student, b: &Student, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => collate(&a.name, &b.name),
        SortKey::Email => collate(&a.email, &b.email),
        SortKey::Subject => collate(&a.subject, &b.subject),
        SortKey::Marks => a.marks.cmp(&b.marks),
    }
}

/// Inputs of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub sort: SortConfig,
    pub search: String,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            sort: SortConfig::default(),
            search: String::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One rendered table page plus the metadata its controls need.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub items: Vec<Student>,
    pub info: PageInfo,
}

impl ListingPage {
    /// Placeholder row text when the page is empty.
    pub fn empty_message(&self, search: &str) -> Option<&'static str> {
        if !self.items.is_empty() {
            return None;
        }
        if search.is_empty() {
            Some("No students available")
        } else {
            Some("No matching students found")
        }
    }
}

/// Runs sort → filter → paginate.
pub fn run_listing(records: &[Student], query: &ListingQuery) -> ListingPage {
    let filtered = sorted_and_filtered(records, query.sort, &query.search);
    let pagination = Pagination::new(query.page_size);
    ListingPage {
        items: pagination.slice(&filtered, query.page).to_vec(),
        info: pagination.page_info(filtered.len(), query.page),
    }
}

#[cfg(test)]
mod tests {
    use super::{collate, SortConfig, SortDirection, SortKey};
    use std::cmp::Ordering;

    #[test]
    fn collate_ignores_case_before_raw_order() {
        assert_eq!(collate("alice", "Bob"), Ordering::Less);
        assert_eq!(collate("Bob", "alice"), Ordering::Greater);
        assert_eq!(collate("ann", "Ann"), Ordering::Less);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn toggled_flips_same_key_and_resets_new_key() {
        let default = SortConfig::default();
        assert_eq!(default.key, SortKey::Marks);
        assert_eq!(default.direction, SortDirection::Descending);

        let flipped = default.toggled(SortKey::Marks);
        assert_eq!(flipped.direction, SortDirection::Ascending);

        let by_name = flipped.toggled(SortKey::Name);
        assert_eq!(by_name, SortConfig::new(SortKey::Name, SortDirection::Ascending));
        assert_eq!(
            by_name.toggled(SortKey::Name).direction,
            SortDirection::Descending
        );
    }

    #[test]
    fn parse_accepts_short_and_long_forms() {
        assert_eq!(SortKey::parse(" Email "), Some(SortKey::Email));
        assert_eq!(SortKey::parse("grade"), None);
        assert_eq!(SortDirection::parse("DESC"), Some(SortDirection::Descending));
        assert_eq!(
            SortDirection::parse("ascending"),
            Some(SortDirection::Ascending)
        );
    }
}

//! Page slicing and page-control metadata.
//!
//! Pages are 1-based. A page outside `[1, total_pages]` is not an error: it
//! slices to nothing, and navigation helpers clamp back into range.

use serde::{Deserialize, Serialize};

/// Rows per table page.
pub const DEFAULT_PAGE_SIZE: usize = 5;
/// Maximum number of numbered page buttons shown at once.
pub const PAGE_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl Pagination {
    /// A zero page size is bumped to 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, total_items: usize) -> usize {
        total_items.div_ceil(self.page_size)
    }

    pub fn slice<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        let Some((start, end)) = self.bounds(items.len(), page) else {
            return &[];
        };
        &items[start..end]
    }

    pub fn page_info(&self, total_items: usize, page: usize) -> PageInfo {
        let (first_item, last_item) = match self.bounds(total_items, page) {
            Some((start, end)) => (start + 1, end),
            None => (0, 0),
        };
        PageInfo {
            page,
            page_size: self.page_size,
            total_items,
            total_pages: self.total_pages(total_items),
            first_item,
            last_item,
        }
    }

    fn bounds(&self, total_items: usize, page: usize) -> Option<(usize, usize)> {
        if page == 0 {
            return None;
        }
        let start = (page - 1).checked_mul(self.page_size)?;
        if start >= total_items {
            return None;
        }
        Some((start, (start + self.page_size).min(total_items)))
    }
}

/// Everything the pagination footer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    /// Size of the filtered set, not of the whole store.
    pub total_items: usize,
    pub total_pages: usize,
    /// 1-based index of the first row shown; 0 when the page is empty.
    pub first_item: usize,
    pub last_item: usize,
}

impl PageInfo {
    /// Clamps a requested page into `[1, total_pages]` (1 when there are none).
    pub fn clamp(&self, page: usize) -> usize {
        page.clamp(1, self.total_pages.max(1))
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn previous_page(&self) -> usize {
        self.clamp(self.page.saturating_sub(1))
    }

    pub fn next_page(&self) -> usize {
        self.clamp(self.page.saturating_add(1))
    }

    /// Numbered buttons to show; see [`page_window`].
    pub fn window(&self) -> Vec<usize> {
        page_window(self.page, self.total_pages)
    }

    /// Footer text, e.g. `Showing 6-10 of 12`.
    pub fn range_label(&self) -> String {
        format!(
            "Showing {}-{} of {}",
            self.first_item, self.last_item, self.total_items
        )
    }
}

/// Up to [`PAGE_WINDOW`] consecutive page numbers, centred on `current` when
/// there are more pages than buttons and pinned to either end near the edges.
pub fn page_window(current: usize, total_pages: usize) -> Vec<usize> {
    if total_pages <= PAGE_WINDOW {
        return (1..=total_pages).collect();
    }
    let half = PAGE_WINDOW / 2;
    let start = if current <= half + 1 {
        1
    } else if current + half >= total_pages {
        total_pages + 1 - PAGE_WINDOW
    } else {
        current - half
    };
    (start..start + PAGE_WINDOW).collect()
}

#[cfg(test)]
mod tests {
    use super::{page_window, Pagination};

    #[test]
    fn window_shows_every_page_when_few() {
        assert_eq!(page_window(1, 0), Vec::<usize>::new());
        assert_eq!(page_window(2, 3), vec![1, 2, 3]);
        assert_eq!(page_window(5, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn window_pins_to_edges_and_centres_in_between() {
        assert_eq!(page_window(1, 9), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(3, 9), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(4, 9), vec![2, 3, 4, 5, 6]);
        assert_eq!(page_window(6, 9), vec![4, 5, 6, 7, 8]);
        assert_eq!(page_window(7, 9), vec![5, 6, 7, 8, 9]);
        assert_eq!(page_window(9, 9), vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn zero_page_size_is_treated_as_one() {
        let pagination = Pagination::new(0);
        assert_eq!(pagination.page_size(), 1);
        assert_eq!(pagination.total_pages(3), 3);
    }

    #[test]
    fn out_of_range_pages_slice_to_nothing() {
        let pagination = Pagination::new(5);
        let items = [1, 2, 3, 4, 5, 6, 7];
        assert!(pagination.slice(&items, 0).is_empty());
        assert!(pagination.slice(&items, 3).is_empty());
        assert_eq!(pagination.slice(&items, 2), &[6, 7]);

        let info = pagination.page_info(items.len(), 3);
        assert_eq!((info.first_item, info.last_item), (0, 0));
        assert_eq!(info.previous_page(), 2);
        assert_eq!(info.next_page(), 2);
    }

    #[test]
    fn range_label_matches_footer_copy() {
        let info = Pagination::new(5).page_info(12, 2);
        assert_eq!(info.range_label(), "Showing 6-10 of 12");
        assert!(info.has_previous());
        assert!(info.has_next());
    }
}

//! Pagination and sort direction shared by the tabular listings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

/// Resolved paging window. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    /// Clamp raw query values: page at least 1, size within `1..=max`.
    #[must_use]
    pub fn resolve(page: Option<usize>, per_page: Option<usize>, default_size: usize, max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(default_size).clamp(1, max_size),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

/// Slice an already filtered and sorted list into one page.
///
/// A page past the end yields no items but keeps the totals.
#[must_use]
pub fn paginate<T>(rows: Vec<T>, req: PageRequest) -> Page<T> {
    let total = rows.len();
    let total_pages = total.div_ceil(req.per_page);
    let items = rows
        .into_iter()
        .skip((req.page - 1).saturating_mul(req.per_page))
        .take(req.per_page)
        .collect();
    Page { items, total, page: req.page, per_page: req.per_page, total_pages }
}

/// Case-insensitive substring match; an empty needle matches everything.
#[must_use]
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_applies_defaults_and_clamps() {
        assert_eq!(PageRequest::resolve(None, None, 20, 100), PageRequest { page: 1, per_page: 20 });
        assert_eq!(PageRequest::resolve(Some(0), Some(0), 20, 100), PageRequest { page: 1, per_page: 1 });
        assert_eq!(PageRequest::resolve(Some(3), Some(500), 20, 100), PageRequest { page: 3, per_page: 100 });
    }

    #[test]
    fn paginate_returns_requested_window() {
        let page = paginate((1..=45).collect::<Vec<_>>(), PageRequest { page: 3, per_page: 20 });
        assert_eq!(page.items, (41..=45).collect::<Vec<_>>());
        assert_eq!(page.total, 45);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn paginate_past_end_is_empty() {
        let page = paginate(vec![1, 2, 3], PageRequest { page: 9, per_page: 2 });
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn paginate_empty_has_zero_pages() {
        let page = paginate(Vec::<u8>::new(), PageRequest { page: 1, per_page: 10 });
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn contains_ci_ignores_case_and_blank_needle() {
        assert!(contains_ci("Hydraulic Press", "press"));
        assert!(contains_ci("anything", "  "));
        assert!(!contains_ci("Conveyor", "press"));
    }
}

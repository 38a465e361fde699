//! Pagination utilities for the data table

/// Rows per table page
pub const PAGE_SIZE: usize = 250;

/// Pagination metadata calculated from total results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: usize,
    /// Total number of pages
    pub total_pages: usize,
    /// Index of the first row on the page
    pub offset: usize,
}

/// Calculate pagination metadata from total results and requested page
///
/// Ensures page is within valid bounds [1, total_pages]
///
/// # Examples
/// ```
/// use flixmap_dash::pagination::calculate_pagination;
///
/// // 600 total results = 3 pages (250 + 250 + 100)
/// let p = calculate_pagination(600, 2);
/// assert_eq!(p.page, 2);
/// assert_eq!(p.total_pages, 3);
/// assert_eq!(p.offset, 250);
///
/// // Requesting out-of-bounds page gets clamped
/// let p = calculate_pagination(600, 99);
/// assert_eq!(p.page, 3);
/// assert_eq!(p.offset, 500);
/// ```
pub fn calculate_pagination(total_results: usize, requested_page: usize) -> Pagination {
    let total_pages = total_results.div_ceil(PAGE_SIZE);
    let page = requested_page.max(1).min(total_pages.max(1));
    let offset = (page - 1) * PAGE_SIZE;

    Pagination {
        page,
        total_pages,
        offset,
    }
}

/// Slice one page out of `items`
pub fn paginate<T>(items: &[T], requested_page: usize) -> (Pagination, &[T]) {
    let p = calculate_pagination(items.len(), requested_page);
    let end = (p.offset + PAGE_SIZE).min(items.len());
    let start = p.offset.min(end);
    (p, &items[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_normal() {
        let p = calculate_pagination(600, 2);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.offset, 250);
    }

    #[test]
    fn test_pagination_out_of_bounds_high() {
        let p = calculate_pagination(300, 99);
        assert_eq!(p.page, 2); // Clamped to last page
        assert_eq!(p.total_pages, 2);
        assert_eq!(p.offset, 250);
    }

    #[test]
    fn test_pagination_out_of_bounds_low() {
        let p = calculate_pagination(300, 0);
        assert_eq!(p.page, 1); // Clamped to first page
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_pagination_empty() {
        let p = calculate_pagination(0, 1);
        assert_eq!(p.page, 1);
        assert_eq!(p.total_pages, 0);
        assert_eq!(p.offset, 0);
    }

    #[test]
    fn test_paginate_slices_last_page() {
        let items: Vec<usize> = (0..260).collect();
        let (p, page) = paginate(&items, 2);
        assert_eq!(p.page, 2);
        assert_eq!(page, &items[250..260]);

        let empty: Vec<usize> = Vec::new();
        let (_, page) = paginate(&empty, 3);
        assert!(page.is_empty());
    }
}

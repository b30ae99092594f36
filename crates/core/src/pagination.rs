//! Pure pagination math for query results.

/// Derived pagination facts for a result page.
///
/// `total_pages` is `ceil(total / limit)`; `has_next_page` holds
/// exactly when `current_page < total_pages`, `has_previous_page`
/// exactly when `current_page > 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageInfo {
    /// Compute pagination facts from a total count, the current page,
    /// and the page limit.
    ///
    /// `total == 0` yields zero pages and no next page regardless of
    /// the requested page number. `limit` is expected to be >= 1 (the
    /// normalizer guarantees this); it is floored defensively so the
    /// division can never panic.
    pub fn compute(total: i64, page: i64, limit: i64) -> Self {
        let limit = limit.max(1);
        let total_pages = (total + limit - 1) / limit;

        Self {
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_multiple_of_limit() {
        let info = PageInfo::compute(40, 1, 20);
        assert_eq!(info.total_pages, 2);
        assert!(info.has_next_page);
        assert!(!info.has_previous_page);
    }

    #[test]
    fn partial_last_page_rounds_up() {
        let info = PageInfo::compute(41, 3, 20);
        assert_eq!(info.total_pages, 3);
        assert!(!info.has_next_page);
        assert!(info.has_previous_page);
    }

    #[test]
    fn zero_total_yields_zero_pages() {
        let info = PageInfo::compute(0, 1, 20);
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_next_page);
        assert!(!info.has_previous_page);
    }

    #[test]
    fn zero_total_has_no_next_page_for_any_page() {
        let info = PageInfo::compute(0, 99, 20);
        assert!(!info.has_next_page);
        assert!(info.has_previous_page);
    }

    #[test]
    fn middle_page_has_both_neighbours() {
        let info = PageInfo::compute(100, 3, 20);
        assert_eq!(info.total_pages, 5);
        assert!(info.has_next_page);
        assert!(info.has_previous_page);
    }

    #[test]
    fn single_result_single_page() {
        let info = PageInfo::compute(1, 1, 20);
        assert_eq!(info.total_pages, 1);
        assert!(!info.has_next_page);
        assert!(!info.has_previous_page);
    }
}

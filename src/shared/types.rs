use serde::Serialize;

// =============================================================================
// PAGINATION
// =============================================================================

/// Parse a raw `page` query value. Missing or non-numeric input means page 1.
pub fn parse_page_number(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).unwrap_or(1)
}

/// Offset pagination over a counted result set.
///
/// An empty result still has one (empty) page, and requested page numbers are
/// clamped into `1..=num_pages` rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total: i64,
    page_size: i64,
}

impl Paginator {
    pub fn new(total: i64, page_size: i64) -> Self {
        Self {
            total: total.max(0),
            page_size: page_size.max(1),
        }
    }

    pub fn num_pages(&self) -> i64 {
        if self.total == 0 {
            1
        } else {
            (self.total + self.page_size - 1) / self.page_size
        }
    }

    /// Nearest valid page for the requested number
    pub fn clamp(&self, requested: i64) -> i64 {
        requested.clamp(1, self.num_pages())
    }

    /// SQL OFFSET for a (clamped) page number
    pub fn offset(&self, page: i64) -> i64 {
        (self.clamp(page) - 1) * self.page_size
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn total(&self) -> i64 {
        self.total
    }
}

/// One page of results plus the navigation data templates need
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub number: i64,
    pub num_pages: i64,
    pub total: i64,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_page_number: Option<i64>,
    pub next_page_number: Option<i64>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, number: i64, paginator: Paginator) -> Self {
        let num_pages = paginator.num_pages();
        let has_previous = number > 1;
        let has_next = number < num_pages;

        Self {
            items,
            number,
            num_pages,
            total: paginator.total(),
            has_previous,
            has_next,
            previous_page_number: has_previous.then(|| number - 1),
            next_page_number: has_next.then(|| number + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_number() {
        assert_eq!(parse_page_number(None), 1);
        assert_eq!(parse_page_number(Some("3")), 3);
        assert_eq!(parse_page_number(Some(" 2 ")), 2);
        assert_eq!(parse_page_number(Some("abc")), 1);
        assert_eq!(parse_page_number(Some("")), 1);
        assert_eq!(parse_page_number(Some("-4")), -4);
    }

    #[test]
    fn test_out_of_range_page_returns_last_page() {
        let paginator = Paginator::new(3, 10);
        assert_eq!(paginator.num_pages(), 1);
        assert_eq!(paginator.clamp(999), 1);
        assert_eq!(paginator.offset(999), 0);

        let paginator = Paginator::new(45, 20);
        assert_eq!(paginator.num_pages(), 3);
        assert_eq!(paginator.clamp(999), 3);
        assert_eq!(paginator.offset(999), 40);
    }

    #[test]
    fn test_page_below_one_clamps_to_first() {
        let paginator = Paginator::new(45, 20);
        assert_eq!(paginator.clamp(0), 1);
        assert_eq!(paginator.clamp(-7), 1);
        assert_eq!(paginator.offset(-7), 0);
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let paginator = Paginator::new(0, 10);
        assert_eq!(paginator.num_pages(), 1);
        assert_eq!(paginator.clamp(5), 1);
    }

    #[test]
    fn test_exact_multiple_of_page_size() {
        let paginator = Paginator::new(20, 10);
        assert_eq!(paginator.num_pages(), 2);
        assert_eq!(paginator.offset(2), 10);
    }

    #[test]
    fn test_paginated_navigation() {
        let paginator = Paginator::new(45, 20);

        let first: Paginated<i32> = Paginated::new(vec![], 1, paginator);
        assert!(!first.has_previous);
        assert!(first.has_next);
        assert_eq!(first.next_page_number, Some(2));
        assert_eq!(first.previous_page_number, None);

        let last: Paginated<i32> = Paginated::new(vec![], 3, paginator);
        assert!(last.has_previous);
        assert!(!last.has_next);
        assert_eq!(last.previous_page_number, Some(2));
        assert_eq!(last.total, 45);
    }
}

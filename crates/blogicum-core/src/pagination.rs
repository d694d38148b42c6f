//! Page-number pagination over counted result sets.

use std::num::IntErrorKind;

use serde::Serialize;

/// Posts per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Splits `total` items into pages of `per_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    total: u64,
    per_page: u64,
}

impl Paginator {
    pub fn new(total: u64, per_page: u64) -> Self {
        Self {
            total,
            per_page: per_page.max(1),
        }
    }

    /// Number of pages; an empty result still has one (empty) page.
    pub fn num_pages(&self) -> u64 {
        self.total.div_ceil(self.per_page).max(1)
    }

    /// Resolve a raw `page` parameter.
    ///
    /// Missing or non-numeric input selects the first page; numbers outside
    /// `1..=num_pages` are clamped to the nearest valid page.
    pub fn page(&self, raw: Option<&str>) -> PageWindow {
        let last = self.num_pages();
        let number = match raw.map(str::trim).map(str::parse::<i64>) {
            Some(Ok(n)) if n > last as i64 => last,
            Some(Ok(n)) if n < 1 => 1,
            Some(Ok(n)) => n as u64,
            Some(Err(e)) if *e.kind() == IntErrorKind::PosOverflow => last,
            Some(Err(_)) | None => 1,
        };

        PageWindow {
            number,
            num_pages: last,
            per_page: self.per_page,
            total: self.total,
        }
    }
}

/// The position of one page within a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub number: u64,
    pub num_pages: u64,
    pub per_page: u64,
    pub total: u64,
}

impl PageWindow {
    pub fn offset(&self) -> u64 {
        (self.number - 1) * self.per_page
    }

    pub fn limit(&self) -> u64 {
        self.per_page
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn previous_number(&self) -> u64 {
        self.number.saturating_sub(1).max(1)
    }

    pub fn next_number(&self) -> u64 {
        (self.number + 1).min(self.num_pages)
    }
}

/// A bounded slice of a result set plus its position.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub window: PageWindow,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

//! Pagination arithmetic.
//!
//! Page indices are zero-based. A list always has at least one addressable
//! page, even when it is empty.

/// Number of pages needed for `total_count` rows (`ceil(total / size)`).
///
/// Zero when the page size is zero.
#[must_use]
pub fn page_count(total_count: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        total_count.div_ceil(page_size)
    }
}

/// Clamp a signed page request into `[0, max(page_count, 1) - 1]`.
#[must_use]
pub fn clamp_page_index(requested: i64, page_count: usize) -> usize {
    let last = page_count.max(1) - 1;
    usize::try_from(requested.max(0)).map_or(last, |index| index.min(last))
}

/// Page position of one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    /// Current page (0-indexed).
    pub page_index: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Rows in the whole filtered set.
    pub total_count: usize,
}

impl PaginationState {
    /// First page of an empty list.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size,
            total_count: 0,
        }
    }

    /// `ceil(total_count / page_size)`.
    #[must_use]
    pub fn page_count(&self) -> usize {
        page_count(self.total_count, self.page_size)
    }

    /// Largest valid page index.
    #[must_use]
    pub fn last_page_index(&self) -> usize {
        self.page_count().max(1) - 1
    }

    /// `requested` clamped to a valid page index.
    #[must_use]
    pub fn clamped(&self, requested: usize) -> usize {
        requested.min(self.last_page_index())
    }

    /// Record a new total and pull the page index back inside the range.
    ///
    /// Returns `true` when the page index moved.
    pub fn set_total_count(&mut self, total_count: usize) -> bool {
        self.total_count = total_count;
        let clamped = self.clamped(self.page_index);
        let moved = clamped != self.page_index;
        self.page_index = clamped;
        moved
    }

    /// Whether a previous page exists.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    /// Whether a next page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page_index < self.last_page_index()
    }
}

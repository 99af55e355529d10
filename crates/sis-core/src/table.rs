//! Table and pagination contract.
//!
//! A [`TableView`] is a pure projection of rows plus pagination state. It
//! never fetches; navigation is expressed as [`TableEvent`]s that the owner
//! feeds back into its list controller.

use sis_model::Entity;

use crate::pagination::{clamp_page_index, page_count};

/// Page sizes offered by the page-size picker.
pub const PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 20, 50];

/// Page size of a freshly mounted list.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// One rendered column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Row field shown in the column.
    pub field: &'static str,
    /// Header label.
    pub header: &'static str,
    /// Whether the backend accepts this field as `order_by`.
    pub sortable: bool,
}

impl ColumnDescriptor {
    /// Columns of `E` in display order.
    #[must_use]
    pub fn for_entity<E: Entity>() -> Vec<Self> {
        E::columns()
            .iter()
            .map(|column| Self {
                field: column.field,
                header: column.header,
                sortable: E::SORT_COLUMNS.contains(&column.field),
            })
            .collect()
    }
}

/// Intents emitted by the table and its pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableEvent {
    /// Navigate to a zero-based page.
    PageChanged(usize),
    /// Pick a new page size.
    PageSizeChanged(usize),
    /// The page count was (re)computed.
    PageCountChanged(usize),
}

/// Where the page count comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Only one page is held locally; the count comes from the server's total.
    Server {
        /// Size of the whole filtered set.
        total_count: usize,
    },
    /// All rows are held locally and counted.
    Client,
}

/// Everything needed to render one page of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    /// Column headers.
    pub columns: Vec<ColumnDescriptor>,
    /// Display cells, one `Vec` per row. Placeholder rows are all empty strings.
    pub rows: Vec<Vec<String>>,
    /// Current page (0-indexed).
    pub page_index: usize,
    /// Rows per page.
    pub page_size: usize,
    /// Pagination source.
    pub mode: PaginationMode,
    /// Whether `rows` are loading placeholders.
    pub loading: bool,
}

impl TableView {
    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        match self.mode {
            PaginationMode::Server { total_count } => page_count(total_count, self.page_size),
            PaginationMode::Client => page_count(self.rows.len(), self.page_size),
        }
    }

    /// "Page X of Y". An empty list reads "Page 1 of 1".
    #[must_use]
    pub fn page_label(&self) -> String {
        page_label(self.page_index, self.page_count())
    }

    /// Rows to render for the current page.
    #[must_use]
    pub fn visible_rows(&self) -> &[Vec<String>] {
        match self.mode {
            PaginationMode::Server { .. } => &self.rows,
            PaginationMode::Client => {
                let start = self.page_index.saturating_mul(self.page_size).min(self.rows.len());
                let end = start.saturating_add(self.page_size).min(self.rows.len());
                &self.rows[start..end]
            }
        }
    }

    /// The page-count notification for the current state.
    #[must_use]
    pub fn page_count_event(&self) -> TableEvent {
        TableEvent::PageCountChanged(self.page_count())
    }

    /// Whether the Previous control is enabled.
    #[must_use]
    pub fn can_go_previous(&self) -> bool {
        self.page_index > 0
    }

    /// Whether the Next control is enabled.
    #[must_use]
    pub fn can_go_next(&self) -> bool {
        self.page_index + 1 < self.page_count()
    }

    /// Previous-page intent, if enabled.
    #[must_use]
    pub fn previous(&self) -> Option<TableEvent> {
        self.can_go_previous()
            .then(|| TableEvent::PageChanged(self.page_index - 1))
    }

    /// Next-page intent, if enabled.
    #[must_use]
    pub fn next(&self) -> Option<TableEvent> {
        self.can_go_next()
            .then(|| TableEvent::PageChanged(self.page_index + 1))
    }

    /// Navigate to a one-based page number, clamped.
    #[must_use]
    pub fn go_to(&self, page_number: i64) -> TableEvent {
        TableEvent::PageChanged(clamp_page_index(
            page_number.saturating_sub(1),
            self.page_count(),
        ))
    }

    /// Page-size intent. Sizes outside [`PAGE_SIZE_OPTIONS`] are rejected.
    #[must_use]
    pub fn resize(&self, page_size: usize) -> Option<TableEvent> {
        PAGE_SIZE_OPTIONS
            .contains(&page_size)
            .then_some(TableEvent::PageSizeChanged(page_size))
    }
}

/// "Page X of Y" for a zero-based index.
#[must_use]
pub fn page_label(page_index: usize, page_count: usize) -> String {
    format!("Page {} of {}", page_index + 1, page_count.max(1))
}

/// Label of a page-size option.
#[must_use]
pub fn page_size_label(page_size: usize) -> String {
    format!("Show {page_size}")
}

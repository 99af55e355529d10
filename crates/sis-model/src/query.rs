//! Paged search queries.
//!
//! A [`PageQuery`] identifies one page of one filtered, sorted result set.
//! Its [`QueryFilter`] (everything except the page index) identifies the
//! result set itself and is what page caches key their generations on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Sort direction sent as `direction=ASC|DESC`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Label used by sort-direction pickers.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Asc => "Ascending",
            Self::Desc => "Descending",
        }
    }

    /// The opposite direction.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" | "ASCENDING" => Ok(Self::Asc),
            "DESC" | "DESCENDING" => Ok(Self::Desc),
            _ => Err(ModelError::InvalidDirection(s.to_string())),
        }
    }
}

/// The filter dimensions of a query: search text, sort, and page size.
///
/// Two queries with equal filters address pages of the same result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryFilter {
    /// Free-text search (already trimmed; empty means no filter).
    pub search_query: String,
    /// Column passed as `order_by`.
    pub sort_column: String,
    /// Sort direction.
    pub sort_direction: SortDirection,
    /// Rows per page.
    pub page_size: usize,
}

/// One page of a search/sort/filter request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageQuery {
    /// Free-text search. Omitted from the request when blank.
    pub search_query: String,
    /// Column passed as `order_by`.
    pub sort_column: String,
    /// Sort direction.
    pub sort_direction: SortDirection,
    /// Zero-based page index.
    pub page_index: usize,
    /// Rows per page. Must be greater than zero when sent.
    pub page_size: usize,
}

impl PageQuery {
    /// First page of the unfiltered set, ascending by `sort_column`.
    pub fn new(sort_column: impl Into<String>, page_size: usize) -> Self {
        Self {
            search_query: String::new(),
            sort_column: sort_column.into(),
            sort_direction: SortDirection::Asc,
            page_index: 0,
            page_size,
        }
    }

    /// Set the search text.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search_query = search.into();
        self
    }

    /// Set the sort direction.
    #[must_use]
    pub fn with_direction(mut self, direction: SortDirection) -> Self {
        self.sort_direction = direction;
        self
    }

    /// Set the page index.
    #[must_use]
    pub fn with_page(mut self, page_index: usize) -> Self {
        self.page_index = page_index;
        self
    }

    /// The same query addressing another page.
    #[must_use]
    pub fn at_page(&self, page_index: usize) -> Self {
        Self {
            page_index,
            ..self.clone()
        }
    }

    /// Row offset of this page (`page_index * page_size`).
    #[must_use]
    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }

    /// Search text with surrounding whitespace removed, or `None` when blank.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        let trimmed = self.search_query.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Filter key shared by every page of this result set.
    #[must_use]
    pub fn filter(&self) -> QueryFilter {
        QueryFilter {
            search_query: self.search_term().unwrap_or_default().to_string(),
            sort_column: self.sort_column.clone(),
            sort_direction: self.sort_direction,
            page_size: self.page_size,
        }
    }

    /// True when both queries address pages of the same result set.
    #[must_use]
    pub fn is_cache_equivalent(&self, other: &Self) -> bool {
        self.filter() == other.filter()
    }

    /// Query-string pairs in wire order. `q` is left out when the search is blank
    /// so the server sees "no filter" rather than "match the empty string".
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("order_by", self.sort_column.clone()),
            ("direction", self.sort_direction.as_str().to_string()),
            ("limit", self.page_size.to_string()),
            ("offset", self.offset().to_string()),
        ];
        if let Some(term) = self.search_term() {
            pairs.push(("q", term.to_string()));
        }
        pairs
    }
}

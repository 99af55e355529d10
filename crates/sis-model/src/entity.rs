//! The [`Entity`] trait shared by the managed record types.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ModelError;
use crate::validate::Validate;

/// A table column: the wire field it shows and its header label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Backend field name (also the `order_by` value when sortable).
    pub field: &'static str,
    /// Header label.
    pub header: &'static str,
}

impl ColumnSpec {
    /// Create a column.
    pub const fn new(field: &'static str, header: &'static str) -> Self {
        Self { field, header }
    }
}

/// A record type managed through `/api/{PATH}`.
///
/// The core does not interpret row fields beyond the identifying key; the
/// remaining methods only project a row into display cells.
pub trait Entity:
    DeserializeOwned + Serialize + Clone + fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// Body of `POST /api/{PATH}/add`.
    type Create: Serialize + Validate + Clone + fmt::Debug + Send + Sync;
    /// Body of `PUT /api/{PATH}/update` (key + `new_*` fields).
    type Update: Serialize + Validate + Clone + fmt::Debug + Send + Sync;
    /// Body of `DELETE /api/{PATH}/delete`.
    type Key: Serialize + Clone + fmt::Debug + fmt::Display + Send + Sync;

    /// Which entity this is.
    const KIND: EntityKind;
    /// URL path segment (`students`, `colleges`, `programs`).
    const PATH: &'static str;
    /// Singular display name.
    const DISPLAY_NAME: &'static str;
    /// Name of the identifying key field.
    const KEY_FIELD: &'static str;
    /// Columns the backend accepts in `order_by`.
    const SORT_COLUMNS: &'static [&'static str];
    /// Column used when the user has not picked one.
    const DEFAULT_SORT: &'static str;

    /// Columns rendered by list tables, in display order.
    fn columns() -> &'static [ColumnSpec];

    /// Identifying key value of a row.
    fn key(&self) -> &str;

    /// Delete payload for a key value.
    fn key_payload(key: &str) -> Self::Key;

    /// Display cells, one per [`Entity::columns`] entry.
    fn cells(&self) -> Vec<String>;

    /// Validate a requested sort column against [`Entity::SORT_COLUMNS`].
    fn sort_column(column: &str) -> Result<&'static str, ModelError> {
        Self::SORT_COLUMNS
            .iter()
            .copied()
            .find(|c| c.eq_ignore_ascii_case(column.trim()))
            .ok_or_else(|| ModelError::UnknownSortColumn {
                entity: Self::PATH,
                column: column.to_string(),
            })
    }
}

/// Runtime selector for the managed entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Students (`/api/students`).
    Students,
    /// Colleges (`/api/colleges`).
    Colleges,
    /// Programs (`/api/programs`).
    Programs,
}

impl EntityKind {
    /// All entities in navigation order.
    pub const ALL: [Self; 3] = [Self::Students, Self::Colleges, Self::Programs];

    /// URL path segment.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Colleges => "colleges",
            Self::Programs => "programs",
        }
    }

    /// Plural display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Students => "Students",
            Self::Colleges => "Colleges",
            Self::Programs => "Programs",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for EntityKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "students" | "student" => Ok(Self::Students),
            "colleges" | "college" => Ok(Self::Colleges),
            "programs" | "program" => Ok(Self::Programs),
            _ => Err(ModelError::UnknownEntity(s.to_string())),
        }
    }
}

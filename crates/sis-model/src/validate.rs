//! Client-side validation run before any write reaches the network.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// Student ID format: four digits, a dash, four digits (e.g. `2023-0001`).
static ID_NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{4}$").unwrap_or_else(|e| unreachable!("static pattern: {e}"))
});

/// Payloads that can be checked locally before being sent.
pub trait Validate {
    /// Return the first validation failure, if any.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Collects blank required fields so they can be reported together.
#[derive(Debug, Default)]
pub struct RequiredFields {
    missing: Vec<&'static str>,
}

impl RequiredFields {
    /// Start an empty check.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-blank text value.
    #[must_use]
    pub fn text(mut self, label: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.missing.push(label);
        }
        self
    }

    /// Require an optional value to be present.
    #[must_use]
    pub fn present<T>(mut self, label: &'static str, value: Option<&T>) -> Self {
        if value.is_none() {
            self.missing.push(label);
        }
        self
    }

    /// Fail with every blank field, in the order they were checked.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields {
                fields: self.missing,
            })
        }
    }
}

/// Check the `1234-5678` student ID format.
pub fn check_id_number(value: &str) -> Result<(), ValidationError> {
    if ID_NUMBER_PATTERN.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: "ID Number",
            expected: "1234-5678",
        })
    }
}

/// Check an inclusive numeric range.
pub fn check_range(
    field: &'static str,
    value: i64,
    min: i64,
    max: i64,
) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { field, min, max })
    }
}

//! Error types for model parsing and client-side validation.

use thiserror::Error;

/// Client-local validation failures.
///
/// These never reach the network: the caller surfaces them as a warning
/// alert and aborts the workflow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    /// One or more required fields are blank.
    #[error("Please fill in the required fields: {}", .fields.join(", "))]
    MissingFields {
        /// Labels of the blank fields, in form order.
        fields: Vec<&'static str>,
    },

    /// A field does not match its expected pattern.
    #[error("{field} must be in the format {expected}")]
    InvalidFormat {
        /// Label of the offending field.
        field: &'static str,
        /// Human-readable description of the expected format.
        expected: &'static str,
    },

    /// A numeric field is outside its allowed range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        /// Label of the offending field.
        field: &'static str,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },

    /// An attachment's MIME type is not in the allow-list.
    #[error("File type '{content_type}' is not allowed. Allowed types: {}", .allowed.join(", "))]
    DisallowedFileType {
        /// MIME type of the rejected file.
        content_type: String,
        /// Accepted MIME types.
        allowed: Vec<String>,
    },

    /// An attachment exceeds the configured maximum size.
    #[error("File is too large ({size} bytes). The maximum allowed size is {}", format_limit(.max))]
    FileTooLarge {
        /// Size of the rejected file in bytes.
        size: u64,
        /// Configured maximum in bytes.
        max: u64,
    },
}

impl ValidationError {
    /// Text shown in the warning alert.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Errors raised while interpreting model values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    /// Sort direction string was neither ASC nor DESC.
    #[error("invalid sort direction: {0}")]
    InvalidDirection(String),

    /// Entity name does not match a managed record type.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// Sort column is not offered for this entity.
    #[error("cannot sort {entity} by '{column}'")]
    UnknownSortColumn {
        /// Entity path segment.
        entity: &'static str,
        /// Rejected column.
        column: String,
    },
}

fn format_limit(bytes: &u64) -> String {
    const MIB: u64 = 1024 * 1024;
    const KIB: u64 = 1024;
    let bytes = *bytes;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{} MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{} KB", bytes / KIB)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_message_lists_fields() {
        let err = ValidationError::MissingFields {
            fields: vec!["First Name", "Last Name"],
        };
        assert_eq!(
            err.user_message(),
            "Please fill in the required fields: First Name, Last Name"
        );
    }

    #[test]
    fn test_file_too_large_names_limit() {
        let err = ValidationError::FileTooLarge {
            size: 6 * 1024 * 1024,
            max: 5 * 1024 * 1024,
        };
        assert!(err.user_message().contains("5 MB"));
    }

    #[test]
    fn test_format_limit_falls_back_to_bytes() {
        assert_eq!(format_limit(&1500), "1500 bytes");
        assert_eq!(format_limit(&2048), "2 KB");
    }
}

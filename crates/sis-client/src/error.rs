//! Error types for backend and storage calls.

use thiserror::Error;

/// Alert text for any request that did not produce a server message.
pub const CONNECTION_ERROR_MESSAGE: &str = "Error connecting to the server.";

/// Errors returned by [`crate::ApiClient`] and [`crate::HttpObjectStore`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The request did not complete (offline, refused, timed out).
    #[error("network error: {0}")]
    Network(String),

    /// Non-success status without a usable `{success, message}` body.
    #[error("server returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body, possibly empty.
        body: String,
    },

    /// The response body could not be parsed or broke the page contract.
    #[error("malformed response: {0}")]
    Decode(String),

    /// The server answered `{ "success": false, "message": ... }`.
    #[error("rejected by server: {message}")]
    Rejected {
        /// Server message, shown verbatim.
        message: String,
    },

    /// The query cannot be sent (e.g. zero page size).
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Client configuration could not be loaded or is incomplete.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Text for the danger alert raised by a failed request.
    ///
    /// Business rejections carry the server's message verbatim; everything
    /// else collapses to the generic connectivity message.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected { message } if !message.trim().is_empty() => message.as_str(),
            Self::Config(_) => "The client is not configured correctly.",
            Self::InvalidQuery(_) => "An unexpected error occurred.",
            Self::Network(_) | Self::Status { .. } | Self::Decode(_) | Self::Rejected { .. } => {
                CONNECTION_ERROR_MESSAGE
            }
        }
    }

    /// Whether re-triggering the same action could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Whether the server explicitly refused the request.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = ClientError::Network("connection refused".to_string());
        assert_eq!(err.user_message(), CONNECTION_ERROR_MESSAGE);

        let err = ClientError::Rejected {
            message: "Student ID already exists.".to_string(),
        };
        assert_eq!(err.user_message(), "Student ID already exists.");

        let err = ClientError::Rejected {
            message: String::new(),
        };
        assert_eq!(err.user_message(), CONNECTION_ERROR_MESSAGE);
    }

    #[test]
    fn test_retryable() {
        assert!(ClientError::Network("timeout".to_string()).is_retryable());
        assert!(
            ClientError::Status {
                status: 503,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !ClientError::Status {
                status: 404,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !ClientError::Rejected {
                message: "no".to_string()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_json_errors_are_decode_errors() {
        let err: ClientError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}

//! Error types for mutation workflows.

use sis_client::ClientError;
use sis_model::ValidationError;
use thiserror::Error;

use crate::alert::AlertKind;

/// Why a workflow attempt ended without completing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WorkflowError {
    /// Client-side check failed; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A request failed or was rejected.
    #[error(transparent)]
    Client(#[from] ClientError),
}

impl WorkflowError {
    /// Text for the alert.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.user_message(),
            Self::Client(err) => err.user_message().to_string(),
        }
    }

    /// Validation problems warn; request failures are dangers.
    #[must_use]
    pub fn alert_kind(&self) -> AlertKind {
        match self {
            Self::Validation(_) => AlertKind::Warning,
            Self::Client(_) => AlertKind::Danger,
        }
    }

    /// Whether re-triggering the same action could succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Validation(_) => false,
            Self::Client(err) => err.is_retryable(),
        }
    }
}

//! Response bodies returned by the REST backend.

use serde::{Deserialize, Serialize};

/// Body of `GET /api/{entity}/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEnvelope<T> {
    /// Rows of the requested page.
    pub rows: Vec<T>,
    /// Size of the whole filtered set, not just this page.
    #[serde(rename = "totalCount")]
    pub total_count: usize,
}

/// Body of `GET /api/{entity}` (unpaged, used to fill dropdowns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    /// Every row of the entity.
    pub rows: Vec<T>,
    /// Some endpoints report the count as well.
    #[serde(
        rename = "totalCount",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub total_count: Option<usize>,
}

/// Body of every write endpoint and of logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    /// Whether the backend applied the change.
    pub success: bool,
    /// Server message, shown verbatim to the user.
    #[serde(default)]
    pub message: String,
}

impl MutationResponse {
    /// Successful response with a message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Rejected response with a message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

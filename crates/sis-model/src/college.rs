//! College records and payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{ColumnSpec, Entity, EntityKind};
use crate::error::ValidationError;
use crate::validate::{RequiredFields, Validate};

const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("college_code", "College Code"),
    ColumnSpec::new("college_name", "College Name"),
];

/// A college row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct College {
    /// Identifying key (e.g. `CCS`).
    pub college_code: String,
    /// Full name.
    pub college_name: String,
}

impl Entity for College {
    type Create = NewCollege;
    type Update = CollegeUpdate;
    type Key = CollegeKey;

    const KIND: EntityKind = EntityKind::Colleges;
    const PATH: &'static str = "colleges";
    const DISPLAY_NAME: &'static str = "College";
    const KEY_FIELD: &'static str = "college_code";
    const SORT_COLUMNS: &'static [&'static str] = &["college_code", "college_name"];
    const DEFAULT_SORT: &'static str = "college_code";

    fn columns() -> &'static [ColumnSpec] {
        COLUMNS
    }

    fn key(&self) -> &str {
        &self.college_code
    }

    fn key_payload(key: &str) -> CollegeKey {
        CollegeKey {
            college_code: key.trim().to_string(),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![self.college_code.clone(), self.college_name.clone()]
    }
}

/// Body of `POST /api/colleges/add`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCollege {
    /// Identifying key.
    pub college_code: String,
    /// Full name.
    pub college_name: String,
}

impl Validate for NewCollege {
    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new()
            .text("College Code", &self.college_code)
            .text("College Name", &self.college_name)
            .finish()
    }
}

/// Body of `PUT /api/colleges/update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeUpdate {
    /// College being renamed.
    pub college_code: String,
    /// Replacement name.
    pub new_college_name: String,
}

impl Validate for CollegeUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new()
            .text("College Code", &self.college_code)
            .text("College Name", &self.new_college_name)
            .finish()
    }
}

/// Body of `DELETE /api/colleges/delete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollegeKey {
    /// College to delete.
    pub college_code: String,
}

impl fmt::Display for CollegeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.college_code)
    }
}

//! Program records and payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{ColumnSpec, Entity, EntityKind};
use crate::error::ValidationError;
use crate::validate::{RequiredFields, Validate};

const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("program_code", "Program Code"),
    ColumnSpec::new("program_name", "Program Name"),
    ColumnSpec::new("college_code", "College"),
];

/// A program row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Identifying key (e.g. `BSCS`).
    pub program_code: String,
    /// Full name.
    pub program_name: String,
    /// Owning college.
    pub college_code: String,
    /// Owning college's name, when joined in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college_name: Option<String>,
}

impl Entity for Program {
    type Create = NewProgram;
    type Update = ProgramUpdate;
    type Key = ProgramKey;

    const KIND: EntityKind = EntityKind::Programs;
    const PATH: &'static str = "programs";
    const DISPLAY_NAME: &'static str = "Program";
    const KEY_FIELD: &'static str = "program_code";
    const SORT_COLUMNS: &'static [&'static str] =
        &["program_code", "program_name", "college_code"];
    const DEFAULT_SORT: &'static str = "program_code";

    fn columns() -> &'static [ColumnSpec] {
        COLUMNS
    }

    fn key(&self) -> &str {
        &self.program_code
    }

    fn key_payload(key: &str) -> ProgramKey {
        ProgramKey {
            program_code: key.trim().to_string(),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.program_code.clone(),
            self.program_name.clone(),
            self.college_code.clone(),
        ]
    }
}

/// Body of `POST /api/programs/add`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProgram {
    /// Identifying key.
    pub program_code: String,
    /// Full name.
    pub program_name: String,
    /// Owning college.
    pub college_code: String,
}

impl Validate for NewProgram {
    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new()
            .text("Program Code", &self.program_code)
            .text("Program Name", &self.program_name)
            .text("College", &self.college_code)
            .finish()
    }
}

/// Body of `PUT /api/programs/update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramUpdate {
    /// Program being updated.
    pub program_code: String,
    /// Replacement name.
    pub new_program_name: String,
    /// Replacement owning college.
    pub new_college_code: String,
}

impl Validate for ProgramUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new()
            .text("Program Code", &self.program_code)
            .text("Program Name", &self.new_program_name)
            .text("College", &self.new_college_code)
            .finish()
    }
}

/// Body of `DELETE /api/programs/delete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramKey {
    /// Program to delete.
    pub program_code: String,
}

impl fmt::Display for ProgramKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program_code)
    }
}

//! Student records and payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::{ColumnSpec, Entity, EntityKind};
use crate::error::ValidationError;
use crate::validate::{RequiredFields, Validate, check_id_number, check_range};

const COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::new("id_number", "ID Number"),
    ColumnSpec::new("first_name", "First Name"),
    ColumnSpec::new("middle_name", "Middle Name"),
    ColumnSpec::new("last_name", "Last Name"),
    ColumnSpec::new("gender", "Gender"),
    ColumnSpec::new("year_level", "Year Level"),
    ColumnSpec::new("program_name", "Program"),
    ColumnSpec::new("college_name", "College"),
];

/// A student row as returned by `/api/students/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Identifying key, `1234-5678`.
    pub id_number: String,
    /// Given name.
    pub first_name: String,
    /// Middle name (may be blank).
    #[serde(default)]
    pub middle_name: String,
    /// Family name.
    pub last_name: String,
    /// Gender code.
    #[serde(default)]
    pub gender: String,
    /// Year level, 1 to 4.
    pub year_level: u8,
    /// Program code, present on unjoined listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_code: Option<String>,
    /// Program name joined in by the search endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
    /// College name joined in by the search endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub college_name: Option<String>,
    /// Object-storage path of the profile image.
    #[serde(
        rename = "profile_image_path",
        alias = "image_path",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_path: Option<String>,
}

impl Student {
    /// "Last, First Middle" for prompts.
    #[must_use]
    pub fn full_name(&self) -> String {
        let middle = self.middle_name.trim();
        if middle.is_empty() {
            format!("{}, {}", self.last_name, self.first_name)
        } else {
            format!("{}, {} {}", self.last_name, self.first_name, middle)
        }
    }
}

impl Entity for Student {
    type Create = NewStudent;
    type Update = StudentUpdate;
    type Key = StudentKey;

    const KIND: EntityKind = EntityKind::Students;
    const PATH: &'static str = "students";
    const DISPLAY_NAME: &'static str = "Student";
    const KEY_FIELD: &'static str = "id_number";
    const SORT_COLUMNS: &'static [&'static str] = &[
        "id_number",
        "first_name",
        "last_name",
        "gender",
        "year_level",
        "program_name",
        "college_name",
    ];
    const DEFAULT_SORT: &'static str = "id_number";

    fn columns() -> &'static [ColumnSpec] {
        COLUMNS
    }

    fn key(&self) -> &str {
        &self.id_number
    }

    fn key_payload(key: &str) -> StudentKey {
        StudentKey {
            id_number: key.trim().to_string(),
        }
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.id_number.clone(),
            self.first_name.clone(),
            self.middle_name.clone(),
            self.last_name.clone(),
            self.gender.clone(),
            self.year_level.to_string(),
            self.program_name.clone().unwrap_or_default(),
            self.college_name.clone().unwrap_or_default(),
        ]
    }
}

/// Body of `POST /api/students/add`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStudent {
    /// Identifying key, `1234-5678`.
    pub id_number: String,
    /// Given name.
    pub first_name: String,
    /// Middle name (optional).
    #[serde(default)]
    pub middle_name: String,
    /// Family name.
    pub last_name: String,
    /// Gender code.
    pub gender: String,
    /// Year level, 1 to 4.
    pub year_level: Option<u8>,
    /// Program the student enrols in.
    pub program_code: String,
    /// Stored profile image path, filled in after the upload step.
    #[serde(
        rename = "profile_image_path",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_path: Option<String>,
}

impl Validate for NewStudent {
    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new()
            .text("ID Number", &self.id_number)
            .text("First Name", &self.first_name)
            .text("Last Name", &self.last_name)
            .text("Gender", &self.gender)
            .present("Year Level", self.year_level.as_ref())
            .text("Program", &self.program_code)
            .finish()?;
        check_id_number(&self.id_number)?;
        if let Some(level) = self.year_level {
            check_range("Year Level", i64::from(level), 1, 4)?;
        }
        Ok(())
    }
}

/// Body of `PUT /api/students/update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentUpdate {
    /// Student being updated.
    pub id_number: String,
    /// Replacement given name.
    pub new_first_name: String,
    /// Replacement middle name.
    #[serde(default)]
    pub new_middle_name: String,
    /// Replacement family name.
    pub new_last_name: String,
    /// Replacement gender code.
    pub new_gender: String,
    /// Replacement year level.
    pub new_year_level: Option<u8>,
    /// Replacement program code.
    pub new_program_code: String,
    /// Replacement profile image path, filled in after the upload step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_image_path: Option<String>,
}

impl StudentUpdate {
    /// Pre-fill an update form from an existing row.
    #[must_use]
    pub fn from_row(row: &Student) -> Self {
        Self {
            id_number: row.id_number.clone(),
            new_first_name: row.first_name.clone(),
            new_middle_name: row.middle_name.clone(),
            new_last_name: row.last_name.clone(),
            new_gender: row.gender.clone(),
            new_year_level: Some(row.year_level),
            new_program_code: row.program_code.clone().unwrap_or_default(),
            new_image_path: None,
        }
    }
}

impl Validate for StudentUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        RequiredFields::new()
            .text("ID Number", &self.id_number)
            .text("First Name", &self.new_first_name)
            .text("Last Name", &self.new_last_name)
            .text("Gender", &self.new_gender)
            .present("Year Level", self.new_year_level.as_ref())
            .text("Program", &self.new_program_code)
            .finish()?;
        if let Some(level) = self.new_year_level {
            check_range("Year Level", i64::from(level), 1, 4)?;
        }
        Ok(())
    }
}

/// Body of `DELETE /api/students/delete`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentKey {
    /// Student to delete.
    pub id_number: String,
}

impl fmt::Display for StudentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_student() -> NewStudent {
        NewStudent {
            id_number: "2023-0001".to_string(),
            first_name: "Juan".to_string(),
            middle_name: String::new(),
            last_name: "Dela Cruz".to_string(),
            gender: "Male".to_string(),
            year_level: Some(3),
            program_code: "BSCS".to_string(),
            image_path: None,
        }
    }

    #[test]
    fn test_valid_student_passes() {
        assert!(valid_student().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_reported_in_form_order() {
        let student = NewStudent {
            first_name: String::new(),
            year_level: None,
            ..valid_student()
        };
        assert_eq!(
            student.validate(),
            Err(ValidationError::MissingFields {
                fields: vec!["First Name", "Year Level"]
            })
        );
    }

    #[test]
    fn test_bad_id_format_rejected() {
        let student = NewStudent {
            id_number: "20230001".to_string(),
            ..valid_student()
        };
        assert!(matches!(
            student.validate(),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_year_level_range() {
        let student = NewStudent {
            year_level: Some(7),
            ..valid_student()
        };
        assert!(matches!(
            student.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_update_serializes_new_prefixed_fields() {
        let update = StudentUpdate {
            id_number: "2023-0001".to_string(),
            new_first_name: "Juan".to_string(),
            new_last_name: "Cruz".to_string(),
            new_gender: "Male".to_string(),
            new_year_level: Some(2),
            new_program_code: "BSIT".to_string(),
            ..StudentUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["id_number"], "2023-0001");
        assert_eq!(json["new_program_code"], "BSIT");
        assert!(json.get("new_image_path").is_none());
    }

    #[test]
    fn test_create_sends_profile_image_path() {
        let student = NewStudent {
            image_path: Some("students/2023-0001.png".to_string()),
            ..valid_student()
        };
        let json = serde_json::to_value(&student).unwrap();
        assert_eq!(json["profile_image_path"], "students/2023-0001.png");
        assert!(json.get("image_path").is_none());
    }

    #[test]
    fn test_full_name() {
        let row = Student {
            id_number: "2023-0001".to_string(),
            first_name: "Juan".to_string(),
            middle_name: "Santos".to_string(),
            last_name: "Dela Cruz".to_string(),
            gender: "Male".to_string(),
            year_level: 1,
            program_code: None,
            program_name: None,
            college_name: None,
            image_path: None,
        };
        assert_eq!(row.full_name(), "Dela Cruz, Juan Santos");
    }
}

//! Request payloads built from `--set FIELD=VALUE` flags.
//!
//! Fields start from the payload's default (blank) values, so anything not
//! set is reported by the usual required-field validation rather than by a
//! deserialization error.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sis_core::{FileAttachment, UploadPolicy};
use sis_model::{Entity, ValidationError};

/// Fields sent as JSON numbers.
const NUMERIC_FIELDS: [&str; 2] = ["year_level", "new_year_level"];

/// Parse one `FIELD=VALUE` flag.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((field.to_string(), value.to_string()))
}

/// Build a payload from field assignments.
///
/// # Errors
///
/// Fails on fields the payload does not have and on non-numeric values for
/// numeric fields.
pub fn build<T>(assignments: &[(String, String)]) -> Result<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    let Value::Object(mut fields) =
        serde_json::to_value(T::default()).context("failed to build payload template")?
    else {
        bail!("payload is not a JSON object");
    };
    for (field, raw) in assignments {
        if !fields.contains_key(field) {
            let known: Vec<&str> = fields.keys().map(String::as_str).collect();
            bail!("unknown field '{field}' (expected one of: {})", known.join(", "));
        }
        fields.insert(field.clone(), typed_value(field, raw)?);
    }
    serde_json::from_value(Value::Object(fields)).context("invalid field value")
}

/// The value assigned to `field`, if any. Later assignments win.
pub fn assigned<'a>(assignments: &'a [(String, String)], field: &str) -> Option<&'a str> {
    assignments
        .iter()
        .rev()
        .find(|(name, _)| name == field)
        .map(|(_, value)| value.as_str())
}

/// Read an image file, guessing its content type from the extension.
///
/// Files over the policy's size limit are refused before any bytes are read.
/// Unknown extensions become `application/octet-stream` and are refused by
/// the upload policy rather than here.
///
/// # Errors
///
/// Fails when the file cannot be read or is larger than `policy.max_bytes`.
pub fn attachment_from_path(path: &Path, policy: &UploadPolicy) -> Result<FileAttachment> {
    let size = std::fs::metadata(path)
        .with_context(|| format!("failed to read {}", path.display()))?
        .len();
    if size > policy.max_bytes {
        bail!(
            ValidationError::FileTooLarge {
                size,
                max: policy.max_bytes,
            }
            .user_message()
        );
    }
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(FileAttachment::new(file_name, content_type_for(path), bytes))
}

/// Whether `code` names one of `parents`, ignoring case and surrounding blanks.
///
/// A blank code is left to the payload's own required-field check.
pub fn references_existing<P: Entity>(parents: &[P], code: &str) -> bool {
    let code = code.trim();
    code.is_empty() || parents.iter().any(|parent| parent.key().eq_ignore_ascii_case(code))
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

fn typed_value(field: &str, raw: &str) -> Result<Value> {
    if !NUMERIC_FIELDS.contains(&field) {
        return Ok(Value::String(raw.to_string()));
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }
    trimmed
        .parse::<u64>()
        .map(Value::from)
        .with_context(|| format!("{field} must be a whole number, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sis_model::{College, NewCollege, NewStudent, Validate};

    fn assignments(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(field, value)| ((*field).to_string(), (*value).to_string()))
            .collect()
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("college_name=College of Arts = Letters"),
            Ok((
                "college_name".to_string(),
                "College of Arts = Letters".to_string()
            ))
        );
        assert!(parse_assignment("college_name").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn test_build_fills_known_fields() {
        let payload: NewCollege = build(&assignments(&[
            ("college_code", "CCS"),
            ("college_name", "College of Computer Studies"),
        ]))
        .unwrap();
        assert_eq!(payload.college_code, "CCS");
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_reach_validation() {
        let payload: NewStudent = build(&assignments(&[("id_number", "2023-0001")])).unwrap();
        let err = payload.validate().unwrap_err();
        assert!(err.user_message().contains("First Name"));
    }

    #[test]
    fn test_numeric_fields() {
        let payload: NewStudent = build(&assignments(&[("year_level", "3")])).unwrap();
        assert_eq!(payload.year_level, Some(3));
        assert!(build::<NewStudent>(&assignments(&[("year_level", "third")])).is_err());
    }

    #[test]
    fn test_assigned_prefers_last_value() {
        let pairs = assignments(&[("college_code", "A"), ("college_code", "B")]);
        assert_eq!(assigned(&pairs, "college_code"), Some("B"));
        assert_eq!(assigned(&pairs, "college_name"), None);
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(content_type_for(Path::new("me.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("me.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = build::<NewCollege>(&assignments(&[("dean", "X")])).unwrap_err();
        assert!(err.to_string().contains("unknown field 'dean'"));
    }

    #[test]
    fn test_oversized_file_is_refused_before_reading() {
        let path = std::env::temp_dir().join(format!("sis-cli-oversized-{}.png", std::process::id()));
        std::fs::write(&path, vec![0_u8; 2048]).unwrap();
        let policy = UploadPolicy {
            max_bytes: 1024,
            ..UploadPolicy::default()
        };

        let refused = attachment_from_path(&path, &policy).unwrap_err();
        let accepted = attachment_from_path(&path, &UploadPolicy::default());
        std::fs::remove_file(&path).unwrap();

        assert!(refused.to_string().contains("File is too large (2048 bytes)"));
        let attachment = accepted.unwrap();
        assert_eq!(attachment.content_type, "image/png");
        assert_eq!(attachment.size(), 2048);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = attachment_from_path(Path::new("/nonexistent/me.png"), &UploadPolicy::default())
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/me.png"));
    }

    #[test]
    fn test_references_existing_parent() {
        let colleges: Vec<College> = serde_json::from_value(serde_json::json!([
            {"college_code": "CCS", "college_name": "College of Computer Studies"},
            {"college_code": "CASS", "college_name": "College of Arts and Social Sciences"}
        ]))
        .unwrap();
        assert!(references_existing(&colleges, "ccs"));
        assert!(references_existing(&colleges, " CASS "));
        assert!(references_existing(&colleges, ""));
        assert!(!references_existing(&colleges, "CEBA"));
    }
}

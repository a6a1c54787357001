//! User-facing edit validation.
//!
//! The second of the two input layers: unlike [`crate::sanitize`], which
//! silently repairs anything, these checks reject a commit with a typed
//! error the editing UI can show inline (empty name, over-long field,
//! duplicate sibling name). Accepted values come back already sanitized, so
//! a caller that validates does not need to sanitize again.

use thiserror::Error;

use crate::sanitize;

/// A rejected edit. The field name is baked into the message so the UI can
/// surface it directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    FieldEmpty(&'static str),

    #[error("{0} must be {1} characters or less")]
    FieldTooLong(&'static str, usize),

    #[error("a node with this name already exists")]
    DuplicateName,
}

// Length is checked on the raw input: the sanitizer would truncate
// silently, and the point of this layer is to tell the user instead.
fn require(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<String, ValidationError> {
    if value.trim().chars().count() > max_len {
        return Err(ValidationError::FieldTooLong(field, max_len));
    }
    let cleaned = sanitize::sanitize_label(value);
    if cleaned.is_empty() {
        return Err(ValidationError::FieldEmpty(field));
    }
    Ok(cleaned)
}

/// Validate a node label (project, component, file names).
pub fn validate_label(label: &str) -> Result<String, ValidationError> {
    require("name", label, sanitize::LABEL_MAX)
}

/// Validate a function name.
pub fn validate_function_name(name: &str) -> Result<String, ValidationError> {
    require("function name", name, sanitize::LABEL_MAX)
}

/// Validate a description. Empty is fine; only the cap is enforced.
pub fn validate_description(description: &str) -> Result<String, ValidationError> {
    if description.trim().chars().count() > sanitize::DESCRIPTION_MAX {
        return Err(ValidationError::FieldTooLong(
            "description",
            sanitize::DESCRIPTION_MAX,
        ));
    }
    Ok(sanitize::sanitize_description(description))
}

/// Validate a custom file-type tag.
pub fn validate_custom_file_type(file_type: &str) -> Result<String, ValidationError> {
    require("file type", file_type, sanitize::CUSTOM_TYPE_MAX)
}

/// Reject a name already used (case-insensitively) within the same sibling
/// scope.
pub fn validate_unique_name<'a>(
    name: &str,
    existing: impl IntoIterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let normalized = name.trim().to_lowercase();
    if existing
        .into_iter()
        .any(|e| e.to_lowercase() == normalized)
    {
        return Err(ValidationError::DuplicateName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_labels_are_rejected() {
        assert_eq!(
            validate_label("   "),
            Err(ValidationError::FieldEmpty("name"))
        );
        // A label that sanitizes down to nothing is empty too.
        assert_eq!(
            validate_label("<script></script>"),
            Err(ValidationError::FieldEmpty("name"))
        );
    }

    #[test]
    fn accepted_labels_come_back_sanitized() {
        assert_eq!(validate_label("  <b>Auth</b>  ").unwrap(), "Auth");
    }

    #[test]
    fn custom_file_types_have_a_tighter_cap() {
        let long = "x".repeat(31);
        assert_eq!(
            validate_custom_file_type(&long),
            Err(ValidationError::FieldTooLong("file type", 30))
        );
        assert_eq!(validate_custom_file_type("proto").unwrap(), "proto");
    }

    #[test]
    fn duplicate_names_match_case_insensitively() {
        let existing = ["AuthService.ts", "api.ts"];
        assert_eq!(
            validate_unique_name("authservice.ts", existing),
            Err(ValidationError::DuplicateName)
        );
        assert!(validate_unique_name("session.ts", existing).is_ok());
    }
}

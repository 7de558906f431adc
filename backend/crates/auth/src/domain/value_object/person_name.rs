//! Person Name Value Object
//!
//! First and last names. Free text, trimmed, bounded in length.

use kernel::error::{
    app_error::{AppError, AppResult},
    code::ErrorCode,
};
use serde::Serialize;
use std::fmt;

/// Maximum length for a name part (in characters)
pub const PERSON_NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name part; `label` is used in messages ("First name")
    pub fn new(label: &str, input: impl AsRef<str>) -> AppResult<Self> {
        let name = input.as_ref().trim();

        if name.is_empty() {
            return Err(AppError::validation(
                ErrorCode::RequiredField,
                format!("{label} is required"),
            ));
        }
        if name.chars().count() > PERSON_NAME_MAX_LENGTH {
            return Err(AppError::validation(
                ErrorCode::FieldTooLong,
                format!("{label} must be at most {PERSON_NAME_MAX_LENGTH} characters"),
            ));
        }
        if name.chars().any(char::is_control) {
            return Err(AppError::validation(
                ErrorCode::InvalidFormat,
                format!("{label} contains invalid characters"),
            ));
        }

        Ok(Self(name.to_string()))
    }

    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trims() {
        let name = PersonName::new("First name", "  Ada ").unwrap();
        assert_eq!(name.as_str(), "Ada");
    }

    #[test]
    fn test_single_letter_is_fine() {
        assert!(PersonName::new("Last name", "L").is_ok());
    }

    #[test]
    fn test_rejections() {
        let err = PersonName::new("First name", " ").unwrap_err();
        assert_eq!(err.code(), ErrorCode::RequiredField);
        assert_eq!(err.message(), "First name is required");

        let err = PersonName::new("Last name", "x".repeat(101)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::FieldTooLong);

        let err = PersonName::new("Last name", "a\nb").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFormat);
    }
}

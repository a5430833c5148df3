//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format
    InvalidFormat { field: &'static str, reason: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{}: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Reject empty (or whitespace-only) values and values over `max` characters.
pub(crate) fn bounded(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "username",
            max: 100,
        };
        assert_eq!(
            err.to_string(),
            "username exceeds maximum length of 100 characters"
        );
    }

    #[test]
    fn bounded_counts_characters_not_bytes() {
        // 3 chars, 6 bytes
        assert!(bounded("name", "éée", 3).is_ok());
        assert!(matches!(
            bounded("name", "éééé", 3),
            Err(ValidationError::TooLong { max: 3, .. })
        ));
    }

    #[test]
    fn bounded_rejects_blank() {
        assert_eq!(
            bounded("name", "   ", 10),
            Err(ValidationError::Empty { field: "name" })
        );
    }
}

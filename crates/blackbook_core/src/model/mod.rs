//! Domain model for universes, their members, and nested resources.
//!
//! # Responsibility
//! - Define canonical records shared by repositories, services and the HTTP layer.
//! - Own field-level validation (blank names, email shape).
//!
//! # Invariants
//! - Every nested resource belongs to exactly one universe.
//! - Universe deletion is represented by a `discarded_at` tombstone.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod image;
pub mod named;
pub mod relationship;
pub mod resource;
pub mod universe;
pub mod user;

/// Maximum accepted length for names and captions, in characters.
pub const MAX_NAME_CHARS: usize = 255;

/// Field-level validation failure with human-readable messages.
///
/// Messages are sentence fragments such as `Name can't be blank`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub messages: Vec<String>,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages.join("; "))
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects blank or overlong input.
///
/// `field` is the human label used in messages (`Name`, `Filename`).
pub fn normalize_required(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(format!("{field} can't be blank")));
    }
    if trimmed.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::new(format!(
            "{field} is too long (maximum is {MAX_NAME_CHARS} characters)"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_required, MAX_NAME_CHARS};

    #[test]
    fn normalize_required_trims_surrounding_whitespace() {
        assert_eq!(normalize_required("Name", "  Gandalf \n").unwrap(), "Gandalf");
    }

    #[test]
    fn normalize_required_rejects_blank_and_overlong_values() {
        let blank = normalize_required("Name", "   ").unwrap_err();
        assert_eq!(blank.messages, vec!["Name can't be blank".to_string()]);

        let long = "x".repeat(MAX_NAME_CHARS + 1);
        let err = normalize_required("Caption", &long).unwrap_err();
        assert!(err.messages[0].starts_with("Caption is too long"));
    }
}

//! User account model.
//!
//! # Invariants
//! - `display_name` and `email` are unique, compared case-insensitively.
//! - `api_token` is never serialized into API responses.

use crate::model::{normalize_required, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = i64;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Persisted user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub email: String,
    /// Bearer token presented in `Authorization` headers.
    #[serde(skip_serializing)]
    pub api_token: String,
}

/// Input for provisioning a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewUser {
    pub display_name: String,
    pub email: String,
}

impl NewUser {
    pub fn new(display_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
        }
    }

    /// Returns a trimmed copy, collecting every field failure.
    pub fn normalized(&self) -> Result<Self, ValidationError> {
        let mut messages = Vec::new();

        let display_name = normalize_required("Display name", &self.display_name)
            .map_err(|err| messages.extend(err.messages))
            .unwrap_or_default();

        let email = self.email.trim().to_ascii_lowercase();
        if email.is_empty() {
            messages.push("Email can't be blank".to_string());
        } else if !EMAIL_RE.is_match(&email) {
            messages.push("Email is invalid".to_string());
        }

        if !messages.is_empty() {
            return Err(ValidationError { messages });
        }
        Ok(Self {
            display_name,
            email,
        })
    }
}

/// Generates a fresh opaque API token.
pub fn generate_api_token() -> String {
    Uuid::new_v4().simple().to_string()
}

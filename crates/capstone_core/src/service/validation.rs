//! Form-boundary input validation.
//!
//! The stores trust their callers; this is the only place user input is
//! checked. `Display` output is the user-facing message.

use crate::model::session::Role;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+$").expect("valid email shape regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingEmail,
    InvalidEmail,
    MissingRole,
    UnknownRole(String),
    MissingTaskTitle,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEmail => write!(f, "Please enter an email address"),
            Self::InvalidEmail => write!(f, "Please enter a valid email address"),
            Self::MissingRole => write!(f, "Please select a role"),
            Self::UnknownRole(role) => write!(f, "Unknown role `{role}`"),
            Self::MissingTaskTitle => write!(f, "Please enter a task title"),
        }
    }
}

impl Error for ValidationError {}

/// Validates login form input, returning the trimmed email and parsed role.
///
/// Checks run in form order: email presence, email shape, then role.
pub fn validate_login(email: &str, role: Option<&str>) -> Result<(String, Role), ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !EMAIL_SHAPE_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }

    let role = match role.map(str::trim) {
        None | Some("") => return Err(ValidationError::MissingRole),
        Some(value) => {
            Role::parse(value).ok_or_else(|| ValidationError::UnknownRole(value.to_string()))?
        }
    };

    Ok((email.to_string(), role))
}

/// Returns the trimmed task title, rejecting blank input.
pub fn validate_task_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingTaskTitle);
    }
    Ok(trimmed.to_string())
}

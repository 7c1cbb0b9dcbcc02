//! Request validation.
//!
//! Registration and login input arrives as loosely-typed data (every field is
//! optional so that a missing field is reported like any other violation).
//! The validators here check every field, collect all failures and only then
//! decide, so a caller always sees the complete list of problems.
//!
//! These functions are pure: no I/O and no side effects. The server runs them
//! before the registration service is invoked, and the session client runs the
//! same rules before anything is sent over the network.

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::types::{Email, UserRole};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum display name length accepted by the register form, in characters.
///
/// The server only requires a non-blank name.
pub const MIN_FORM_NAME_LENGTH: usize = 2;

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field, as it appears on the wire.
    pub field: String,
    /// Human-readable reason.
    pub reason: String,
}

impl FieldError {
    /// Create a new field error.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// All field errors found in one request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Wrap a list of field errors.
    #[must_use]
    pub const fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    /// A validation failure on exactly one field.
    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, reason)])
    }

    /// The individual field errors.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Consume into the individual field errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<FieldError> {
        self.0
    }

    /// Returns the first error reported for `field`, if any.
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    /// Names of the fields that failed, in report order.
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation failed")?;
        for (i, err) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{}: {}", err.field, err.reason)?;
        }
        Ok(())
    }
}

// =============================================================================
// Registration
// =============================================================================

/// Raw registration input as submitted by a client.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RegisterInput {
    /// Email address, unparsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Plaintext password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Wire name of the role (`admin` or `officer`); absent means officer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl RegisterInput {
    /// Build an input with every field present.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        role: Option<UserRole>,
    ) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(password.into()),
            name: Some(name.into()),
            role: role.map(|r| r.as_str().to_owned()),
        }
    }
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("name", &self.name)
            .field("role", &self.role)
            .finish()
    }
}

/// A registration candidate that passed validation.
///
/// The plaintext password is only reachable through
/// [`secrecy::ExposeSecret`], and is redacted from `Debug` output.
#[derive(Debug)]
pub struct Registration {
    /// Parsed email, case preserved.
    pub email: Email,
    /// Plaintext password, to be hashed before storage.
    pub password: SecretString,
    /// Trimmed display name.
    pub name: String,
    /// Requested role, officer when none was given.
    pub role: UserRole,
}

/// Validate raw registration input.
///
/// Rules:
/// - `email` is required and must parse as an [`Email`]
/// - `password` is required, non-empty and at least [`MIN_PASSWORD_LENGTH`] characters
/// - `name` is required and must not be blank (it is stored trimmed)
/// - `role`, when present, must be `admin` or `officer`; when absent it defaults to officer
///
/// # Errors
///
/// Returns every failing field at once.
pub fn validate_registration(input: &RegisterInput) -> Result<Registration, ValidationErrors> {
    let mut errors = Vec::new();

    let email = check_email(input.email.as_deref(), &mut errors);
    let password = check_password(input.password.as_deref(), &mut errors)
        .map(|p| SecretString::from(p.to_owned()));

    let name = match input.name.as_deref() {
        None => {
            errors.push(FieldError::new("name", "name is required"));
            None
        }
        Some(n) if n.trim().is_empty() => {
            errors.push(FieldError::new("name", "name cannot be empty"));
            None
        }
        Some(n) => Some(n.trim().to_owned()),
    };

    let role = match input.role.as_deref() {
        None => Some(UserRole::default()),
        Some(r) => match r.parse::<UserRole>() {
            Ok(role) => Some(role),
            Err(e) => {
                errors.push(FieldError::new("role", e.to_string()));
                None
            }
        },
    };

    match (email, password, name, role) {
        (Some(email), Some(password), Some(name), Some(role)) => Ok(Registration {
            email,
            password,
            name,
            role,
        }),
        _ => Err(ValidationErrors::new(errors)),
    }
}

/// Validate the register form before it is submitted.
///
/// Applies every [`validate_registration`] rule, and also requires the name to
/// be at least [`MIN_FORM_NAME_LENGTH`] characters.
///
/// # Errors
///
/// Returns every failing field at once, in the same order as
/// [`validate_registration`].
pub fn validate_register_form(input: &RegisterInput) -> Result<Registration, ValidationErrors> {
    let short_name = input
        .name
        .as_deref()
        .map(str::trim)
        .is_some_and(|n| !n.is_empty() && n.chars().count() < MIN_FORM_NAME_LENGTH);

    match (validate_registration(input), short_name) {
        (result, false) => result,
        (result, true) => {
            let mut errors = result
                .err()
                .map(ValidationErrors::into_errors)
                .unwrap_or_default();
            let at = errors
                .iter()
                .position(|e| e.field == "role")
                .unwrap_or(errors.len());
            errors.insert(
                at,
                FieldError::new(
                    "name",
                    format!("Name must be at least {MIN_FORM_NAME_LENGTH} characters"),
                ),
            );
            Err(ValidationErrors::new(errors))
        }
    }
}

// =============================================================================
// Login
// =============================================================================

/// Login form input.
#[derive(Clone, Serialize, Deserialize)]
pub struct LoginInput {
    /// Email address, unparsed.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

impl LoginInput {
    /// Create a login input.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Validate login form input (valid email, password of minimum length).
///
/// # Errors
///
/// Returns every failing field at once.
pub fn validate_login(input: &LoginInput) -> Result<Email, ValidationErrors> {
    let mut errors = Vec::new();

    let email = check_email(Some(&input.email), &mut errors);
    let password = check_password(Some(&input.password), &mut errors);

    match (email, password) {
        (Some(email), Some(_)) => Ok(email),
        _ => Err(ValidationErrors::new(errors)),
    }
}

// =============================================================================
// Field checks
// =============================================================================

fn check_email(raw: Option<&str>, errors: &mut Vec<FieldError>) -> Option<Email> {
    let Some(raw) = raw else {
        errors.push(FieldError::new("email", "email is required"));
        return None;
    };

    match Email::parse(raw) {
        Ok(email) => Some(email),
        Err(e) => {
            errors.push(FieldError::new("email", e.to_string()));
            None
        }
    }
}

fn check_password<'a>(raw: Option<&'a str>, errors: &mut Vec<FieldError>) -> Option<&'a str> {
    match raw {
        None => {
            errors.push(FieldError::new("password", "password is required"));
            None
        }
        Some("") => {
            errors.push(FieldError::new("password", "password cannot be empty"));
            None
        }
        Some(p) if p.chars().count() < MIN_PASSWORD_LENGTH => {
            errors.push(FieldError::new(
                "password",
                format!("password must be at least {MIN_PASSWORD_LENGTH} characters"),
            ));
            None
        }
        Some(p) => Some(p),
    }
}

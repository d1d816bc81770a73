//! Form validation run before any credential exchange.
//!
//! Field names match the form inputs (`email`, `password`, `name`, `code`,
//! `reset_token`, `new_password`) so views can place messages inline.

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;

use crate::net::error::{AuthError, FieldError, FieldErrors};
use crate::net::types::{Credentials, SignupData};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_NAME_LEN: usize = 100;
pub const VERIFICATION_CODE_LEN: usize = 6;

/// Whole-value form of `\S+@\S+\.\S+`: no whitespace anywhere, and some `@`
/// past the first character whose remainder holds a dot with text on both
/// sides. Later `@`s and dots may fall inside either part.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    email.match_indices('@').any(|(at, _)| {
        let domain = &email[at + 1..];
        at > 0 && domain.match_indices('.').any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
    })
}

/// Strength rules for new passwords. Returns one message per failed rule.
#[must_use]
pub fn password_strength(password: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(format!("Password must be at least {MIN_PASSWORD_LEN} characters"));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter".to_owned());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter".to_owned());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one number".to_owned());
    }
    errors
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.is_empty() {
        errors.push(FieldError::new("email", "Email is required"));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Please enter a valid email address"));
    }
}

fn check_new_password(field: &'static str, password: &str, errors: &mut Vec<FieldError>) {
    if password.is_empty() {
        errors.push(FieldError::new(field, "Password is required"));
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(field, format!("Password must be at least {MIN_PASSWORD_LEN} characters")));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), AuthError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(FieldErrors(errors)))
    }
}

/// # Errors
///
/// Returns [`AuthError::Validation`] listing every failed field.
pub fn validate_credentials(credentials: &Credentials) -> Result<(), AuthError> {
    let mut errors = Vec::new();
    check_email(&credentials.email, &mut errors);
    if credentials.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    finish(errors)
}

/// # Errors
///
/// Returns [`AuthError::Validation`] listing every failed field.
pub fn validate_signup(data: &SignupData) -> Result<(), AuthError> {
    let mut errors = Vec::new();
    let name = data.name.trim();
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    } else if name.chars().count() > MAX_NAME_LEN {
        errors.push(FieldError::new("name", "Name is too long"));
    }
    check_email(&data.email, &mut errors);
    check_new_password("password", &data.password, &mut errors);
    finish(errors)
}

/// # Errors
///
/// Returns [`AuthError::Validation`] if the email is missing or malformed.
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    finish(errors)
}

/// # Errors
///
/// Returns [`AuthError::Validation`] listing every failed field.
pub fn validate_verification(email: &str, code: &str) -> Result<(), AuthError> {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    if code.len() != VERIFICATION_CODE_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
        errors.push(FieldError::new("code", format!("Please enter all {VERIFICATION_CODE_LEN} digits")));
    }
    finish(errors)
}

/// # Errors
///
/// Returns [`AuthError::Validation`] listing every failed field.
pub fn validate_reset_confirm(email: &str, reset_token: &str, new_password: &str) -> Result<(), AuthError> {
    let mut errors = Vec::new();
    check_email(email, &mut errors);
    if reset_token.trim().is_empty() {
        errors.push(FieldError::new("reset_token", "Reset token is required"));
    }
    check_new_password("new_password", new_password, &mut errors);
    finish(errors)
}

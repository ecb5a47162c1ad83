//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SurrealDB enforces no field lengths, so every string that reaches a
//! write path goes through these.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: menu item, event title, gallery category, guest name
pub const MAX_NAME_LEN: usize = 200;

/// Notes and descriptions (booking notes, event/menu descriptions)
pub const MAX_NOTE_LEN: usize = 2000;

/// Short identifiers: phone numbers, locations, section keys
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Booking party size bounds
pub const MIN_PARTY_SIZE: u32 = 1;
pub const MAX_PARTY_SIZE: u32 = 10;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

// ── Validation helpers (repository write paths) ─────────────────────

use crate::db::repository::RepoError;

/// Validate a required string on a repository write path.
pub fn validate_repo_text(value: &str, field: &str, max_len: usize) -> Result<(), RepoError> {
    if value.trim().is_empty() {
        return Err(RepoError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(RepoError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate an optional string on a repository write path.
pub fn validate_repo_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), RepoError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(RepoError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Minimal email shape check: something@domain.tld, within length limits.
pub fn validate_email(value: &str) -> Result<(), RepoError> {
    validate_repo_text(value, "email", MAX_EMAIL_LEN)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(RepoError::Validation(format!("invalid email: {value}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("jane@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("jane.example.com").is_err());
        assert!(validate_email("jane@example.com.").is_err());
    }

    #[test]
    fn required_text_rejects_empty_and_oversized() {
        assert!(validate_required_text("Retro IPA", "name", MAX_NAME_LEN).is_ok());
        assert!(validate_required_text("   ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "name", MAX_NAME_LEN).is_err());
    }

    #[test]
    fn optional_text_allows_none() {
        assert!(validate_optional_text(&None, "notes", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("window table".into()), "notes", MAX_NOTE_LEN).is_ok());
    }
}

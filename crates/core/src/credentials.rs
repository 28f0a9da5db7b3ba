//! Registration and password rules.
//!
//! These checks run before any store access so malformed input never reaches
//! the database.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Minimum username length in characters.
pub const USERNAME_MIN_LEN: usize = 3;

/// Maximum username length in characters.
pub const USERNAME_MAX_LEN: usize = 50;

/// Minimum password length in characters.
pub const PASSWORD_MIN_LEN: usize = 8;

/// `local@domain.tld` with no whitespace and a single `@`.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Check the username length bounds.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(CoreError::InvalidUsername);
    }
    Ok(())
}

/// Whether `email` looks like a deliverable address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if !is_valid_email(email) {
        return Err(CoreError::InvalidEmail);
    }
    Ok(())
}

/// Enforce the password strength rule: at least [`PASSWORD_MIN_LEN`]
/// characters, at least one of them an ASCII digit.
pub fn validate_password_strength(password: &str) -> Result<(), CoreError> {
    let long_enough = password.chars().count() >= PASSWORD_MIN_LEN;
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !long_enough || !has_digit {
        return Err(CoreError::WeakPassword);
    }
    Ok(())
}

/// Treat absent and whitespace-only strings alike.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn username_bounds_are_inclusive() {
        assert!(validate_username("abc").is_ok());
        assert!(validate_username(&"a".repeat(50)).is_ok());
        assert_matches!(validate_username("ab"), Err(CoreError::InvalidUsername));
        assert_matches!(
            validate_username(&"a".repeat(51)),
            Err(CoreError::InvalidUsername)
        );
    }

    #[test]
    fn username_length_counts_characters_not_bytes() {
        // Three characters, six bytes.
        assert!(validate_username("ééé").is_ok());
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("two@@x.com"));
        assert!(!is_valid_email("spa ce@x.com"));
        assert_matches!(validate_email(""), Err(CoreError::InvalidEmail));
    }

    #[test]
    fn password_needs_length_and_digit() {
        assert!(validate_password_strength("pass1234").is_ok());
        assert_matches!(
            validate_password_strength("pass123"),
            Err(CoreError::WeakPassword)
        );
        assert_matches!(
            validate_password_strength("password"),
            Err(CoreError::WeakPassword)
        );
    }

    #[test]
    fn non_blank_filters_whitespace() {
        assert_eq!(non_blank(Some("  alice ")), Some("alice"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}

//! crates/tradevision_core/src/validation.rs
//!
//! Client-side checks that run before any request is made. Failures are shown
//! inline next to the offending field and never reach the network.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::domain::{LoginRequest, SignupRequest};

/// Largest chart image accepted for upload.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const MIN_PASSWORD_LEN: usize = 8;
const NICKNAME_LEN: std::ops::RangeInclusive<usize> = 2..=50;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

//=========================================================================================
// Form Validation
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Email,
    Password,
    ConfirmPassword,
    Nickname,
}

/// Inline messages keyed by form field. Empty means the form may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn check_email(email: &str, errors: &mut FieldErrors) {
    if email.trim().is_empty() {
        errors.insert(Field::Email, "Please enter your email.");
    } else if !is_valid_email(email) {
        errors.insert(Field::Email, "Please enter a valid email address.");
    }
}

/// Login only requires a well-formed email and a non-empty password.
pub fn validate_login(request: &LoginRequest) -> FieldErrors {
    let mut errors = FieldErrors::default();
    check_email(&request.email, &mut errors);
    if request.password.is_empty() {
        errors.insert(Field::Password, "Please enter your password.");
    }
    errors
}

pub fn validate_signup(request: &SignupRequest, confirm_password: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();
    check_email(&request.email, &mut errors);

    let password = &request.password;
    if password.is_empty() {
        errors.insert(Field::Password, "Please enter your password.");
    } else if password.chars().count() < MIN_PASSWORD_LEN {
        errors.insert(Field::Password, "Password must be at least 8 characters.");
    } else if !(password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit()))
    {
        errors.insert(Field::Password, "Password must contain both letters and numbers.");
    }

    if confirm_password.is_empty() {
        errors.insert(Field::ConfirmPassword, "Please confirm your password.");
    } else if confirm_password != password {
        errors.insert(Field::ConfirmPassword, "Passwords do not match.");
    }

    let nickname = &request.nickname;
    if nickname.trim().is_empty() {
        errors.insert(Field::Nickname, "Please enter a nickname.");
    } else if !NICKNAME_LEN.contains(&nickname.chars().count()) {
        errors.insert(Field::Nickname, "Nickname must be between 2 and 50 characters.");
    }

    errors
}

//=========================================================================================
// Upload Validation
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileRejection {
    #[error("Only image files can be uploaded.")]
    NotAnImage { mime_type: String },
    #[error("File size cannot exceed 10MB.")]
    TooLarge { size: u64 },
}

/// Accepts `image/*` files of at most [`MAX_UPLOAD_BYTES`].
pub fn validate_chart_file(mime_type: &str, size: u64) -> Result<(), FileRejection> {
    if !mime_type.starts_with("image/") {
        return Err(FileRejection::NotAnImage {
            mime_type: mime_type.to_string(),
        });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(FileRejection::TooLarge { size });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str, password: &str, nickname: &str) -> SignupRequest {
        SignupRequest {
            email: email.into(),
            password: password.into(),
            nickname: nickname.into(),
            investment_level: None,
        }
    }

    #[test]
    fn login_accepts_short_passwords() {
        let request = LoginRequest {
            email: "user@test.com".into(),
            password: "secret1".into(),
        };
        assert!(validate_login(&request).is_empty());
    }

    #[test]
    fn login_flags_missing_and_malformed_fields() {
        let errors = validate_login(&LoginRequest {
            email: "not-an-email".into(),
            password: String::new(),
        });
        assert_eq!(errors.get(Field::Email), Some("Please enter a valid email address."));
        assert_eq!(errors.get(Field::Password), Some("Please enter your password."));

        let errors = validate_login(&LoginRequest {
            email: "   ".into(),
            password: "x".into(),
        });
        assert_eq!(errors.get(Field::Email), Some("Please enter your email."));
    }

    #[test]
    fn signup_enforces_password_policy() {
        let errors = validate_signup(&signup("a@b.co", "short1", "nick"), "short1");
        assert_eq!(errors.get(Field::Password), Some("Password must be at least 8 characters."));

        let errors = validate_signup(&signup("a@b.co", "lettersonly", "nick"), "lettersonly");
        assert_eq!(
            errors.get(Field::Password),
            Some("Password must contain both letters and numbers.")
        );

        let errors = validate_signup(&signup("a@b.co", "abcd1234", "nick"), "abcd12345");
        assert_eq!(errors.get(Field::ConfirmPassword), Some("Passwords do not match."));

        assert!(validate_signup(&signup("a@b.co", "abcd1234", "nick"), "abcd1234").is_empty());
    }

    #[test]
    fn signup_checks_nickname_length() {
        let errors = validate_signup(&signup("a@b.co", "abcd1234", "n"), "abcd1234");
        assert!(errors.get(Field::Nickname).is_some());

        let long = "n".repeat(51);
        let errors = validate_signup(&signup("a@b.co", "abcd1234", &long), "abcd1234");
        assert!(errors.get(Field::Nickname).is_some());
    }

    #[test]
    fn chart_file_rules() {
        assert_eq!(
            validate_chart_file("application/pdf", 1024),
            Err(FileRejection::NotAnImage {
                mime_type: "application/pdf".into()
            })
        );
        let twelve_mb = 12 * 1024 * 1024;
        assert_eq!(
            validate_chart_file("image/png", twelve_mb),
            Err(FileRejection::TooLarge { size: twelve_mb })
        );
        assert!(validate_chart_file("image/png", MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_chart_file("image/jpeg", 2048).is_ok());
    }
}

use regex::Regex;

use crate::core::error::{ConfigError, Error};

pub(crate) const MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Clone)]
pub(crate) struct Validator {
    email_pattern: Regex,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("email_pattern", &self.email_pattern.as_str())
            .finish()
    }
}

impl Validator {
    pub(crate) fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            email_pattern: Regex::new(r"^\S+@\S+\.\S+$")?,
        })
    }

    /// Canonicalizes `email`, rejecting anything that does not look like an address.
    pub(crate) fn email(&self, email: &str) -> Result<String, Error> {
        let email = canonical_email(email);

        if !self.email_pattern.is_match(&email) {
            return Err(Error::Validation("Email is invalid.".into()));
        }

        Ok(email)
    }

    pub(crate) fn new_password(&self, password: &str) -> Result<(), Error> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(Error::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters."
            )));
        }

        Ok(())
    }
}

/// Emails are stored and looked up trimmed and ASCII-lowercased.
pub(crate) fn canonical_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Unwraps an optional request field, treating blank strings as missing.
pub(crate) fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, Error> {
    match value.as_deref() {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Validation(message.to_owned())),
    }
}

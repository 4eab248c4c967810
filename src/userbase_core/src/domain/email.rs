use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

use super::user::UserError;

const MAX_EMAIL_LENGTH: usize = 100;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]+$").expect("email pattern is a valid regex")
});

/// A normalized email address.
///
/// Emails are trimmed and lower-cased on parse, so two inputs that differ
/// only in case or surrounding whitespace are the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, UserError> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(UserError::InvalidEmail("email is required".to_string()));
        }
        if normalized.chars().count() > MAX_EMAIL_LENGTH {
            return Err(UserError::InvalidEmail(format!(
                "email must be at most {MAX_EMAIL_LENGTH} characters"
            )));
        }
        if !EMAIL_PATTERN.is_match(&normalized) {
            return Err(UserError::InvalidEmail(format!(
                "'{normalized}' is not a valid e-mail address"
            )));
        }

        Ok(Self(normalized))
    }

    /// Wrap an email read back from the store as it was saved.
    pub fn from_stored(stored: String) -> Self {
        Self(stored)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Email {
    type Error = UserError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

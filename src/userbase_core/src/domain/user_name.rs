use std::fmt;

use serde::Serialize;

use super::user::UserError;

const MAX_NAME_LENGTH: usize = 100;

/// Display name used for profiles created from an OAuth2 login, where the
/// provider does not hand us a real name.
const UNKNOWN_NAME: &str = "Unknown";

/// A non-empty, trimmed display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserName(String);

impl UserName {
    pub fn parse(raw: &str) -> Result<Self, UserError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(UserError::InvalidName("name is required".to_string()));
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(UserError::InvalidName(format!(
                "name must be at most {MAX_NAME_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Wrap a name read back from the store as it was saved.
    pub fn from_stored(stored: String) -> Self {
        Self(stored)
    }

    pub fn unknown() -> Self {
        Self(UNKNOWN_NAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

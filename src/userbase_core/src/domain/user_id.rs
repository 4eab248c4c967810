use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

const OBJECT_KEY_LEN: usize = 12;

/// Identifier assigned to a user by the store that persisted it.
///
/// Relational and in-memory stores hand out integers from a sequence, the
/// document store hands out 12-byte object ids. A store only ever issues one
/// kind, see [`IdFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserId {
    Sequence(i64),
    Object(ObjectKey),
}

/// Raw bytes of a document-store object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey([u8; OBJECT_KEY_LEN]);

impl ObjectKey {
    pub const fn from_bytes(bytes: [u8; OBJECT_KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; OBJECT_KEY_LEN] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Sequence(id) => write!(f, "{id}"),
            UserId::Object(key) => f.write_str(&key.to_hex()),
        }
    }
}

impl Serialize for UserId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            UserId::Sequence(id) => serializer.serialize_i64(*id),
            UserId::Object(key) => serializer.serialize_str(&key.to_hex()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("'{0}' is not an integer identifier")]
    NotAnInteger(String),
    #[error("'{0}' is not a 24 character hex object identifier")]
    NotAnObjectId(String),
}

/// The identifier format a store issues.
///
/// Raw identifiers coming from callers are validated against this before
/// any lookup, so a malformed id never reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdFormat {
    Sequence,
    ObjectId,
}

impl IdFormat {
    pub fn parse(self, raw: &str) -> Result<UserId, UserIdError> {
        match self {
            IdFormat::Sequence => raw
                .parse::<i64>()
                .map(UserId::Sequence)
                .map_err(|_| UserIdError::NotAnInteger(raw.to_string())),
            IdFormat::ObjectId => {
                let mut bytes = [0u8; OBJECT_KEY_LEN];
                hex::decode_to_slice(raw, &mut bytes)
                    .map_err(|_| UserIdError::NotAnObjectId(raw.to_string()))?;
                Ok(UserId::Object(ObjectKey::from_bytes(bytes)))
            }
        }
    }
}

//! Per-request token correlating the artifacts of one generation

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

/// Unique identifier embedded in every file name a request produces
///
/// Backed by a UUID v7 so tokens sort by creation time, like the
/// timestamps they replace, while staying unique under concurrent requests.
/// Rendered as 32 lowercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestToken(Uuid);

impl RequestToken {
    /// Length of the rendered token
    pub const LEN: usize = 32;

    /// Create a new time-ordered token
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create a token from an existing UUID
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse a token from its 32-character hex rendering
    ///
    /// The hyphenated UUID form is rejected so that a token always maps to
    /// exactly one file name.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        if s.len() != Self::LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidToken(s.to_string()));
        }
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| DomainError::InvalidToken(s.to_string()))
    }

    /// Get the underlying UUID
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RequestToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl From<Uuid> for RequestToken {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

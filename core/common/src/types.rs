//! Common types used throughout drivemcp.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a Drive object (file or folder).
///
/// Drive ids are opaque strings. They must be non-empty, contain no
/// whitespace and be usable as a single URL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DriveId(String);

impl DriveId {
    /// Create a new DriveId from a string.
    ///
    /// # Errors
    /// - Returns error if id is empty, contains whitespace or URL delimiters
    ///   (`/`, `?`, `#`, `%`), or is a dot segment
    pub fn new(id: impl Into<String>) -> crate::Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(crate::Error::InvalidInput(
                "Drive id cannot be empty".to_string(),
            ));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(crate::Error::InvalidInput(format!(
                "Drive id cannot contain whitespace: {:?}",
                id
            )));
        }
        if id == "." || id == ".." || id.contains(['/', '?', '#', '%']) {
            return Err(crate::Error::InvalidInput(format!(
                "Drive id is not a valid path segment: {:?}",
                id
            )));
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DriveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for DriveId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DriveId {
    type Error = crate::Error;

    fn try_from(value: String) -> crate::Result<Self> {
        Self::new(value)
    }
}

impl From<DriveId> for String {
    fn from(id: DriveId) -> Self {
        id.0
    }
}

//! Validated user identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::KinshipError;

/// Longest accepted user identifier, in characters
pub const MAX_USER_ID_LENGTH: usize = 128;

/// Identifier of a user taking part in friendships, contexts or likes.
///
/// A `UserId` can only be built through [`UserId::parse`] (or the `TryFrom` /
/// `FromStr` impls that call it), so every value reaching the manager is
/// already trimmed, non-empty, at most [`MAX_USER_ID_LENGTH`] characters long
/// and free of whitespace and control characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and wrap a raw identifier
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, KinshipError> {
        let trimmed = raw.as_ref().trim();

        if trimmed.is_empty() {
            return Err(KinshipError::Validation(
                "user id cannot be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > MAX_USER_ID_LENGTH {
            return Err(KinshipError::Validation(format!(
                "user id cannot be longer than {} characters",
                MAX_USER_ID_LENGTH
            )));
        }
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(KinshipError::Validation(
                "user id cannot contain whitespace or control characters".to_string(),
            ));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for UserId {
    type Err = KinshipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = KinshipError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for UserId {
    type Error = KinshipError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl PartialEq<str> for UserId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for UserId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_surrounding_whitespace() {
        let id = UserId::parse("  alice  ").unwrap();
        assert_eq!(id.as_str(), "alice");
    }

    #[test]
    fn test_parse_rejects_empty_and_blank() {
        assert!(matches!(UserId::parse(""), Err(KinshipError::Validation(_))));
        assert!(matches!(UserId::parse("   "), Err(KinshipError::Validation(_))));
    }

    #[test]
    fn test_parse_rejects_inner_whitespace_and_control_chars() {
        assert!(UserId::parse("al ice").is_err());
        assert!(UserId::parse("bob\u{0}").is_err());
        assert!(UserId::parse("carol\u{1f}dave").is_err());
    }

    #[test]
    fn test_parse_enforces_length_limit() {
        let at_limit = "a".repeat(MAX_USER_ID_LENGTH);
        assert!(UserId::parse(&at_limit).is_ok());

        let too_long = "a".repeat(MAX_USER_ID_LENGTH + 1);
        assert!(UserId::parse(&too_long).is_err());
    }

    #[test]
    fn test_serde_rejects_invalid_ids() {
        let ok: UserId = serde_json::from_str("\"u-42\"").unwrap();
        assert_eq!(ok, "u-42");

        let err = serde_json::from_str::<UserId>("\"\"");
        assert!(err.is_err());
    }
}

//! UserKey - the email-like identifier profiles, votes and comments are keyed by

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::DomainError;

/// Identity of a signed-in account
///
/// Stored trimmed and lowercased so lookups never depend on how the
/// identity provider capitalised the address.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserKey(String);

impl UserKey {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.validate_email() {
            Ok(Self(normalized))
        } else {
            Err(DomainError::InvalidUserKey(raw.to_string()))
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part before the `@`, used as a display fallback in short labels
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserKey> for String {
    fn from(key: UserKey) -> Self {
        key.0
    }
}

impl std::str::FromStr for UserKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for UserKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        let key = UserKey::parse("  Ada@Example.COM ").unwrap();
        assert_eq!(key.as_str(), "ada@example.com");
        assert_eq!(key.local_part(), "ada");
    }

    #[test]
    fn test_parse_rejects_non_email() {
        assert!(matches!(
            UserKey::parse("not-an-email"),
            Err(DomainError::InvalidUserKey(_))
        ));
        assert!(UserKey::parse("").is_err());
    }

    #[test]
    fn test_serde_validates() {
        let key: UserKey = serde_json::from_str("\"b@c.io\"").unwrap();
        assert_eq!(key.to_string(), "b@c.io");
        assert!(serde_json::from_str::<UserKey>("\"nope\"").is_err());
    }
}

//! Caller identity types.
//!
//! The hosting runtime authenticates callers and hands the ledger an opaque
//! account identity per call. The ledger only ever compares identities for
//! equality: against a reservation's requester, or against the operator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An authenticated caller identity.
///
/// Identities are opaque non-empty strings; the library attaches no meaning
/// to their contents beyond equality.
///
/// # Examples
///
/// ```
/// use tollgate::AccountId;
///
/// let alice = AccountId::new("alice").unwrap();
/// assert_eq!(alice.as_str(), "alice");
///
/// // Whitespace is trimmed; empty identities are rejected.
/// assert!(AccountId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Creates an account identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity is empty after trimming whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidAccountError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(InvalidAccountError {
                reason: "account identity must be non-empty after trimming whitespace".into(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = InvalidAccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = InvalidAccountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

/// Error type for invalid account identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAccountError {
    /// The reason the identity is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidAccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid account identity: {}", self.reason)
    }
}

impl std::error::Error for InvalidAccountError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_basic() {
        let id = AccountId::new("alice").unwrap();
        assert_eq!(id.as_str(), "alice");
        assert_eq!(format!("{id}"), "alice");
    }

    #[test]
    fn test_account_id_trims_whitespace() {
        let id = AccountId::new("  0xAbC123  ").unwrap();
        assert_eq!(id.as_str(), "0xAbC123");
    }

    #[test]
    fn test_account_id_rejects_empty() {
        assert!(AccountId::new("").is_err());
        assert!(AccountId::new("   ").is_err());
    }

    #[test]
    fn test_account_id_equality() {
        let a = AccountId::new("alice").unwrap();
        let b = AccountId::new(" alice ").unwrap();
        let c = AccountId::new("bob").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_account_id_from_str() {
        let id: AccountId = "carol".parse().unwrap();
        assert_eq!(id.as_str(), "carol");
        assert!("".parse::<AccountId>().is_err());
    }

    #[test]
    fn test_account_id_serde() {
        let id = AccountId::new("alice").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"alice\"");
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        // Deserialization validates
        assert!(serde_json::from_str::<AccountId>("\"  \"").is_err());
    }
}

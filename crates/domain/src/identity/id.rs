//! ID logic management.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// Store-assigned identifier of a user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wraps a raw store identifier.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value object of a valid login identifier.
///
/// Login ids are case-sensitive: `c1234` and `C1234` are two accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoginId(String);

impl LoginId {
    /// Maximum login id length.
    pub const MAX_LENGTH: usize = 64;

    /// Converts a [`String`] into a valid [`LoginId`].
    ///
    /// # Errors
    ///
    /// Returns `Err` if the string is empty, longer than 64 characters
    /// or contains whitespace.
    pub fn parse(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let len = id.chars().count();
        if !(1..=Self::MAX_LENGTH).contains(&len) {
            return Err(DomainError::InvalidLoginId);
        }

        if id.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(DomainError::InvalidLoginId);
        }

        Ok(Self(id))
    }

    /// Returns the same string as a string slice `&str`.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for LoginId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_id_is_case_sensitive() {
        let lower = LoginId::parse("c1234").unwrap();
        let upper = LoginId::parse("C1234").unwrap();
        assert_ne!(lower, upper);
        assert_eq!(lower.as_str(), "c1234");
    }

    #[test]
    fn test_login_id_rejects_blank_and_spaces() {
        assert!(matches!(LoginId::parse(""), Err(DomainError::InvalidLoginId)));
        assert!(matches!(
            LoginId::parse("with space"),
            Err(DomainError::InvalidLoginId)
        ));
        assert!(LoginId::parse("a".repeat(65)).is_err());
        assert!(LoginId::parse("a".repeat(64)).is_ok());
    }
}

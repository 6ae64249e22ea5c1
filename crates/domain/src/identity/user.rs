//! User domain entity.

use serde::{Deserialize, Serialize};

use crate::auth::password::PasswordHash;
use crate::identity::id::{LoginId, UserId};

/// Capability set of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Submits inquiries and reads their answers.
    Customer,
    /// Answers inquiries of every customer.
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = crate::error::DomainError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            other => Err(crate::error::DomainError::ValidationFailed {
                field: "role".into(),
                message: format!("unknown role `{other}`"),
            }),
        }
    }
}

/// Represents a registered user within the system domain.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    /// `None` until the user store saves it for the first time.
    pub id: Option<UserId>,
    pub login_id: LoginId,
    pub password: PasswordHash,
    /// Display name.
    pub name: String,
    pub role: Role,
}

impl User {
    /// Create a new, unsaved [`User`].
    pub fn new(
        login_id: LoginId,
        password: PasswordHash,
        name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: None,
            login_id,
            password,
            name: name.into(),
            role,
        }
    }

    /// Identity kept in a session once the user is authenticated.
    ///
    /// Returns `None` for a user that was never saved.
    pub fn principal(&self) -> Option<Principal> {
        self.id.map(|id| Principal {
            id,
            name: self.name.clone(),
            role: self.role,
        })
    }
}

/// Authenticated identity, without credentials.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

impl Principal {
    #[inline]
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    #[inline]
    pub fn is_customer(&self) -> bool {
        matches!(self.role, Role::Customer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash() -> PasswordHash {
        PasswordHash::parse("$argon2id$v=19$m=65536,t=4,p=2$c2FsdA$aGFzaA").unwrap()
    }

    #[test]
    fn test_unsaved_user_has_no_principal() {
        let user = User::new(LoginId::parse("c1").unwrap(), hash(), "Customer", Role::Customer);
        assert!(user.principal().is_none());
    }

    #[test]
    fn test_principal_keeps_role() {
        let mut user = User::new(LoginId::parse("a1").unwrap(), hash(), "Admin", Role::Admin);
        user.id = Some(UserId::new(7));

        let principal = user.principal().unwrap();
        assert_eq!(principal.id, UserId::new(7));
        assert!(principal.is_admin());
        assert!(!principal.is_customer());
    }

    #[test]
    fn test_role_roundtrip_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::Customer.as_str(), "customer");
        assert!("root".parse::<Role>().is_err());
    }
}

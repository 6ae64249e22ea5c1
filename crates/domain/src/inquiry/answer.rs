//! Admin response bound to one inquiry.

use chrono::{DateTime, Utc};

use crate::identity::id::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    content: String,
    created_at: DateTime<Utc>,
    admin: UserId,
}

impl Answer {
    /// Create a new [`Answer`] authored by `admin`.
    pub fn new(
        content: impl Into<String>,
        admin: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            content: content.into(),
            created_at,
            admin,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn admin(&self) -> UserId {
        self.admin
    }
}

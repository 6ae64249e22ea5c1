//! User repository port.

use async_trait::async_trait;
use domain::identity::id::{LoginId, UserId};
use domain::identity::user::User;

use crate::error::Result;

/// Port for user persistence operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert or overwrite a user, assigning an id on first save.
    ///
    /// Fails with `ApplicationError::LoginIdTaken` when another user
    /// already owns the login id.
    async fn save(&self, user: User) -> Result<User>;

    /// Find a user by id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>>;

    /// Find a user by its exact (case-sensitive) login id.
    async fn find_by_login_id(&self, login_id: &LoginId) -> Result<Option<User>>;
}

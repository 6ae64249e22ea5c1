//! In-memory implementation for user repository.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use application::error::{ApplicationError, Result};
use application::ports::outbound::UserRepository;
use async_trait::async_trait;
use domain::identity::id::{LoginId, UserId};
use domain::identity::user::User;

use super::poisoned;

/// User repository kept in process memory.
#[derive(Default)]
pub struct MemoryUserRepository {
    sequence: AtomicI64,
    users: RwLock<BTreeMap<i64, User>>,
}

impl MemoryUserRepository {
    /// Create a new, empty [`MemoryUserRepository`].
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn save(&self, mut user: User) -> Result<User> {
        let mut users = self.users.write().map_err(poisoned)?;

        if users
            .values()
            .any(|other| other.login_id == user.login_id && other.id != user.id)
        {
            return Err(ApplicationError::LoginIdTaken(
                user.login_id.to_string(),
            ));
        }

        let id = match user.id {
            Some(id) => id,
            None => UserId::new(self.sequence.fetch_add(1, Ordering::SeqCst) + 1),
        };
        user.id = Some(id);
        users.insert(id.get(), user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(&id.get()).cloned())
    }

    async fn find_by_login_id(&self, login_id: &LoginId) -> Result<Option<User>> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users
            .values()
            .find(|user| &user.login_id == login_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use domain::auth::password::PasswordHash;
    use domain::identity::user::Role;

    use super::*;

    fn user(login_id: &str) -> User {
        User::new(
            LoginId::parse(login_id).unwrap(),
            PasswordHash::parse("$argon2id$v=19$m=65536,t=4,p=2$c2FsdA$aGFzaA")
                .unwrap(),
            "Someone",
            Role::Customer,
        )
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let repo = MemoryUserRepository::new();

        let a = repo.save(user("a")).await.unwrap();
        let b = repo.save(user("b")).await.unwrap();

        assert_eq!(a.id, Some(UserId::new(1)));
        assert_eq!(b.id, Some(UserId::new(2)));
        assert_eq!(repo.find_by_id(UserId::new(2)).await.unwrap(), Some(b));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_get_distinct_ids() {
        const TASKS: i64 = 32;
        let repo = Arc::new(MemoryUserRepository::new());

        let handles: Vec<_> = (0..TASKS)
            .map(|n| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.save(user(&format!("user{n}")))
                        .await
                        .unwrap()
                        .id
                        .unwrap()
                        .get()
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();

        assert_eq!(ids, (1..=TASKS).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_resave_keeps_id() {
        let repo = MemoryUserRepository::new();

        let mut a = repo.save(user("a")).await.unwrap();
        a.name = "Renamed".into();
        let a = repo.save(a).await.unwrap();

        assert_eq!(a.id, Some(UserId::new(1)));
        let found = repo
            .find_by_login_id(&LoginId::parse("a").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.name, "Renamed");
    }

    #[tokio::test]
    async fn test_login_id_is_unique_and_case_sensitive() {
        let repo = MemoryUserRepository::new();
        repo.save(user("c1234")).await.unwrap();

        assert!(matches!(
            repo.save(user("c1234")).await,
            Err(ApplicationError::LoginIdTaken(_))
        ));
        assert!(repo.save(user("C1234")).await.is_ok());
        assert!(
            repo.find_by_login_id(&LoginId::parse("nobody").unwrap())
                .await
                .unwrap()
                .is_none()
        );
    }
}

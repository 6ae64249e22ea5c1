//! PostgreSQL implementation for user repository.

use application::error::{ApplicationError, Result, ToInternal};
use application::ports::outbound::UserRepository;
use async_trait::async_trait;
use domain::identity::id::{LoginId, UserId};
use domain::identity::user::User;
use sqlx::PgPool;

use super::models::UserRecord;

/// PostgreSQL user repository.
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new [`PgUserRepository`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unique_violation(login_id: &LoginId) -> impl FnOnce(sqlx::Error) -> ApplicationError + '_ {
    move |err| match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApplicationError::LoginIdTaken(login_id.to_string())
        },
        _ => ApplicationError::internal(err),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn save(&self, user: User) -> Result<User> {
        let record = match user.id {
            None => sqlx::query_as::<_, UserRecord>(
                r#"
                INSERT INTO users (login_id, password, name, role)
                VALUES ($1, $2, $3, $4)
                RETURNING id, login_id, password, name, role
                "#,
            )
            .bind(user.login_id.as_str())
            .bind(user.password.as_str())
            .bind(&user.name)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(unique_violation(&user.login_id))?,
            Some(id) => sqlx::query_as::<_, UserRecord>(
                r#"
                INSERT INTO users (id, login_id, password, name, role)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (id) DO UPDATE
                SET
                    login_id = EXCLUDED.login_id,
                    password = EXCLUDED.password,
                    name = EXCLUDED.name,
                    role = EXCLUDED.role
                RETURNING id, login_id, password, name, role
                "#,
            )
            .bind(id.get())
            .bind(user.login_id.as_str())
            .bind(user.password.as_str())
            .bind(&user.name)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(unique_violation(&user.login_id))?,
        };

        record.try_into_user()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, login_id, password, name, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .catch()?;

        record.map(UserRecord::try_into_user).transpose()
    }

    async fn find_by_login_id(&self, login_id: &LoginId) -> Result<Option<User>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, login_id, password, name, role
            FROM users
            WHERE login_id = $1
            "#,
        )
        .bind(login_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .catch()?;

        record.map(UserRecord::try_into_user).transpose()
    }
}

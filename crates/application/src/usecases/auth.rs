//! Authentication use case implementation.

use std::sync::Arc;

use async_trait::async_trait;
use domain::auth::password::Password;
use domain::error::DomainError;
use domain::identity::id::LoginId;
use domain::identity::user::User;

use crate::dto::AuthRequestDto;
use crate::error::{ApplicationError, Result};
use crate::ports::inbound::Authenticate;
use crate::ports::outbound::{PasswordHasher, TelemetryPort, UserRepository};

const NO_SUCH_LOGIN_ID: &str = "no such login id";
const PASSWORD_MISMATCH: &str = "password mismatch";

/// Authentication use case service.
pub struct AuthenticateUseCase {
    user_repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    telemetry: Arc<dyn TelemetryPort>,
}

impl AuthenticateUseCase {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        telemetry: Arc<dyn TelemetryPort>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            telemetry,
        }
    }

    fn fail(&self, reason: &'static str) -> ApplicationError {
        self.telemetry.record_auth_failure(reason);
        ApplicationError::AuthenticationFailed(reason)
    }
}

#[async_trait]
impl Authenticate for AuthenticateUseCase {
    async fn execute(&self, request: AuthRequestDto) -> Result<User> {
        // A malformed login id cannot belong to anyone.
        let Ok(login_id) = LoginId::parse(request.login_id) else {
            return Err(self.fail(NO_SUCH_LOGIN_ID));
        };

        let user = self
            .user_repo
            .find_by_login_id(&login_id)
            .await?
            .ok_or_else(|| self.fail(NO_SUCH_LOGIN_ID))?;

        let password = match Password::new(request.password) {
            Ok(password) => password,
            Err(DomainError::WeakPassword { .. })
            | Err(DomainError::ValidationFailed { .. }) => {
                return Err(self.fail(PASSWORD_MISMATCH));
            },
            Err(err) => return Err(err.into()),
        };

        match self.hasher.verify(&password, &user.password) {
            Ok(()) => {},
            Err(ApplicationError::Domain(DomainError::InvalidCredentials)) => {
                return Err(self.fail(PASSWORD_MISMATCH));
            },
            Err(err) => return Err(err),
        }

        self.telemetry
            .record_auth_success(user.login_id.as_str(), user.role.as_str());

        Ok(user)
    }
}

//! Login and logout.

use application::dto::AuthRequestDto;
use application::error::ApplicationError;
use axum::Json;
use axum::extract::State;
use axum::response::Redirect;
use domain::identity::id::UserId;
use domain::identity::user::Role;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::middleware::{LOGIN_PATH, PRINCIPAL_KEY};
use crate::router::Valid;

const CUSTOMER_HOME: &str = "/cs";
const ADMIN_HOME: &str = "/cs/admin";

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(length(min = 1, max = 64, message = "Login id is required."))]
    pub login_id: String,
    #[validate(length(min = 1, max = 255, message = "Password is required."))]
    pub password: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    /// Landing page for this role.
    pub redirect: String,
}

/// Description of the login form.
pub async fn page(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": state.config.name,
        "action": LOGIN_PATH,
        "fields": ["login_id", "password"],
    }))
}

/// Handler to log in; stores the principal in the session.
pub async fn handler(
    State(state): State<AppState>,
    session: Session,
    Valid(body): Valid<Body>,
) -> Result<Json<Response>> {
    let user = state
        .auth
        .execute(AuthRequestDto {
            login_id: body.login_id,
            password: body.password,
        })
        .await?;

    let principal = user
        .principal()
        .ok_or(ApplicationError::AuthenticationFailed("user was never saved"))?;

    // New id on privilege change.
    session.cycle_id().await?;
    session.insert(PRINCIPAL_KEY, &principal).await?;

    tracing::info!(user = %principal.id, role = principal.role.as_str(), "logged in");

    let redirect = match principal.role {
        Role::Admin => ADMIN_HOME,
        Role::Customer => CUSTOMER_HOME,
    };

    Ok(Json(Response {
        id: principal.id,
        name: principal.name,
        role: principal.role,
        redirect: redirect.to_owned(),
    }))
}

/// Clear the session and go back to the login page.
pub async fn logout(session: Session) -> Result<Redirect> {
    session.flush().await?;
    Ok(Redirect::to(LOGIN_PATH))
}

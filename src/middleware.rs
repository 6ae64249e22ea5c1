//! Session gate and principal extractors.

use axum::extract::{FromRequestParts, Request};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use domain::identity::user::Principal;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::Configuration;

pub const LOGIN_PATH: &str = "/cs/login";
/// Session key holding the authenticated [`Principal`].
pub const PRINCIPAL_KEY: &str = "principal";

const SESSION_COOKIE_NAME: &str = "csboard_session";
const SESSION_EXPIRY_SECONDS: i64 = 30 * 60;

/// Paths reachable without a session.
const PUBLIC_PATHS: &[&str] = &[LOGIN_PATH, "/error", "/status.json", "/metrics"];
/// Path prefixes reachable without a session.
const PUBLIC_PREFIXES: &[&str] = &["/css/", "/js/"];
const ADMIN_PATH: &str = "/cs/admin";

/// Outcome of the session gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectToLogin,
}

/// Decide whether a request to `path` may proceed.
pub fn decide(path: &str, principal: Option<&Principal>) -> Decision {
    if PUBLIC_PATHS.contains(&path)
        || PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
    {
        return Decision::Allow;
    }

    let is_admin_path = path
        .strip_prefix(ADMIN_PATH)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));

    match principal {
        Some(principal) if is_admin_path && !principal.is_admin() => {
            Decision::RedirectToLogin
        },
        Some(_) => Decision::Allow,
        None => Decision::RedirectToLogin,
    }
}

/// Create the in-memory session layer.
pub fn session_layer(config: &Configuration) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(
            SESSION_EXPIRY_SECONDS,
        )))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

async fn principal(session: &Session) -> Option<Principal> {
    session
        .get::<Principal>(PRINCIPAL_KEY)
        .await
        .ok()
        .flatten()
}

/// Middleware redirecting to the login page when [`decide`] says so.
pub async fn gate(req: Request, next: Next) -> Response {
    let principal = match req.extensions().get::<Session>() {
        Some(session) => principal(session).await,
        None => None,
    };

    match decide(req.uri().path(), principal.as_ref()) {
        Decision::Allow => next.run(req).await,
        Decision::RedirectToLogin => {
            tracing::debug!(path = req.uri().path(), "redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        },
    }
}

/// Error returned when the session does not hold the expected principal.
#[derive(Debug)]
pub enum PrincipalRejection {
    RedirectToLogin,
    Forbidden,
}

impl IntoResponse for PrincipalRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Forbidden => StatusCode::FORBIDDEN.into_response(),
        }
    }
}

/// Extractor yielding the logged-in customer.
///
/// No session redirects to login; an admin gets 403.
pub struct CurrentCustomer(pub Principal);

impl<S> FromRequestParts<S> for CurrentCustomer
where
    S: Send + Sync,
{
    type Rejection = PrincipalRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(PrincipalRejection::RedirectToLogin)?;

        match principal(session).await {
            Some(principal) if principal.is_customer() => Ok(Self(principal)),
            Some(_) => Err(PrincipalRejection::Forbidden),
            None => Err(PrincipalRejection::RedirectToLogin),
        }
    }
}

/// Extractor yielding the logged-in admin, redirecting anyone else.
pub struct CurrentAdmin(pub Principal);

impl<S> FromRequestParts<S> for CurrentAdmin
where
    S: Send + Sync,
{
    type Rejection = PrincipalRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(PrincipalRejection::RedirectToLogin)?;

        match principal(session).await {
            Some(principal) if principal.is_admin() => Ok(Self(principal)),
            _ => Err(PrincipalRejection::RedirectToLogin),
        }
    }
}

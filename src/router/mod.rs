//! HTTP routes of the inquiry board.

pub mod admin;
pub mod customer;
pub mod files;
pub mod login;
pub mod status;

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::routing::get;
use axum::{Json, Router};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::AppState;
use crate::error::ServerError;

/// JSON body validated with [`validator`].
pub struct Valid<T>(pub T);

impl<T, S> FromRequest<S> for Valid<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Query string extractor rejecting with [`ServerError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ServerError))]
pub struct Query<T>(pub T);

/// Path extractor rejecting with [`ServerError`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServerError))]
pub struct Path<T>(pub T);

/// Rejects empty or whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Build a single-field validation failure.
pub fn field_error(field: &'static str, message: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(field, ValidationError::new(field).with_message(message.into()));
    errors
}

/// Every route, before middleware.
pub fn router() -> Router<AppState> {
    Router::new()
        // `GET /status.json` goes to `status`.
        .route("/status.json", get(status::status))
        .route("/metrics", get(status::metrics))
        .route("/error", get(status::error))
        .route("/cs/login", get(login::page).post(login::handler))
        .route("/cs/logout", get(login::logout))
        .route("/cs", get(customer::list))
        .route("/cs/inquiry", get(customer::form).post(customer::create))
        .route("/cs/inquiry/{id}", get(customer::detail))
        .route("/cs/admin", get(admin::queue))
        .route("/cs/admin/answer", get(admin::detail).post(admin::answer))
        .route("/files/{filename}", get(files::download))
}

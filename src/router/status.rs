//! Public status, metrics and error pages.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::middleware::LOGIN_PATH;

/// Structured configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct Status {
    pub name: String,
    pub version: String,
}

/// Public server status.
pub async fn status(State(state): State<AppState>) -> Json<Status> {
    Json(Status {
        name: state.config.name.clone(),
        version: state.config.version().to_owned(),
    })
}

/// Prometheus exposition, when a recorder is installed.
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Generic error landing page.
pub async fn error() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "title": "Something went wrong.",
        "login": LOGIN_PATH,
    }))
}

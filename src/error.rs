//! Error handler for csboard.

use application::error::ApplicationError;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

pub type Result<T> = std::result::Result<T, ServerError>;

/// Enum representing server-side errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("validation error occurred")]
    Validation(#[from] ValidationErrors),

    #[error("error parsing form data")]
    ParsingForm(#[from] MultipartError),

    #[error(transparent)]
    Axum(#[from] JsonRejection),

    #[error(transparent)]
    Query(#[from] QueryRejection),

    #[error(transparent)]
    Path(#[from] PathRejection),

    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("session store failed: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("file not found")]
    FileNotFound,
}

/// Structure for detailed error responses.
#[derive(Debug, Serialize)]
pub struct ResponseError {
    r#type: Option<String>,
    title: String,
    status: u16,
    detail: String,
    instance: Option<String>,
    errors: Option<Vec<FieldError>>,
}

impl ResponseError {
    /// Update error status code.
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code.as_u16();
        self
    }

    /// Update `title` field.
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.into();
        self
    }

    /// Add detailed error.
    pub fn details(mut self, description: &str) -> Self {
        self.detail = description.into();
        self
    }

    /// Automatically add errors field.
    pub fn errors(mut self, errors: &ValidationErrors) -> Self {
        self.errors = Some(parse_validation_errors(errors));
        self
    }

    /// Transform [`ResponseError`] into axum [`Response`].
    pub fn into_response(
        self,
    ) -> std::result::Result<Response, axum::http::Error> {
        if let Ok(body) = serde_json::to_string(&self) {
            Response::builder()
                .status(self.status)
                .header(header::CONTENT_TYPE, "application/problem+json")
                .body(body.into())
        } else {
            Ok(internal_server_error())
        }
    }
}

impl Default for ResponseError {
    fn default() -> Self {
        Self {
            r#type: None,
            title: "Internal server error.".to_owned(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail: String::default(),
            instance: None,
            errors: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

fn parse_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues.iter().map(move |issue| FieldError {
                field: field.to_string(),
                message: issue.to_string(),
            })
        })
        .collect()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let response = ResponseError::default()
            .title("There were validation errors with your request.")
            .details(&self.to_string())
            .status(StatusCode::BAD_REQUEST);

        let response = match &self {
            ServerError::Validation(validation_errors) => {
                response.errors(validation_errors)
            },

            ServerError::ParsingForm(err) => response
                .title("Server error during data parsing.")
                .details(&err.body_text())
                .status(err.status()),

            ServerError::Axum(rejection) => response
                .details(&rejection.body_text())
                .status(rejection.status()),

            ServerError::Query(rejection) => response
                .details(&rejection.body_text())
                .status(rejection.status()),

            ServerError::Path(rejection) => response
                .details(&rejection.body_text())
                .status(rejection.status()),

            ServerError::Application(err) => application_error(response, err),

            ServerError::FileNotFound => response
                .title("Attachment not found.")
                .status(StatusCode::NOT_FOUND),

            ServerError::Session(err) => {
                tracing::error!(error = %err, "server returned 500 status");

                ResponseError::default()
            },
        };

        response
            .into_response()
            .unwrap_or_else(|_| internal_server_error())
    }
}

fn application_error(
    response: ResponseError,
    err: &ApplicationError,
) -> ResponseError {
    match err {
        ApplicationError::AuthenticationFailed(_) => response
            .title("Invalid login id or password.")
            // The precise reason is not disclosed.
            .details("")
            .status(StatusCode::UNAUTHORIZED),
        ApplicationError::InquiryNotFound(_) => response
            .title("Inquiry not found.")
            .status(StatusCode::NOT_FOUND),
        ApplicationError::AccessDenied => response
            .title("You are not allowed to access this inquiry.")
            .status(StatusCode::FORBIDDEN),
        ApplicationError::InvalidFileType(_)
        | ApplicationError::InvalidFilename => {
            response.title("Attachment rejected.")
        },
        ApplicationError::LoginIdTaken(_) => response
            .title("Login id already exists.")
            .status(StatusCode::CONFLICT),
        ApplicationError::Domain(_) => response,
        ApplicationError::StorageFailure(source) => {
            tracing::error!(error = %source, "server returned 500 status");

            ResponseError::default()
        },
        ApplicationError::Internal(source) => {
            tracing::error!(error = %source, "server returned 500 status");

            ResponseError::default()
        },
    }
}

fn internal_server_error() -> Response {
    Response::builder()
        .status(StatusCode::INTERNAL_SERVER_ERROR)
        .header(header::CONTENT_TYPE, "application/problem+json")
        .body(
            serde_json::json!({
                "type": null,
                "title": "Internal server error.",
                "status": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                "detail": null,
                "instance": null,
                "errors": null,
            })
            .to_string()
            .into(),
        )
        .unwrap_or_else(|_| Response::new("Internal server error".into()))
}

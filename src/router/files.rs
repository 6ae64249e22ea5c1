//! Attachment download.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use domain::inquiry::ImageType;

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::router::Path;

/// `GET /files/{filename}`: raw bytes of a stored attachment.
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response> {
    let bytes = state
        .attachments
        .open(&filename)
        .await?
        .ok_or(ServerError::FileNotFound)?;

    Ok(([(header::CONTENT_TYPE, content_type(&filename))], bytes).into_response())
}

/// Guess the content type from the file extension.
fn content_type(filename: &str) -> &'static str {
    filename
        .rsplit_once('.')
        .and_then(|(_, ext)| ImageType::from_extension(ext))
        .map_or("application/octet-stream", |image| image.mime())
}

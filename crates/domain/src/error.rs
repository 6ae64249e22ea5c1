//! Custom error handler for domain (core).

pub type Result<T> = std::result::Result<T, DomainError>;

/// Enum representing custom domain errors.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("login id must be between 1 and 64 characters without whitespace")]
    InvalidLoginId,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password must be at least {min_length} characters")]
    WeakPassword { min_length: usize },

    #[error("unknown inquiry category `{0}`")]
    UnknownCategory(String),
    #[error("content type `{0}` is not an allowed image type")]
    UnsupportedContentType(String),
    #[error("filename is empty or escapes the upload directory")]
    InvalidFilename,

    #[error("{field}: {message}")]
    ValidationFailed { field: String, message: String },
}

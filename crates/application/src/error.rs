//! Application-level errors.

use domain::error::DomainError;
use domain::inquiry::InquiryId;

pub type Result<T> = std::result::Result<T, ApplicationError>;

/// Errors that can occur in the application layer.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(&'static str),
    #[error("login id `{0}` is already taken")]
    LoginIdTaken(String),

    #[error("inquiry {0} not found")]
    InquiryNotFound(InquiryId),
    #[error("access to this inquiry is denied")]
    AccessDenied,

    #[error("only GIF, JPEG and PNG images can be attached, got `{0}`")]
    InvalidFileType(String),
    #[error("attachment filename is invalid")]
    InvalidFilename,
    #[error("failed to store attachment")]
    StorageFailure(#[source] std::io::Error),

    #[error("internal server error")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

impl ApplicationError {
    pub fn internal<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Internal(Box::new(err))
    }
}

pub trait ToInternal<T> {
    fn catch(self) -> Result<T>;
}

impl<T, E> ToInternal<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn catch(self) -> Result<T> {
        self.map_err(|e| ApplicationError::Internal(Box::new(e)))
    }
}

//! In-memory repositories.
//!
//! Each repository owns its own id sequence. Locks are never held across
//! an `.await`.

mod inquiry_repository;
mod user_repository;

pub use inquiry_repository::MemoryInquiryRepository;
pub use user_repository::MemoryUserRepository;

use application::error::ApplicationError;

fn poisoned<T>(_: std::sync::PoisonError<T>) -> ApplicationError {
    ApplicationError::internal(std::io::Error::other("repository lock poisoned"))
}

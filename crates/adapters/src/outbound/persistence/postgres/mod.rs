//! PostgreSQL repositories.

mod inquiry_repository;
mod models;
mod user_repository;

pub use inquiry_repository::PgInquiryRepository;
pub use user_repository::PgUserRepository;

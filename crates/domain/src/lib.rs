//! Entities and value objects of the inquiry board.

pub mod auth;
pub mod error;
pub mod identity;
pub mod inquiry;

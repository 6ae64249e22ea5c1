//! Application services implementing business logic.

pub mod attachment;
pub mod auth;
pub mod inquiry;

pub use attachment::*;
pub use auth::*;
pub use inquiry::*;

#[cfg(test)]
pub(crate) mod fakes;

//! These traits define what the application can do.

pub mod auth;
pub mod inquiry;

pub use auth::*;
pub use inquiry::*;

//! Identity domain: users, roles and their identifiers.

pub mod id;
pub mod user;

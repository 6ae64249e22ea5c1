//! Use cases of the inquiry board and the ports they need.

pub mod dto;
pub mod error;
pub mod ports;
pub mod usecases;

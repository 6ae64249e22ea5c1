//! Adapters connecting the application ports to the outside world.

pub mod outbound;

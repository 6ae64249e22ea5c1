//! Ports of the hexagon.

pub mod inbound;
pub mod outbound;

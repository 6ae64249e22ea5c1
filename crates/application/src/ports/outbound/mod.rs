//! These traits define what the application needs from the outside world.

pub mod clock;
pub mod crypto;
pub mod inquiry;
pub mod storage;
pub mod telemetry;
pub mod user;

pub use clock::*;
pub use crypto::*;
pub use inquiry::*;
pub use storage::*;
pub use telemetry::*;
pub use user::*;

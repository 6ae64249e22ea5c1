//! Clock port - Interface for time operations.

use chrono::{DateTime, Utc};

/// Port for getting the current time.
pub trait Clock: Send + Sync {
    /// Get the current UTC instant.
    fn now(&self) -> DateTime<Utc>;
}

//! Interface for observability.

/// Port for telemetry/observability operations.
pub trait TelemetryPort: Send + Sync {
    /// Record a successful authentication.
    fn record_auth_success(&self, login_id: &str, role: &str);

    /// Record a failed authentication attempt.
    fn record_auth_failure(&self, reason: &str);

    /// Record a new inquiry.
    fn record_inquiry_created(&self, inquiry_id: i64, attachments: usize);

    /// Record an answer, `overwritten` when it replaced a previous one.
    fn record_answer_added(&self, inquiry_id: i64, overwritten: bool);

    /// Record a denied access to an inquiry.
    fn record_access_denied(&self, inquiry_id: i64, user_id: i64);
}

//! Telemetry adapters - Observability implementations.

use application::ports::outbound::TelemetryPort;

/// Tracing-based telemetry adapter.
#[derive(Default)]
pub struct TracingTelemetry;

impl TracingTelemetry {
    /// Create a new [`TracingTelemetry`].
    pub fn new() -> Self {
        Self
    }
}

impl TelemetryPort for TracingTelemetry {
    fn record_auth_success(&self, login_id: &str, role: &str) {
        tracing::info!(login_id, role, "authentication successful");
    }

    fn record_auth_failure(&self, reason: &str) {
        tracing::info!(reason, "authentication failed");
    }

    fn record_inquiry_created(&self, inquiry_id: i64, attachments: usize) {
        tracing::debug!(inquiry_id, attachments, "inquiry recorded");
    }

    fn record_answer_added(&self, inquiry_id: i64, overwritten: bool) {
        tracing::debug!(inquiry_id, overwritten, "answer recorded");
    }

    fn record_access_denied(&self, inquiry_id: i64, user_id: i64) {
        tracing::warn!(inquiry_id, user_id, "inquiry access denied");
    }
}

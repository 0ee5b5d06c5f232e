use super::JobId;

/// Envelope for a vendor push notification, consumed exactly once by the
/// callback reconciler and then discarded.
#[derive(Debug, Clone)]
pub struct CallbackNotification {
    pub job_id: JobId,
    /// Which provider variant emitted the callback. Used as a fallback for
    /// provider resolution and for diagnostics; the persisted job remains
    /// authoritative.
    pub provider_name: String,
    /// Opaque vendor payload. Never interpreted here; the reconciler asks
    /// the owning provider for authoritative status instead.
    pub payload: serde_json::Value,
}

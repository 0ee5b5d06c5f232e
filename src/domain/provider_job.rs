use std::collections::HashMap;

use super::JobStatus;

/// A vendor's live view of a job, as returned by a provider status query.
///
/// Not persisted directly; the reconciler folds it into the stored [`Job`]
/// via [`Job::apply_snapshot`].
///
/// [`Job`]: super::Job
/// [`Job::apply_snapshot`]: super::Job::apply_snapshot
#[derive(Debug, Clone)]
pub struct ProviderJob {
    /// Vendor-side identifier the snapshot was queried with.
    pub id: String,
    /// Canonical status; each provider maps its own vocabulary before
    /// returning.
    pub status: JobStatus,
    /// Human-readable vendor detail, e.g. a version label.
    pub details: String,
    /// Additional vendor fields needed by later logic.
    pub params: HashMap<String, String>,
}

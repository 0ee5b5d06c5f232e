use std::fmt;

use super::JobId;

/// Storage key for a finished caption artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactKey(String);

impl ArtifactKey {
    pub fn new(job_id: JobId, format: &str) -> Self {
        Self(format!("{}/{}", job_id.as_uuid(), format))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("metadata tool '{tool}' could not be started: {source}")]
    Unavailable {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("metadata tool exited with {status}: {stderr}")]
    ToolFailed { status: String, stderr: String },
}

pub trait MetadataPropagator: Send + Sync {
    /// Copies every metadata tag of `source` onto `target`, rewriting `target` in place.
    fn propagate(&self, source: &Path, target: &Path) -> Result<(), MetadataError>;
}

/// Leaves artifacts untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPropagator;

impl MetadataPropagator for NoopPropagator {
    fn propagate(&self, _source: &Path, _target: &Path) -> Result<(), MetadataError> {
        Ok(())
    }
}

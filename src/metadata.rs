//! Metadata propagation
//!
//! Copies the tags of an uploaded RAW file onto a derived artifact. Propagation is
//! best-effort: callers log a [`MetadataError`] and keep the artifact.

mod exiftool;
mod propagator;

pub use exiftool::ExifToolPropagator;
pub use propagator::{MetadataError, MetadataPropagator, NoopPropagator};

//! Pipeline conversions module
//!
//! This module contains the orchestration of decode, crop and encode steps.

mod raw_crop;

#[cfg(test)]
mod tests;

pub use raw_crop::{ArtifactPipeline, CropArtifacts, RawCropPipeline};

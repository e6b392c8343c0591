//! On-disk storage for uploaded RAW files and the artifacts derived from them.

mod filesystem;
pub mod types;

#[cfg(test)]
mod tests;

pub use filesystem::{AssetStore, is_valid_name, sanitize_filename};
pub use types::{DerivedArtifact, Namespace, RawAsset};

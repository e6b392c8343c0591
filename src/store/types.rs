use std::fmt;
use std::path::PathBuf;

use crate::image_pipeline::RawFormat;

/// The two disjoint storage areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Uploaded RAW files, byte-for-byte.
    Originals,
    /// Previews and crops produced from originals.
    Derived,
}

impl Namespace {
    pub const ALL: [Namespace; 2] = [Self::Originals, Self::Derived];

    /// Directory name under the store root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Originals => "uploads",
            Self::Derived => "processed",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// An uploaded RAW file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAsset {
    /// The stored name, `<uuid>_<original filename>`.
    pub id: String,
    pub original_filename: String,
    pub format: RawFormat,
    pub path: PathBuf,
}

/// A file produced from an original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedArtifact {
    pub name: String,
    pub path: PathBuf,
}

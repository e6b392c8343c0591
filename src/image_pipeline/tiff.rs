//! TIFF writing module
//!
//! The cropped sensor plane is stored as a 16-bit grayscale TIFF, the container family
//! NEF, CR2, ARW and DNG all build on.

mod writer;
mod standard_tiff_writer;
pub mod types;

pub use writer::TiffWriter;
pub use standard_tiff_writer::StandardTiffWriter;
pub use types::{TiffCompression, ArtifactConfig, ArtifactConfigBuilder};

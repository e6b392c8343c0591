//! Preview encoding module
//!
//! Colour frames are delivered to the browser as baseline JPEG.

mod jpeg_writer;

pub use jpeg_writer::{JpegPreviewWriter, PreviewWriter};

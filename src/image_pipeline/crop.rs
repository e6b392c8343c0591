//! Crop engine
//!
//! Pure sub-array extraction shared by the sensor plane and the colour plane.
//! Values are copied verbatim: no interpolation, no resampling.

mod engine;
pub mod types;


pub use engine::{PixelGrid, crop, extract};
pub use types::{CropRect, Region};

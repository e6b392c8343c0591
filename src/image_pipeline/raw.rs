//! RAW image reading module
//!
//! This module provides format-agnostic RAW image reading capabilities.

mod reader;
mod rawloader_reader;
pub mod types;

pub use reader::{DecodedRaw, RawImageReader};
pub use rawloader_reader::RawLoaderReader;
pub use types::{BayerPattern, Calibration, RawFormat, SensorFrame};

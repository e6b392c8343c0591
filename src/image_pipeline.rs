//! Image processing pipeline module
//!
//! This module turns an uploaded RAW file into crop artifacts, with separate modules
//! for RAW reading, colour reconstruction, cropping, artifact encoding and orchestration.

pub mod raw;
pub mod debayer;
pub mod crop;
pub mod tiff;
pub mod preview;
pub mod conversions;
pub mod common;

pub use common::{
    PipelineError,
    Result,
};

pub use raw::{
    BayerPattern,
    Calibration,
    DecodedRaw,
    RawFormat,
    RawImageReader,
    RawLoaderReader,
    SensorFrame,
};

pub use debayer::{
    ColorFrame,
    CpuDebayer,
};

pub use crop::{
    CropRect,
    PixelGrid,
    Region,
};

pub use tiff::{
    TiffCompression,
    ArtifactConfig,
    ArtifactConfigBuilder,
    TiffWriter,
    StandardTiffWriter,
};

pub use preview::{
    JpegPreviewWriter,
    PreviewWriter,
};

pub use conversions::{
    ArtifactPipeline,
    CropArtifacts,
    RawCropPipeline,
};

//! Shared fixtures for unit tests.
//!
//! Real RAW files are large and camera specific, so most tests run the pipeline on a
//! synthetic reader whose frames are a deterministic gradient of known size.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::image_pipeline::{
    ArtifactConfig, ColorFrame, JpegPreviewWriter, PipelineError, RawCropPipeline,
    RawImageReader, Result, SensorFrame, StandardTiffWriter,
};
use crate::metadata::{MetadataError, MetadataPropagator};

/// Input bytes starting with this prefix fail to decode.
pub const CORRUPT_PREFIX: &[u8] = b"corrupt";

/// Some bytes the synthetic reader accepts, standing in for a RAW container.
pub const FAKE_RAW: &[u8] = b"FAKE-RAW-CONTAINER\x00\x01\x02\x03";

/// Decodes any input into a `width` x `height` gradient.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticReader {
    pub width: usize,
    pub height: usize,
}

impl SyntheticReader {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }
}

/// The sample the synthetic reader places at `(x, y)`.
pub fn synthetic_sample(width: usize, x: usize, y: usize) -> u16 {
    ((y * width + x) % 16384) as u16
}

impl RawImageReader for SyntheticReader {
    fn extract_sensor_plane(&self, data: &[u8]) -> Result<SensorFrame> {
        if data.is_empty() || data.starts_with(CORRUPT_PREFIX) {
            return Err(PipelineError::DecodeError("not a RAW container".to_string()));
        }

        let samples = (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .map(|(x, y)| synthetic_sample(self.width, x, y))
            .collect();
        Ok(SensorFrame::new(self.width, self.height, samples, 14))
    }

    fn develop(&self, sensor: &SensorFrame) -> Result<ColorFrame> {
        let data = sensor
            .data
            .iter()
            .flat_map(|&v| {
                let low = (v & 0xff) as u8;
                [low, low.wrapping_add(1), low.wrapping_add(2)]
            })
            .collect();
        Ok(ColorFrame::new(sensor.width, sensor.height, data))
    }
}

pub type SyntheticPipeline = RawCropPipeline<SyntheticReader, StandardTiffWriter, JpegPreviewWriter>;

pub fn synthetic_pipeline(width: usize, height: usize) -> SyntheticPipeline {
    RawCropPipeline::with_custom(
        SyntheticReader::new(width, height),
        StandardTiffWriter,
        JpegPreviewWriter,
        ArtifactConfig::default(),
    )
}

/// Records every call and succeeds.
#[derive(Debug, Default, Clone)]
pub struct RecordingPropagator {
    pub calls: Arc<Mutex<Vec<(PathBuf, PathBuf)>>>,
}

impl MetadataPropagator for RecordingPropagator {
    fn propagate(&self, source: &Path, target: &Path) -> std::result::Result<(), MetadataError> {
        self.calls
            .lock()
            .unwrap()
            .push((source.to_path_buf(), target.to_path_buf()));
        Ok(())
    }
}

/// Always fails as if the external tool were not installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingPropagator;

impl MetadataPropagator for FailingPropagator {
    fn propagate(&self, _source: &Path, _target: &Path) -> std::result::Result<(), MetadataError> {
        Err(MetadataError::Unavailable {
            tool: "exiftool".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
        })
    }
}

/// Reads the dimensions and samples of a 16-bit TIFF payload.
pub fn read_sensor_tiff(bytes: &[u8]) -> (u32, u32, Vec<u16>) {
    let mut decoder = tiff::decoder::Decoder::new(std::io::Cursor::new(bytes)).unwrap();
    let (width, height) = decoder.dimensions().unwrap();
    match decoder.read_image().unwrap() {
        tiff::decoder::DecodingResult::U16(data) => (width, height, data),
        _ => panic!("expected 16-bit samples"),
    }
}

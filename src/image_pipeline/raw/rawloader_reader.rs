//! RAW image reader implementation using the rawloader library.
//!
//! This module provides support for reading the RAW formats accepted for upload
//! (NEF, CR2, ARW, DNG) using the rawloader library. It decodes the sensor data,
//! trims it to the visible area, and gathers the calibration the colour path needs.

use std::io::Cursor;

use rawloader::RawImageData as RawloaderImageData;
use tracing::{debug, warn};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::crop::{self, Region};
use crate::image_pipeline::debayer::{ColorFrame, CpuDebayer};
use crate::image_pipeline::raw::reader::RawImageReader;
use crate::image_pipeline::raw::types::{
    BayerPattern, Calibration, GREEN, SensorFrame,
};

/// RAW image reader that uses the rawloader library for decoding.
///
/// Colour reconstruction is delegated to [`CpuDebayer`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RawLoaderReader;

/// Default bit depth when no white level information is available from the RAW file.
const DEFAULT_BITS_PER_SAMPLE: u32 = 16;

/// The bit width of the u16 data type, used for calculating actual bits per sample.
const U16_BITS: u32 = 16;

/// Linear sRGB (D65) to XYZ.
const SRGB_TO_XYZ: [[f32; 3]; 3] = [
    [0.412_453, 0.357_580, 0.180_423],
    [0.212_671, 0.715_160, 0.072_169],
    [0.019_334, 0.119_193, 0.950_227],
];

impl RawImageReader for RawLoaderReader {
    /// Reads the visible sensor plane from a RAW file held in memory.
    ///
    /// This method:
    /// 1. Decodes the RAW file using rawloader
    /// 2. Converts the data to u16 format (handles both integer and float RAW data)
    /// 3. Drops the masked border the decoder reports through its crop margins
    /// 4. Calculates the actual bits per sample from the sensor's white level metadata
    ///
    /// # Returns
    ///
    /// * `Ok(SensorFrame)` - The visible area with its calibration
    /// * `Err(PipelineError::DecodeError)` - The bytes are not a decodable mosaiced RAW file
    fn extract_sensor_plane(&self, data: &[u8]) -> Result<SensorFrame> {
        debug!("Decoding RAW image, {} bytes", data.len());

        let decoded = rawloader::decode(&mut Cursor::new(data))
            .map_err(|e| PipelineError::DecodeError(e.to_string()))?;

        let width = decoded.width;
        let height = decoded.height;

        debug!(
            "Decoded {} {}: {}x{}, cfa={}",
            decoded.make, decoded.model, width, height, decoded.cfa.name
        );

        if decoded.cpp != 1 {
            return Err(PipelineError::DecodeError(format!(
                "expected a single-channel mosaiced sensor, found {} components per pixel",
                decoded.cpp
            )));
        }

        // Integer data is used as-is, float data (normalized 0.0-1.0) is scaled to u16 range
        let (samples, black_level, white_level) = match decoded.data {
            RawloaderImageData::Integer(values) => (
                values,
                decoded.blacklevels[0],
                decoded.whitelevels.iter().max().copied().unwrap_or(u16::MAX),
            ),
            RawloaderImageData::Float(values) => (
                values
                    .iter()
                    .map(|&v| (v.clamp(0.0, 1.0) * u16::MAX as f32) as u16)
                    .collect(),
                0,
                u16::MAX,
            ),
        };

        if samples.len() != width * height {
            return Err(PipelineError::DecodeError(format!(
                "decoder returned {} samples for a {}x{} sensor",
                samples.len(),
                width,
                height
            )));
        }

        // The white level is the largest value the sensor can produce, which gives the
        // bit depth actually used (4095 -> 12 bits, 16383 -> 14 bits).
        let bits_per_sample = if white_level == 0 {
            DEFAULT_BITS_PER_SAMPLE
        } else {
            U16_BITS - white_level.leading_zeros()
        };

        debug!(
            "Calculated bits_per_sample: {} (white level: {}, black level: {})",
            bits_per_sample, white_level, black_level
        );

        let calibration = Calibration {
            pattern: sensor_pattern(&decoded.cfa),
            black_level,
            white_level: white_level.max(black_level.saturating_add(1)),
            wb_coeffs: normalized_wb(decoded.wb_coeffs),
            cam_to_srgb: camera_to_srgb(&decoded.xyz_to_cam),
        };

        let full = SensorFrame {
            width,
            height,
            data: samples,
            bits_per_sample,
            calibration,
        };

        let visible = visible_region(width, height, decoded.crops)?;
        if visible.x == 0 && visible.y == 0 && visible.width == width && visible.height == height {
            return Ok(full);
        }

        debug!(
            "Trimming to visible area {}x{} at ({}, {})",
            visible.width, visible.height, visible.x, visible.y
        );
        Ok(crop::extract(&full, &visible))
    }

    fn develop(&self, sensor: &SensorFrame) -> Result<ColorFrame> {
        CpuDebayer::new().process(sensor)
    }
}

/// Converts rawloader's `[top, right, bottom, left]` margins into the visible region.
fn visible_region(width: usize, height: usize, crops: [usize; 4]) -> Result<Region> {
    let [top, right, bottom, left] = crops;
    let visible_width = width.saturating_sub(left + right);
    let visible_height = height.saturating_sub(top + bottom);

    if visible_width == 0 || visible_height == 0 {
        return Err(PipelineError::InvalidDimensions(visible_width, visible_height));
    }

    Ok(Region {
        x: left,
        y: top,
        width: visible_width,
        height: visible_height,
    })
}

fn sensor_pattern(cfa: &rawloader::CFA) -> BayerPattern {
    let mut colors = [[0u8; 2]; 2];
    for (row, line) in colors.iter_mut().enumerate() {
        for (col, color) in line.iter_mut().enumerate() {
            // The fourth colour of RGBE sensors is the second green.
            *color = match cfa.color_at(row, col) {
                c @ 0..=2 => c as u8,
                _ => GREEN,
            };
        }
    }

    BayerPattern::from_colors(colors).unwrap_or_else(|| {
        warn!("Unrecognised CFA '{}', assuming RGGB", cfa.name);
        BayerPattern::Rggb
    })
}

fn normalized_wb(coeffs: [f32; 4]) -> [f32; 3] {
    let green = coeffs[1];
    if !green.is_finite() || green <= 0.0 {
        return [1.0, 1.0, 1.0];
    }

    let mut out = [1.0f32; 3];
    for (dst, &src) in out.iter_mut().zip(coeffs.iter()) {
        let ratio = src / green;
        if ratio.is_finite() && ratio > 0.0 {
            *dst = ratio;
        }
    }
    out
}

/// Builds the camera to linear sRGB matrix from the decoder's XYZ to camera matrix.
///
/// The camera to sRGB product is row-normalised before inversion so that a neutral
/// camera response stays neutral. Returns `None` for unprofiled cameras.
pub(crate) fn camera_to_srgb(xyz_to_cam: &[[f32; 3]; 4]) -> Option<[[f32; 3]; 3]> {
    let mut cam_rgb = [[0.0f32; 3]; 3];
    for (row, out_row) in cam_rgb.iter_mut().enumerate() {
        for (col, out) in out_row.iter_mut().enumerate() {
            *out = (0..3).map(|k| xyz_to_cam[row][k] * SRGB_TO_XYZ[k][col]).sum();
        }
    }

    for row in cam_rgb.iter_mut() {
        let sum: f32 = row.iter().sum();
        if sum.abs() < f32::EPSILON {
            return None;
        }
        for value in row.iter_mut() {
            *value /= sum;
        }
    }

    invert3(&cam_rgb)
}

fn invert3(m: &[[f32; 3]; 3]) -> Option<[[f32; 3]; 3]> {
    let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);

    if !det.is_finite() || det.abs() < 1e-9 {
        return None;
    }

    let inv = 1.0 / det;
    Some([
        [
            (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv,
            (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv,
            (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv,
        ],
        [
            (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv,
            (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv,
            (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv,
        ],
        [
            (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv,
            (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv,
            (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv,
        ],
    ])
}

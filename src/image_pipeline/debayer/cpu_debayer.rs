use std::io::Cursor;

use bayer::{BayerDepth, Demosaic, RasterDepth, RasterMut};
use tracing::{debug, info};

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::types::ColorFrame;
use crate::image_pipeline::raw::types::SensorFrame;

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Resolution of the gamma lookup table.
const GAMMA_STEPS: usize = 4096;

/// Develops a sensor plane into an 8-bit sRGB image on the CPU.
///
/// Black level -> white balance -> linear demosaic -> camera matrix -> sRGB gamma.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpuDebayer;

impl CpuDebayer {
    pub fn new() -> Self {
        Self
    }

    pub fn process(&self, raw_image: &SensorFrame) -> Result<ColorFrame> {
        let width = raw_image.width;
        let height = raw_image.height;
        info!("Starting CPU debayering for image {}x{}", width, height);

        if width < 2 || height < 2 || raw_image.data.len() != width * height {
            return Err(PipelineError::InvalidDimensions(width, height));
        }

        // Determine bit depth - bayer crate only supports 8 and 16 bit
        let (bayer_depth, raster_depth, bytes_per_pixel) = if raw_image.bits_per_sample <= 8 {
            (BayerDepth::Depth8, RasterDepth::Depth8, 1)
        } else {
            (BayerDepth::Depth16LE, RasterDepth::Depth16, 2)
        };

        let bayer_bytes: Vec<u8> = if bytes_per_pixel == 1 {
            raw_image.data.iter().map(|&val| val.min(u8::MAX as u16) as u8).collect()
        } else {
            raw_image.data.iter().flat_map(|&val| val.to_le_bytes()).collect()
        };

        let mut output_buf = vec![0u8; width * height * 3 * bytes_per_pixel];
        let cfa = raw_image.calibration.pattern.to_bayer_cfa();

        debug!(
            "Running demosaic with depth={:?}, CFA={:?}, algo=Linear",
            bayer_depth, raw_image.calibration.pattern
        );

        {
            let mut output_raster = RasterMut::new(width, height, raster_depth, &mut output_buf);
            bayer::run_demosaic(
                &mut Cursor::new(&bayer_bytes[..]),
                bayer_depth,
                cfa,
                Demosaic::Linear,
                &mut output_raster,
            )
            .map_err(|e| PipelineError::DecodeError(format!("demosaic failed: {:?}", e)))?;
        }

        let calibration = &raw_image.calibration;
        let black_level = calibration.black_level as f32;
        let range = (calibration.white_level as f32 - black_level).max(1.0);
        let wb = calibration.wb_coeffs;
        let matrix = calibration.cam_to_srgb.unwrap_or(IDENTITY);
        let gamma = gamma_table();

        let data: Vec<u8> = output_buf
            .chunks_exact(bytes_per_pixel * 3)
            .flat_map(|pixel_bytes| {
                let raw = if bytes_per_pixel == 1 {
                    [pixel_bytes[0] as f32, pixel_bytes[1] as f32, pixel_bytes[2] as f32]
                } else {
                    [
                        u16::from_ne_bytes([pixel_bytes[0], pixel_bytes[1]]) as f32,
                        u16::from_ne_bytes([pixel_bytes[2], pixel_bytes[3]]) as f32,
                        u16::from_ne_bytes([pixel_bytes[4], pixel_bytes[5]]) as f32,
                    ]
                };

                // Clipped highlights stay white instead of tinting after the matrix.
                let mut linear = [0.0f32; 3];
                for c in 0..3 {
                    linear[c] = ((raw[c] - black_level).max(0.0) / range * wb[c]).min(1.0);
                }

                let mut out = [0u8; 3];
                for (c, value) in out.iter_mut().enumerate() {
                    let mixed = matrix[c][0] * linear[0]
                        + matrix[c][1] * linear[1]
                        + matrix[c][2] * linear[2];
                    let index = (mixed.clamp(0.0, 1.0) * (GAMMA_STEPS - 1) as f32).round() as usize;
                    *value = gamma[index];
                }
                out
            })
            .collect();

        Ok(ColorFrame {
            width,
            height,
            data,
        })
    }
}

/// Linear [0, 1] to 8-bit sRGB.
fn gamma_table() -> Vec<u8> {
    (0..GAMMA_STEPS)
        .map(|i| {
            let v = i as f32 / (GAMMA_STEPS - 1) as f32;
            let encoded = if v <= 0.003_130_8 {
                12.92 * v
            } else {
                1.055 * v.powf(1.0 / 2.4) - 0.055
            };
            (encoded * 255.0).round().clamp(0.0, 255.0) as u8
        })
        .collect()
}

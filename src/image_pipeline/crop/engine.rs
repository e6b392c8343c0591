use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::crop::types::{CropRect, Region};
use crate::image_pipeline::debayer::types::ColorFrame;
use crate::image_pipeline::raw::types::SensorFrame;

/// A row-major, channel-interleaved sample grid that can be cropped.
pub trait PixelGrid: Sized {
    type Sample: Copy;

    /// Samples per pixel.
    const CHANNELS: usize;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn samples(&self) -> &[Self::Sample];

    /// Builds a frame holding `samples`, taken from `region` of `self`.
    fn with_region(&self, region: &Region, samples: Vec<Self::Sample>) -> Self;
}

impl PixelGrid for SensorFrame {
    type Sample = u16;
    const CHANNELS: usize = 1;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn samples(&self) -> &[u16] {
        &self.data
    }

    fn with_region(&self, region: &Region, samples: Vec<u16>) -> Self {
        let mut calibration = self.calibration.clone();
        calibration.pattern = calibration.pattern.shifted(region.x, region.y);

        Self {
            width: region.width,
            height: region.height,
            data: samples,
            bits_per_sample: self.bits_per_sample,
            calibration,
        }
    }
}

impl PixelGrid for ColorFrame {
    type Sample = u8;
    const CHANNELS: usize = 3;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn samples(&self) -> &[u8] {
        &self.data
    }

    fn with_region(&self, region: &Region, samples: Vec<u8>) -> Self {
        Self {
            width: region.width,
            height: region.height,
            data: samples,
        }
    }
}

/// Copies the pixels under `rect` out of `frame` into a new frame.
///
/// Fails with `InvalidCrop` when the rectangle is empty, negative, or leaves the frame.
pub fn crop<F: PixelGrid>(frame: &F, rect: &CropRect) -> Result<F> {
    let region = rect.within(frame.width(), frame.height())?;
    Ok(extract(frame, &region))
}

/// Copies an already validated region out of `frame`.
pub fn extract<F: PixelGrid>(frame: &F, region: &Region) -> F {
    let stride = frame.width() * F::CHANNELS;
    let row_len = region.width * F::CHANNELS;
    let start = region.x * F::CHANNELS;

    let mut samples = Vec::with_capacity(row_len * region.height);
    for row in frame
        .samples()
        .chunks_exact(stride)
        .skip(region.y)
        .take(region.height)
    {
        samples.extend_from_slice(&row[start..start + row_len]);
    }

    frame.with_region(region, samples)
}

//! Crop rectangle types

use serde::{Deserialize, Serialize};

use crate::image_pipeline::common::error::{PipelineError, Result};

/// A crop rectangle in image pixel coordinates, as submitted by a client.
///
/// Fields are signed so that negative input reaches validation instead of
/// failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// A rectangle that has been checked against a frame's dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl CropRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Validates the rectangle against a `frame_width` x `frame_height` frame.
    pub fn within(&self, frame_width: usize, frame_height: usize) -> Result<Region> {
        if self.width <= 0 || self.height <= 0 {
            return Err(PipelineError::InvalidCrop(format!(
                "crop width and height must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        if self.x < 0 || self.y < 0 {
            return Err(PipelineError::InvalidCrop(format!(
                "crop origin must be non-negative, got ({}, {})",
                self.x, self.y
            )));
        }

        if !fits(self.x, self.width, frame_width) || !fits(self.y, self.height, frame_height) {
            return Err(PipelineError::InvalidCrop(format!(
                "crop rectangle exceeds frame bounds: ({}, {}) {}x{} on a {}x{} frame",
                self.x, self.y, self.width, self.height, frame_width, frame_height
            )));
        }

        // All four values are non-negative and bounded by the frame from here on.
        Ok(Region {
            x: self.x as usize,
            y: self.y as usize,
            width: self.width as usize,
            height: self.height as usize,
        })
    }
}

fn fits(origin: i64, extent: i64, limit: usize) -> bool {
    origin
        .checked_add(extent)
        .and_then(|end| u64::try_from(end).ok())
        .is_some_and(|end| end <= limit as u64)
}

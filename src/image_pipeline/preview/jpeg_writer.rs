use std::io::Write;

use image::ExtendedColorType;
use image::codecs::jpeg::JpegEncoder;
use tracing::debug;

use crate::image_pipeline::common::error::{PipelineError, Result};
use crate::image_pipeline::debayer::types::ColorFrame;
use crate::image_pipeline::tiff::types::ArtifactConfig;

/// Largest edge a baseline JPEG can describe.
const MAX_JPEG_DIMENSION: usize = u16::MAX as usize;

pub trait PreviewWriter {
    fn write_preview(&self, image: &ColorFrame, output: &mut dyn Write, config: &ArtifactConfig) -> Result<()>;
}

pub struct JpegPreviewWriter;

impl PreviewWriter for JpegPreviewWriter {
    fn write_preview(&self, image: &ColorFrame, output: &mut dyn Write, config: &ArtifactConfig) -> Result<()> {
        debug!(
            "Encoding JPEG preview: {}x{} at quality {}",
            image.width, image.height, config.preview_quality
        );

        if image.width == 0
            || image.height == 0
            || image.width > MAX_JPEG_DIMENSION
            || image.height > MAX_JPEG_DIMENSION
            || image.data.len() != image.width * image.height * 3
        {
            return Err(PipelineError::InvalidDimensions(image.width, image.height));
        }

        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, config.preview_quality.clamp(1, 100))
            .encode(
                &image.data,
                image.width as u32,
                image.height as u32,
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| PipelineError::EncodeError(format!("JPEG preview: {}", e)))?;

        output.write_all(&buffer)?;

        debug!("JPEG encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

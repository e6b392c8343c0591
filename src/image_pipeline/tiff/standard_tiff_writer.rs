use std::io::Write;
use tracing::debug;
use crate::image_pipeline::common::error::{Result, PipelineError};
use crate::image_pipeline::raw::types::SensorFrame;
use crate::image_pipeline::tiff::types::ArtifactConfig;
use crate::image_pipeline::tiff::writer::TiffWriter;

/// Writes the sensor plane as a single-channel 16-bit TIFF, sample values untouched.
pub struct StandardTiffWriter;

impl TiffWriter for StandardTiffWriter {
    fn write_tiff(&self, image: &SensorFrame, output: &mut dyn Write, config: &ArtifactConfig) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", image.width, image.height);

        if image.width == 0 || image.height == 0 || image.data.len() != image.width * image.height {
            return Err(PipelineError::InvalidDimensions(image.width, image.height));
        }

        let mut buffer = Vec::new();

        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| PipelineError::EncodeError(format!("sensor TIFF: {}", e)))?
            .with_compression(config.compression.codec());

        let predictor = config.sensor_predictor();
        if predictor != tiff::tags::Predictor::None {
            encoder = encoder.with_predictor(predictor);
        }

        encoder.write_image::<tiff::encoder::colortype::Gray16>(
            image.width as u32,
            image.height as u32,
            &image.data,
        ).map_err(|e| PipelineError::EncodeError(format!("sensor TIFF: {}", e)))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete, {} bytes", buffer.len());
        Ok(())
    }
}

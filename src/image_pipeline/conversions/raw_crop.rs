use tracing::{info, instrument};

use crate::image_pipeline::{
    common::error::{PipelineError, Result},
    crop::{self, CropRect},
    preview::{JpegPreviewWriter, PreviewWriter},
    raw::{RawImageReader, RawLoaderReader},
    tiff::{ArtifactConfig, StandardTiffWriter, TiffWriter},
};

/// The encoded outputs of one crop, held in memory until they are persisted.
#[derive(Debug, Clone)]
pub struct CropArtifacts {
    /// The cropped sensor plane as a 16-bit TIFF payload.
    pub raw: Vec<u8>,
    /// The cropped colour plane as JPEG.
    pub preview: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

/// Object-safe view of a crop pipeline, so callers can hold one behind an `Arc`.
pub trait ArtifactPipeline: Send + Sync + 'static {
    /// Decodes `input_data` once and encodes both crops of `rect`.
    fn crop(&self, input_data: &[u8], rect: &CropRect) -> Result<CropArtifacts>;

    /// Develops and encodes a full-frame preview.
    fn preview(&self, input_data: &[u8]) -> Result<Vec<u8>>;
}

pub struct RawCropPipeline<R: RawImageReader, W: TiffWriter, P: PreviewWriter> {
    reader: R,
    writer: W,
    preview_writer: P,
    config: ArtifactConfig,
}

impl RawCropPipeline<RawLoaderReader, StandardTiffWriter, JpegPreviewWriter> {
    pub fn new(config: ArtifactConfig) -> Self {
        Self {
            reader: RawLoaderReader,
            writer: StandardTiffWriter,
            preview_writer: JpegPreviewWriter,
            config,
        }
    }
}

impl<R: RawImageReader, W: TiffWriter, P: PreviewWriter> RawCropPipeline<R, W, P> {
    pub fn with_custom(reader: R, writer: W, preview_writer: P, config: ArtifactConfig) -> Self {
        Self {
            reader,
            writer,
            preview_writer,
            config,
        }
    }

    /// Decodes once, validates `rect` against the shared frame size, then crops and
    /// encodes the sensor and colour planes with the same rectangle.
    ///
    /// Nothing is encoded unless the rectangle is valid.
    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn crop(&self, input_data: &[u8], rect: &CropRect) -> Result<CropArtifacts> {
        info!("Starting RAW crop");

        let decoded = {
            let _span = tracing::info_span!("decode_raw").entered();
            self.reader.decode(input_data)?
        };
        let (sensor, color) = (&decoded.sensor, &decoded.color);

        let region = {
            let _span = tracing::info_span!("validate_crop",
                width = sensor.width,
                height = sensor.height
            ).entered();
            if (color.width, color.height) != (sensor.width, sensor.height) {
                return Err(PipelineError::DecodeError(format!(
                    "colour plane is {}x{} but sensor plane is {}x{}",
                    color.width, color.height, sensor.width, sensor.height
                )));
            }

            rect.within(sensor.width, sensor.height)?
        };

        let (cropped_sensor, cropped_color) = {
            let _span = tracing::info_span!("crop").entered();
            (crop::extract(sensor, &region), crop::extract(color, &region))
        };

        let mut raw = Vec::new();
        {
            let _span = tracing::info_span!("encode_tiff").entered();
            self.writer.write_tiff(&cropped_sensor, &mut raw, &self.config)?;
        }

        let mut preview = Vec::new();
        {
            let _span = tracing::info_span!("encode_preview").entered();
            self.preview_writer.write_preview(&cropped_color, &mut preview, &self.config)?;
        }

        info!(
            width = region.width,
            height = region.height,
            raw_bytes = raw.len(),
            preview_bytes = preview.len(),
            "Crop complete"
        );

        Ok(CropArtifacts {
            raw,
            preview,
            width: region.width,
            height: region.height,
        })
    }

    #[instrument(skip(self, input_data), fields(input_size = input_data.len()))]
    pub fn preview(&self, input_data: &[u8]) -> Result<Vec<u8>> {
        let color = {
            let _span = tracing::info_span!("decode_color").entered();
            self.reader.decode_color(input_data)?
        };

        let mut preview = Vec::new();
        {
            let _span = tracing::info_span!("encode_preview").entered();
            self.preview_writer.write_preview(&color, &mut preview, &self.config)?;
        }

        info!(
            width = color.width,
            height = color.height,
            preview_bytes = preview.len(),
            "Preview complete"
        );
        Ok(preview)
    }

    pub fn config(&self) -> &ArtifactConfig {
        &self.config
    }
}

impl<R, W, P> ArtifactPipeline for RawCropPipeline<R, W, P>
where
    R: RawImageReader + Send + Sync + 'static,
    W: TiffWriter + Send + Sync + 'static,
    P: PreviewWriter + Send + Sync + 'static,
{
    fn crop(&self, input_data: &[u8], rect: &CropRect) -> Result<CropArtifacts> {
        RawCropPipeline::crop(self, input_data, rect)
    }

    fn preview(&self, input_data: &[u8]) -> Result<Vec<u8>> {
        RawCropPipeline::preview(self, input_data)
    }
}

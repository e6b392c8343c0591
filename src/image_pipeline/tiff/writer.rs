use std::io::Write;
use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::raw::types::SensorFrame;
use crate::image_pipeline::tiff::types::ArtifactConfig;

pub trait TiffWriter {
    fn write_tiff(&self, image: &SensorFrame, output: &mut dyn Write, config: &ArtifactConfig) -> Result<()>;
}

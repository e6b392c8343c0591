use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::debayer::types::ColorFrame;
use crate::image_pipeline::raw::types::SensorFrame;

/// Both views of one RAW file, produced by a single decode pass.
#[derive(Debug, Clone)]
pub struct DecodedRaw {
    pub sensor: SensorFrame,
    pub color: ColorFrame,
}

pub trait RawImageReader {
    /// Decodes the container and returns its visible sensor plane.
    fn extract_sensor_plane(&self, data: &[u8]) -> Result<SensorFrame>;

    /// Runs the colour reconstruction pipeline over an already extracted plane.
    fn develop(&self, sensor: &SensorFrame) -> Result<ColorFrame>;

    fn decode_color(&self, data: &[u8]) -> Result<ColorFrame> {
        let sensor = self.extract_sensor_plane(data)?;
        self.develop(&sensor)
    }

    fn decode(&self, data: &[u8]) -> Result<DecodedRaw> {
        let sensor = self.extract_sensor_plane(data)?;
        let color = self.develop(&sensor)?;
        Ok(DecodedRaw { sensor, color })
    }
}

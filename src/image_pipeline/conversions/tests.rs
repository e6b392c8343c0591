#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use crate::image_pipeline::common::error::{PipelineError, Result};
    use crate::image_pipeline::conversions::RawCropPipeline;
    use crate::image_pipeline::crop::CropRect;
    use crate::image_pipeline::debayer::types::ColorFrame;
    use crate::image_pipeline::preview::{JpegPreviewWriter, PreviewWriter};
    use crate::image_pipeline::raw::types::SensorFrame;
    use crate::image_pipeline::raw::RawImageReader;
    use crate::image_pipeline::tiff::{ArtifactConfig, StandardTiffWriter, TiffCompression, TiffWriter};
    use crate::test_helpers::{SyntheticReader, read_sensor_tiff, synthetic_sample};

    struct MockReader {
        should_fail: bool,
        mock_data: Option<SensorFrame>,
        color_size: Option<(usize, usize)>,
    }

    impl RawImageReader for MockReader {
        fn extract_sensor_plane(&self, _data: &[u8]) -> Result<SensorFrame> {
            if self.should_fail {
                return Err(PipelineError::DecodeError("Mock decode error".to_string()));
            }
            Ok(self.mock_data.clone().unwrap_or(SensorFrame::new(
                100,
                100,
                vec![0u16; 100 * 100],
                16,
            )))
        }

        fn develop(&self, sensor: &SensorFrame) -> Result<ColorFrame> {
            let (width, height) = self.color_size.unwrap_or((sensor.width, sensor.height));
            Ok(ColorFrame::new(width, height, vec![0u8; width * height * 3]))
        }
    }

    #[derive(Default)]
    struct MockWriter {
        should_fail: bool,
        written_data: Arc<Mutex<Vec<SensorFrame>>>,
    }

    impl TiffWriter for MockWriter {
        fn write_tiff(&self, image: &SensorFrame, _output: &mut dyn Write, _config: &ArtifactConfig) -> Result<()> {
            if self.should_fail {
                return Err(PipelineError::EncodeError("Mock encode error".to_string()));
            }
            self.written_data.lock().unwrap().push(image.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockPreviewWriter {
        written_data: Arc<Mutex<Vec<ColorFrame>>>,
    }

    impl PreviewWriter for MockPreviewWriter {
        fn write_preview(&self, image: &ColorFrame, _output: &mut dyn Write, _config: &ArtifactConfig) -> Result<()> {
            self.written_data.lock().unwrap().push(image.clone());
            Ok(())
        }
    }

    fn ok_reader() -> MockReader {
        MockReader { should_fail: false, mock_data: None, color_size: None }
    }

    #[test]
    fn test_pipeline_keeps_its_config() {
        let config = ArtifactConfig::builder()
            .compression(TiffCompression::Lzw)
            .horizontal_predictor(false)
            .preview_quality(75)
            .build();
        let pipeline = RawCropPipeline::with_custom(
            ok_reader(),
            MockWriter::default(),
            MockPreviewWriter::default(),
            config.clone(),
        );

        assert_eq!(pipeline.config(), &config);
    }

    #[test]
    fn test_successful_crop_uses_same_rect_for_both_planes() {
        let sensor_written = Arc::new(Mutex::new(Vec::new()));
        let color_written = Arc::new(Mutex::new(Vec::new()));
        let writer = MockWriter { should_fail: false, written_data: sensor_written.clone() };
        let preview_writer = MockPreviewWriter { written_data: color_written.clone() };

        let pipeline = RawCropPipeline::with_custom(
            ok_reader(),
            writer,
            preview_writer,
            ArtifactConfig::default(),
        );

        let artifacts = pipeline.crop(b"fake raw data", &CropRect::new(10, 20, 30, 40)).unwrap();
        assert_eq!((artifacts.width, artifacts.height), (30, 40));

        let sensors = sensor_written.lock().unwrap();
        let colors = color_written.lock().unwrap();
        assert_eq!(sensors.len(), 1);
        assert_eq!(colors.len(), 1);
        assert_eq!((sensors[0].width, sensors[0].height), (30, 40));
        assert_eq!((colors[0].width, colors[0].height), (30, 40));
    }

    #[test]
    fn test_reader_failure() {
        let written = Arc::new(Mutex::new(Vec::new()));
        let reader = MockReader { should_fail: true, mock_data: None, color_size: None };
        let writer = MockWriter { should_fail: false, written_data: written.clone() };

        let pipeline = RawCropPipeline::with_custom(
            reader,
            writer,
            MockPreviewWriter::default(),
            ArtifactConfig::default(),
        );

        let result = pipeline.crop(b"fake raw data", &CropRect::new(0, 0, 10, 10));

        assert!(matches!(result.unwrap_err(), PipelineError::DecodeError(_)));
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_writer_failure() {
        let writer = MockWriter { should_fail: true, ..Default::default() };

        let pipeline = RawCropPipeline::with_custom(
            ok_reader(),
            writer,
            MockPreviewWriter::default(),
            ArtifactConfig::default(),
        );

        let result = pipeline.crop(b"fake raw data", &CropRect::new(0, 0, 10, 10));
        assert!(matches!(result.unwrap_err(), PipelineError::EncodeError(_)));
    }

    #[test]
    fn test_invalid_rect_writes_nothing() {
        let sensor_written = Arc::new(Mutex::new(Vec::new()));
        let color_written = Arc::new(Mutex::new(Vec::new()));

        let pipeline = RawCropPipeline::with_custom(
            ok_reader(),
            MockWriter { should_fail: false, written_data: sensor_written.clone() },
            MockPreviewWriter { written_data: color_written.clone() },
            ArtifactConfig::default(),
        );

        for rect in [
            CropRect::new(50, 50, 51, 10),
            CropRect::new(0, 0, 0, 10),
            CropRect::new(-1, 0, 10, 10),
        ] {
            let result = pipeline.crop(b"fake raw data", &rect);
            assert!(matches!(result.unwrap_err(), PipelineError::InvalidCrop(_)));
        }

        assert!(sensor_written.lock().unwrap().is_empty());
        assert!(color_written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_mismatched_planes_are_rejected() {
        let reader = MockReader { should_fail: false, mock_data: None, color_size: Some((50, 100)) };
        let pipeline = RawCropPipeline::with_custom(
            reader,
            MockWriter::default(),
            MockPreviewWriter::default(),
            ArtifactConfig::default(),
        );

        let result = pipeline.crop(b"fake raw data", &CropRect::new(0, 0, 10, 10));
        assert!(matches!(result.unwrap_err(), PipelineError::DecodeError(_)));
    }

    #[test]
    fn test_zero_width_frame_is_rejected_before_encoding() {
        let reader = MockReader {
            should_fail: false,
            mock_data: Some(SensorFrame::new(0, 100, Vec::new(), 16)),
            color_size: None,
        };
        let written = Arc::new(Mutex::new(Vec::new()));
        let pipeline = RawCropPipeline::with_custom(
            reader,
            MockWriter { should_fail: false, written_data: written.clone() },
            MockPreviewWriter::default(),
            ArtifactConfig::default(),
        );

        let result = pipeline.crop(b"fake raw data", &CropRect::new(0, 0, 10, 10));
        assert!(matches!(result.unwrap_err(), PipelineError::InvalidCrop(_)));
        assert!(written.lock().unwrap().is_empty());
    }

    #[test]
    fn test_encoded_sensor_crop_holds_original_samples() {
        let pipeline = RawCropPipeline::with_custom(
            SyntheticReader::new(64, 48),
            StandardTiffWriter,
            JpegPreviewWriter,
            ArtifactConfig::default(),
        );

        let rect = CropRect::new(5, 7, 20, 10);
        let artifacts = pipeline.crop(b"fake raw data", &rect).unwrap();

        let (width, height, samples) = read_sensor_tiff(&artifacts.raw);
        assert_eq!((width, height), (20, 10));
        for row in 0..10 {
            for col in 0..20 {
                assert_eq!(samples[row * 20 + col], synthetic_sample(64, col + 5, row + 7));
            }
        }

        let preview = image::load_from_memory(&artifacts.preview).unwrap();
        assert_eq!((preview.width(), preview.height()), (20, 10));
    }

    #[test]
    fn test_preview_covers_full_frame() {
        let pipeline = RawCropPipeline::with_custom(
            SyntheticReader::new(32, 24),
            StandardTiffWriter,
            JpegPreviewWriter,
            ArtifactConfig::default(),
        );

        let preview = pipeline.preview(b"fake raw data").unwrap();
        let decoded = image::load_from_memory(&preview).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 24));
    }

    #[test]
    fn test_preview_reader_failure() {
        let pipeline = RawCropPipeline::with_custom(
            MockReader { should_fail: true, mock_data: None, color_size: None },
            MockWriter::default(),
            MockPreviewWriter::default(),
            ArtifactConfig::default(),
        );

        assert!(matches!(pipeline.preview(b"x").unwrap_err(), PipelineError::DecodeError(_)));
    }
}

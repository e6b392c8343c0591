//! Encoding settings shared by the sensor TIFF writer and the JPEG preview writer

use tiff::encoder::Compression;
use tiff::encoder::compression::DeflateLevel;
use tiff::tags::Predictor;

pub const DEFAULT_PREVIEW_QUALITY: u8 = 90;

/// Compression of the cropped sensor plane. Every option is lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TiffCompression {
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

impl TiffCompression {
    pub fn is_compressed(self) -> bool {
        self != Self::None
    }

    pub(crate) fn codec(self) -> Compression {
        match self {
            Self::None => Compression::Uncompressed,
            Self::Lzw => Compression::Lzw,
            Self::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            Self::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            Self::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        }
    }
}

/// How the artifacts of a crop are encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactConfig {
    pub compression: TiffCompression,
    /// Horizontal differencing of sensor rows before compression.
    pub horizontal_predictor: bool,
    /// JPEG quality of previews, 1-100.
    pub preview_quality: u8,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            compression: TiffCompression::DeflateBalanced,
            horizontal_predictor: true,
            preview_quality: DEFAULT_PREVIEW_QUALITY,
        }
    }
}

impl ArtifactConfig {
    pub fn builder() -> ArtifactConfigBuilder {
        ArtifactConfigBuilder::default()
    }

    /// The predictor actually written. Uncompressed output never carries one.
    pub fn sensor_predictor(&self) -> Predictor {
        if self.horizontal_predictor && self.compression.is_compressed() {
            Predictor::Horizontal
        } else {
            Predictor::None
        }
    }
}

#[derive(Debug, Default)]
pub struct ArtifactConfigBuilder {
    compression: Option<TiffCompression>,
    horizontal_predictor: Option<bool>,
    preview_quality: Option<u8>,
}

impl ArtifactConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn horizontal_predictor(mut self, enabled: bool) -> Self {
        self.horizontal_predictor = Some(enabled);
        self
    }

    /// Clamped to 1-100.
    pub fn preview_quality(mut self, quality: u8) -> Self {
        self.preview_quality = Some(quality.clamp(1, 100));
        self
    }

    pub fn build(self) -> ArtifactConfig {
        let default = ArtifactConfig::default();
        ArtifactConfig {
            compression: self.compression.unwrap_or(default.compression),
            horizontal_predictor: self.horizontal_predictor.unwrap_or(default.horizontal_predictor),
            preview_quality: self.preview_quality.unwrap_or(default.preview_quality),
        }
    }
}

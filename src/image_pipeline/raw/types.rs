//! RAW image data types

use std::path::Path;

/// The RAW containers accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawFormat {
    /// Nikon
    Nef,
    /// Canon
    Cr2,
    /// Sony
    Arw,
    /// Adobe Digital Negative
    Dng,
}

impl RawFormat {
    pub const ALL: [RawFormat; 4] = [Self::Nef, Self::Cr2, Self::Arw, Self::Dng];

    /// The lowercase file extension of the container.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Nef => "nef",
            Self::Cr2 => "cr2",
            Self::Arw => "arw",
            Self::Dng => "dng",
        }
    }

    /// Matches an extension case-insensitively, without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(ext))
    }

    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?;
        Self::from_extension(ext)
    }
}

/// Channel indices as reported by the decoder's CFA description.
pub const RED: u8 = 0;
pub const GREEN: u8 = 1;
pub const BLUE: u8 = 2;

/// The 2x2 colour filter arrangement at a frame's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BayerPattern {
    Rggb,
    Bggr,
    Grbg,
    Gbrg,
}

impl BayerPattern {
    /// Colours of the 2x2 tile, indexed `[row][col]`.
    pub fn colors(self) -> [[u8; 2]; 2] {
        match self {
            Self::Rggb => [[RED, GREEN], [GREEN, BLUE]],
            Self::Bggr => [[BLUE, GREEN], [GREEN, RED]],
            Self::Grbg => [[GREEN, RED], [BLUE, GREEN]],
            Self::Gbrg => [[GREEN, BLUE], [RED, GREEN]],
        }
    }

    pub fn from_colors(colors: [[u8; 2]; 2]) -> Option<Self> {
        [Self::Rggb, Self::Bggr, Self::Grbg, Self::Gbrg]
            .into_iter()
            .find(|pattern| pattern.colors() == colors)
    }

    /// The pattern seen by a frame whose origin sits `dx` columns and `dy` rows
    /// into this one.
    pub fn shifted(self, dx: usize, dy: usize) -> Self {
        let colors = self.colors();
        let mut out = [[0u8; 2]; 2];
        for (row, line) in out.iter_mut().enumerate() {
            for (col, color) in line.iter_mut().enumerate() {
                *color = colors[(row + dy) % 2][(col + dx) % 2];
            }
        }
        // Every shift of a Bayer tile is itself a Bayer tile.
        Self::from_colors(out).unwrap_or(self)
    }

    pub(crate) fn to_bayer_cfa(self) -> bayer::CFA {
        match self {
            Self::Rggb => bayer::CFA::RGGB,
            Self::Bggr => bayer::CFA::BGGR,
            Self::Grbg => bayer::CFA::GRBG,
            Self::Gbrg => bayer::CFA::GBRG,
        }
    }
}

/// Sensor calibration needed to develop a frame into colour.
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub pattern: BayerPattern,
    pub black_level: u16,
    pub white_level: u16,
    /// White balance multipliers for R, G, B, normalised to green.
    pub wb_coeffs: [f32; 3],
    /// Camera RGB to linear sRGB, `None` when the camera is not profiled.
    pub cam_to_srgb: Option<[[f32; 3]; 3]>,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            pattern: BayerPattern::Rggb,
            black_level: 0,
            white_level: u16::MAX,
            wb_coeffs: [1.0, 1.0, 1.0],
            cam_to_srgb: None,
        }
    }
}

/// The visible sensor plane of a decoded RAW file.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorFrame {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Raw pixel data (single channel Bayer pattern), row-major
    pub data: Vec<u16>,
    /// Actual bits per sample from the sensor (e.g., 12, 14, or 16)
    pub bits_per_sample: u32,
    pub calibration: Calibration,
}

impl SensorFrame {
    /// A frame with default calibration, mostly useful for synthetic input.
    pub fn new(width: usize, height: usize, data: Vec<u16>, bits_per_sample: u32) -> Self {
        Self {
            width,
            height,
            data,
            bits_per_sample,
            calibration: Calibration::default(),
        }
    }
}

//! Types for debayering operations

/// RGB image data after debayering and tone mapping
#[derive(Debug, Clone, PartialEq)]
pub struct ColorFrame {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// RGB pixel data interleaved [R, G, B, R, G, B, ...], 8 bits per channel
    pub data: Vec<u8>,
}

impl ColorFrame {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        Self { width, height, data }
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{0}")]
    NotFound(String),

    #[error("Unsupported file format. Please upload a RAW image only.")]
    UnsupportedFormat(String),

    #[error("Invalid crop: {0}")]
    InvalidCrop(String),

    #[error("Failed to decode RAW image: {0}")]
    DecodeError(String),

    #[error("Failed to encode {0}")]
    EncodeError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Storage failure: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PipelineError {
    /// Whether the failure was caused by the request rather than the server.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::UnsupportedFormat(_) | Self::InvalidCrop(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::image_pipeline::{ArtifactConfig, TiffCompression};

pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// RAW image upload, preview and crop service.
#[derive(Debug, Clone, Parser)]
#[command(name = "rawcrop", version, about)]
pub struct AppConfig {
    /// Base URL used to build absolute links in responses.
    #[arg(long, env = "PUBLIC_BASE_URL", default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    /// Address to listen on.
    #[arg(long, env = "RAWCROP_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Directory holding the `uploads/` and `processed/` folders.
    #[arg(long, env = "RAWCROP_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Largest accepted request body, in bytes.
    #[arg(long, env = "RAWCROP_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Seconds a single decode may take before the request fails.
    #[arg(long, env = "RAWCROP_DECODE_TIMEOUT_SECS", default_value_t = 120)]
    pub decode_timeout_secs: u64,

    /// Seconds to wait for the metadata tool before leaving a crop untagged.
    #[arg(long, env = "RAWCROP_METADATA_TIMEOUT_SECS", default_value_t = 30)]
    pub metadata_timeout_secs: u64,

    /// exiftool executable used to copy metadata onto cropped files.
    #[arg(long, env = "RAWCROP_EXIFTOOL", default_value = "exiftool")]
    pub exiftool: PathBuf,

    /// Do not copy metadata onto cropped files.
    #[arg(long)]
    pub no_metadata: bool,

    /// JPEG quality of previews.
    #[arg(
        long,
        env = "RAWCROP_PREVIEW_QUALITY",
        default_value_t = 90,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub preview_quality: u8,

    /// Compression of cropped sensor data.
    #[arg(long, value_enum, default_value_t = TiffCompression::DeflateBalanced)]
    pub tiff_compression: TiffCompression,
}

impl AppConfig {
    pub fn public_base_url(&self) -> &str {
        self.public_base_url.trim_end_matches('/')
    }

    pub fn decode_timeout(&self) -> Duration {
        Duration::from_secs(self.decode_timeout_secs)
    }

    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }

    pub fn artifact_config(&self) -> ArtifactConfig {
        ArtifactConfig::builder()
            .compression(self.tiff_compression)
            .preview_quality(self.preview_quality)
            .build()
    }
}

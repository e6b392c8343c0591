use axum::{
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use crate::image_pipeline::{CropRect, PipelineError};

pub const UPLOAD_MESSAGE: &str = "File uploaded & processed successfully";
pub const CROP_MESSAGE: &str = "RAW file cropped successfully";
pub const CLEAR_MESSAGE: &str = "All uploaded and processed data cleared";
pub const LIVENESS_MESSAGE: &str = "RAW crop service is running";

/// A failed request, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Pipeline(PipelineError),
    BadRequest(String),
    Rejected(StatusCode, String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Pipeline(err) => status_for(err),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rejected(status, _) => *status,
        }
    }
}

/// NotFound is 404, other request faults are 400, everything else is a server fault.
pub fn status_for(err: &PipelineError) -> StatusCode {
    match err {
        PipelineError::NotFound(_) => StatusCode::NOT_FOUND,
        PipelineError::UnsupportedFormat(_) | PipelineError::InvalidCrop(_) => {
            StatusCode::BAD_REQUEST
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        Self::Pipeline(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        Self::Rejected(err.status(), err.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Pipeline(err) => err.to_string(),
            Self::BadRequest(msg) | Self::Rejected(_, msg) => msg,
        };

        if status.is_server_error() {
            error!(%status, "{}", message);
        } else {
            warn!(%status, "{}", message);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct CropRequest {
    pub filename: String,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl CropRequest {
    pub fn rect(&self) -> CropRect {
        CropRect::new(self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    pub preview: String,
    pub raw_url: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CropResponse {
    pub cropped_raw_url: String,
    pub cropped_preview_url: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Characters escaped when a stored name becomes one URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Builds absolute links under the public base URL. Names are percent-encoded.
#[derive(Debug, Clone)]
pub struct Links {
    base: String,
}

impl Links {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn raw_download(&self, name: &str) -> String {
        format!("{}/download/raw/{}", self.base, segment(name))
    }

    pub fn cropped_download(&self, name: &str) -> String {
        format!("{}/download/cropped/{}", self.base, segment(name))
    }

    pub fn processed(&self, name: &str) -> String {
        format!("{}/processed/{}", self.base, segment(name))
    }
}

fn segment(name: &str) -> String {
    utf8_percent_encode(name, PATH_SEGMENT).to_string()
}

/// A `Content-Disposition` value that is always a valid header.
pub fn attachment_disposition(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            ' ' => c,
            c if c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

pub fn content_type_for(name: &str) -> &'static str {
    let ext = std::path::Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("tif" | "tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}

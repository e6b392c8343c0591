//! HTTP surface
//!
//! Upload, crop, download and housekeeping endpoints over a [`CropService`].

mod response;


use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post},
};
use tracing::{info, instrument};

use crate::service::CropService;
use crate::store::Namespace;

pub use response::{
    ApiError, ApiResult, CLEAR_MESSAGE, CROP_MESSAGE, CropRequest, CropResponse,
    LIVENESS_MESSAGE, Links, MessageResponse, UPLOAD_MESSAGE, UploadResponse, status_for,
};
use response::{attachment_disposition, content_type_for};

/// Multipart field carrying the uploaded file.
const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct AppState {
    service: CropService,
    links: Links,
}

impl AppState {
    pub fn new(service: CropService, public_base_url: &str) -> Self {
        Self {
            service,
            links: Links::new(public_base_url),
        }
    }
}

pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(liveness))
        .route("/upload/", post(upload))
        .route("/upload", post(upload))
        .route("/crop-raw/", post(crop_raw))
        .route("/crop-raw", post(crop_raw))
        .route("/download/raw/:filename", get(download_raw))
        .route("/download/cropped/:filename", get(download_cropped))
        .route("/processed/:filename", get(processed))
        .route("/clear-data", delete(clear_data))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

async fn liveness() -> impl IntoResponse {
    (StatusCode::OK, Json(MessageResponse::new(LIVENESS_MESSAGE)))
}

#[instrument(skip_all)]
async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        info!(%filename, size = data.len(), "Received upload");

        let outcome = state.service.upload(data, &filename).await?;
        return Ok(Json(UploadResponse {
            preview: state.links.processed(&outcome.preview.name),
            raw_url: state.links.raw_download(&outcome.asset.id),
            filename: outcome.asset.id,
            message: UPLOAD_MESSAGE.to_string(),
        }));
    }

    Err(ApiError::BadRequest(format!("missing multipart field '{}'", FILE_FIELD)))
}

#[instrument(skip_all)]
async fn crop_raw(
    State(state): State<AppState>,
    payload: Result<Json<CropRequest>, JsonRejection>,
) -> ApiResult<Json<CropResponse>> {
    let Json(request) = payload?;
    info!(filename = %request.filename, rect = ?request.rect(), "Crop requested");

    let outcome = state.service.crop(&request.filename, request.rect()).await?;
    Ok(Json(CropResponse {
        cropped_raw_url: state.links.cropped_download(&outcome.cropped_raw.name),
        cropped_preview_url: state.links.processed(&outcome.cropped_preview.name),
        message: CROP_MESSAGE.to_string(),
    }))
}

async fn download_raw(State(state): State<AppState>, Path(filename): Path<String>) -> ApiResult<Response> {
    attachment(&state, Namespace::Originals, &filename).await
}

async fn download_cropped(State(state): State<AppState>, Path(filename): Path<String>) -> ApiResult<Response> {
    attachment(&state, Namespace::Derived, &filename).await
}

async fn attachment(state: &AppState, namespace: Namespace, filename: &str) -> ApiResult<Response> {
    let data = state.service.store().read(namespace, filename).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, attachment_disposition(filename)),
        ],
        data,
    )
        .into_response())
}

async fn processed(State(state): State<AppState>, Path(filename): Path<String>) -> ApiResult<Response> {
    let data = state.service.store().read(Namespace::Derived, &filename).await?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&filename))], data).into_response())
}

#[instrument(skip_all)]
async fn clear_data(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    state.service.clear().await?;
    Ok(Json(MessageResponse::new(CLEAR_MESSAGE)))
}

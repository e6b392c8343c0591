//! Request orchestration
//!
//! Ties the asset store, the artifact pipeline and the metadata propagator together.
//! CPU-bound decoding and the metadata tool run on tokio's blocking pool, each
//! under its own timeout.


use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing::{Span, info, instrument, warn};

use crate::image_pipeline::{ArtifactPipeline, CropRect, PipelineError, Result};
use crate::metadata::MetadataPropagator;
use crate::store::{AssetStore, DerivedArtifact, Namespace, RawAsset};

pub const DEFAULT_DECODE_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub asset: RawAsset,
    pub preview: DerivedArtifact,
}

#[derive(Debug, Clone)]
pub struct CropOutcome {
    pub cropped_raw: DerivedArtifact,
    pub cropped_preview: DerivedArtifact,
    pub width: usize,
    pub height: usize,
}

#[derive(Clone)]
pub struct CropService {
    store: Arc<AssetStore>,
    pipeline: Arc<dyn ArtifactPipeline>,
    metadata: Arc<dyn MetadataPropagator>,
    decode_timeout: Duration,
    metadata_timeout: Duration,
}

impl CropService {
    pub fn new(
        store: Arc<AssetStore>,
        pipeline: Arc<dyn ArtifactPipeline>,
        metadata: Arc<dyn MetadataPropagator>,
    ) -> Self {
        Self {
            store,
            pipeline,
            metadata,
            decode_timeout: DEFAULT_DECODE_TIMEOUT,
            metadata_timeout: DEFAULT_METADATA_TIMEOUT,
        }
    }

    pub fn with_decode_timeout(mut self, timeout: Duration) -> Self {
        self.decode_timeout = timeout;
        self
    }

    /// Longest wait for the metadata tool. A crop whose propagation overruns is
    /// still returned; the tag copy is abandoned.
    pub fn with_metadata_timeout(mut self, timeout: Duration) -> Self {
        self.metadata_timeout = timeout;
        self
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    pub fn decode_timeout(&self) -> Duration {
        self.decode_timeout
    }

    /// Stores an upload and a full-frame JPEG preview of it.
    ///
    /// The store rejects names outside the RAW allow-list before writing. If the
    /// preview cannot be produced the original stays stored and the decode error
    /// is returned.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn upload(&self, data: Bytes, filename: &str) -> Result<UploadOutcome> {
        let asset = self.store.save_original(&data, filename).await?;
        info!(id = %asset.id, format = ?asset.format, "Stored original");

        let pipeline = Arc::clone(&self.pipeline);
        let jpeg = self.run_blocking(move || pipeline.preview(&data)).await?;

        let preview = self
            .store
            .save_derived(&jpeg, &upload_preview_name(&asset.id))
            .await?;

        info!(preview = %preview.name, "Upload processed");
        Ok(UploadOutcome { asset, preview })
    }

    /// Crops the sensor and colour planes of a stored original with `rect` and
    /// persists both artifacts.
    ///
    /// The rectangle is validated against the decoded frame before anything is written.
    #[instrument(skip(self), fields(asset = %asset_name))]
    pub async fn crop(&self, asset_name: &str, rect: CropRect) -> Result<CropOutcome> {
        let source_path = self
            .store
            .resolve(Namespace::Originals, asset_name)
            .await
            .map_err(source_not_found)?;
        let data = self
            .store
            .read(Namespace::Originals, asset_name)
            .await
            .map_err(source_not_found)?;

        let pipeline = Arc::clone(&self.pipeline);
        let artifacts = self.run_blocking(move || pipeline.crop(&data, &rect)).await?;

        let cropped_raw = self
            .store
            .save_derived(&artifacts.raw, &cropped_raw_name(asset_name, &rect))
            .await?;
        self.propagate_metadata(source_path, cropped_raw.path.clone()).await;

        let cropped_preview = self
            .store
            .save_derived(&artifacts.preview, &cropped_preview_name(asset_name, &rect))
            .await?;

        info!(
            raw = %cropped_raw.name,
            preview = %cropped_preview.name,
            width = artifacts.width,
            height = artifacts.height,
            "Crop stored"
        );

        Ok(CropOutcome {
            cropped_raw,
            cropped_preview,
            width: artifacts.width,
            height: artifacts.height,
        })
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.clear_all().await
    }

    async fn run_blocking<T, F>(&self, job: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let span = Span::current();
        let handle = tokio::task::spawn_blocking(move || span.in_scope(job));

        match tokio::time::timeout(self.decode_timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(PipelineError::DecodeError(format!(
                "decode task failed: {}",
                join_error
            ))),
            Err(_) => Err(PipelineError::DecodeError(format!(
                "decode timed out after {}s",
                self.decode_timeout.as_secs_f32()
            ))),
        }
    }

    async fn propagate_metadata(&self, source: PathBuf, target: PathBuf) {
        let metadata = Arc::clone(&self.metadata);
        let job = tokio::task::spawn_blocking(move || metadata.propagate(&source, &target));

        match tokio::time::timeout(self.metadata_timeout, job).await {
            Ok(Ok(Ok(()))) => {}
            Ok(Ok(Err(e))) => warn!("Metadata propagation skipped: {}", e),
            Ok(Err(e)) => warn!("Metadata propagation task failed: {}", e),
            Err(_) => warn!(
                "Metadata propagation abandoned after {}s",
                self.metadata_timeout.as_secs_f32()
            ),
        }
    }
}

fn source_not_found(err: PipelineError) -> PipelineError {
    match err {
        PipelineError::NotFound(_) => PipelineError::NotFound("source file not found".to_string()),
        other => other,
    }
}

pub fn upload_preview_name(asset_id: &str) -> String {
    format!("{}.jpg", asset_id)
}

fn crop_stem(asset_name: &str, rect: &CropRect) -> String {
    let stem = Path::new(asset_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(asset_name);
    format!(
        "{}_crop_{}_{}_{}x{}",
        stem, rect.x, rect.y, rect.width, rect.height
    )
}

/// `<stem>_crop_<x>_<y>_<w>x<h>.<original extension>`
pub fn cropped_raw_name(asset_name: &str, rect: &CropRect) -> String {
    let stem = crop_stem(asset_name, rect);
    match Path::new(asset_name).extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

/// `<stem>_crop_<x>_<y>_<w>x<h>_preview.jpg`
pub fn cropped_preview_name(asset_name: &str, rect: &CropRect) -> String {
    format!("{}_preview.jpg", crop_stem(asset_name, rect))
}

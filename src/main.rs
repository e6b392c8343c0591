use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use rawcrop::config::AppConfig;
use rawcrop::image_pipeline::RawCropPipeline;
use rawcrop::logger;
use rawcrop::metadata::{ExifToolPropagator, MetadataPropagator, NoopPropagator};
use rawcrop::server::{AppState, create_router};
use rawcrop::service::CropService;
use rawcrop::store::AssetStore;

use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init();

    let config = AppConfig::parse();
    info!("Starting rawcrop...");

    let store = Arc::new(AssetStore::new(&config.data_dir));
    store
        .init()
        .await
        .with_context(|| format!("failed to prepare data directory {:?}", config.data_dir))?;

    let metadata: Arc<dyn MetadataPropagator> = if config.no_metadata {
        info!("Metadata propagation: disabled");
        Arc::new(NoopPropagator)
    } else {
        info!("Metadata propagation: {}", config.exiftool.display());
        Arc::new(ExifToolPropagator::new(&config.exiftool))
    };

    let pipeline = RawCropPipeline::new(config.artifact_config());
    info!("Compression: {:?}", pipeline.config().compression);
    info!("Preview quality: {}", pipeline.config().preview_quality);

    let service = CropService::new(store, Arc::new(pipeline), metadata)
        .with_decode_timeout(config.decode_timeout())
        .with_metadata_timeout(config.metadata_timeout());
    let state = AppState::new(service, config.public_base_url());
    let app = create_router(state, config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    info!("Listening on {} (public URL {})", config.bind, config.public_base_url());

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

use std::net::SocketAddr;
use std::sync::Arc;

use aws_config::{BehaviorVersion, Region};
use facefind::cloud::{RekognitionFaceIndex, S3ObjectStore};
use facefind::db::RecordStore;
use facefind::utils::config::Config;
use facefind::utils::logging;
use facefind::AppState;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cfg = Config::from_env();
    std::fs::create_dir_all(&cfg.temp_dir)?;
    if cfg.uses_dev_secret() {
        warn!("SESSION_SECRET is not set; admin sessions are signed with a development key");
    }

    let store = RecordStore::open(cfg.database_url.as_deref())?;
    match store.count_faces().await {
        Some(n) => info!("Record store ready with {} face records", n),
        None => warn!("Record store opened but could not be queried"),
    }

    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(cfg.aws_region.clone()))
        .load()
        .await;
    let objects = Arc::new(S3ObjectStore::new(&sdk_config, cfg.gallery_bucket.clone(), cfg.aws_region.clone()));
    let faces = Arc::new(RekognitionFaceIndex::new(&sdk_config, cfg.collection_id.clone()));
    info!(
        "Gallery bucket {} in {}, face collection {}",
        cfg.gallery_bucket, cfg.aws_region, cfg.collection_id
    );

    let port = cfg.port;
    let state = Arc::new(AppState::new(cfg, store, objects, faces));
    let app = facefind::api::routes::router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("listening" = %addr);
    axum::serve(listener, app).await?;
    Ok(())
}

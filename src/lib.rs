pub mod api;
pub mod cloud;
pub mod db;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod utils;

use std::sync::Arc;

use crate::cloud::{FaceIndex, ObjectStore};
use crate::db::RecordStore;
use crate::pipeline::IngestSettings;
use crate::utils::config::Config;

pub struct AppState {
    pub started_at: std::time::Instant,
    pub config: Config,
    pub store: RecordStore,
    /// Gallery bucket.
    pub objects: Arc<dyn ObjectStore>,
    pub faces: Arc<dyn FaceIndex>,
    pub ingest: IngestSettings,
}

impl AppState {
    pub fn new(config: Config, store: RecordStore, objects: Arc<dyn ObjectStore>, faces: Arc<dyn FaceIndex>) -> Self {
        Self {
            started_at: std::time::Instant::now(),
            config,
            store,
            objects,
            faces,
            ingest: IngestSettings::default(),
        }
    }

    pub fn with_ingest_settings(mut self, ingest: IngestSettings) -> Self {
        self.ingest = ingest;
        self
    }
}

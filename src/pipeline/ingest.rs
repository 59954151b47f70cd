use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::AppResult;
use crate::pipeline::resize::{self, downscale_to_jpeg, needs_downscale};
use crate::utils::path::{file_extension, is_allowed_file, unique_name, TempFile};
use crate::AppState;

#[derive(Clone, Debug)]
pub struct IngestSettings {
    pub resize_threshold_bytes: u64,
    pub max_dimension: u32,
    pub jpeg_quality: u8,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            resize_threshold_bytes: resize::RESIZE_THRESHOLD_BYTES,
            max_dimension: resize::MAX_DIMENSION,
            jpeg_quality: resize::JPEG_QUALITY,
        }
    }
}

#[derive(Clone, Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct IngestReport {
    pub stored: usize,
    pub skipped: usize,
    pub downscaled: usize,
    pub faces_indexed: usize,
}

#[derive(Clone, Debug)]
pub struct StoredPhoto {
    pub url: String,
    pub face_ids: Vec<String>,
    pub downscaled: bool,
}

/// Store and index every allowed file of one upload request.
///
/// Files with a disallowed extension are skipped. The first failure aborts the rest of the
/// batch; photos and face records written for earlier files stay in place.
pub async fn ingest_batch(state: &AppState, files: Vec<UploadedFile>) -> AppResult<IngestReport> {
    let mut report = IngestReport::default();
    for file in files {
        if !is_allowed_file(&file.file_name, &state.config.allowed_extensions) {
            debug!("Skipping {:?}: extension not allowed", file.file_name);
            report.skipped += 1;
            continue;
        }
        let stored = ingest_one(state, file).await?;
        debug!("Stored {} with {} faces indexed", stored.url, stored.face_ids.len());
        report.stored += 1;
        report.faces_indexed += stored.face_ids.len();
        if stored.downscaled {
            report.downscaled += 1;
        }
    }
    info!(
        "Upload finished: {} stored, {} skipped, {} downscaled, {} faces indexed",
        report.stored, report.skipped, report.downscaled, report.faces_indexed
    );
    Ok(report)
}

pub async fn ingest_one(state: &AppState, file: UploadedFile) -> AppResult<StoredPhoto> {
    let settings = &state.ingest;
    let ext = file_extension(&file.file_name).unwrap_or_default();
    let name = unique_name(&ext);

    let original = TempFile::new(state.config.temp_dir.join(format!("original-{}", name)));
    tokio::fs::write(original.path(), &file.bytes).await?;
    let size = tokio::fs::metadata(original.path()).await?.len();

    let resized = if needs_downscale(size, settings.resize_threshold_bytes) {
        // Guard first so a half-written output is still removed on failure.
        let guard = TempFile::new(state.config.temp_dir.join(format!("resized-{}", name)));
        let src = original.path().to_path_buf();
        let dst = guard.path().to_path_buf();
        let (max_dim, quality) = (settings.max_dimension, settings.jpeg_quality);
        let (w, h) = tokio::task::spawn_blocking(move || downscale_to_jpeg(&src, &dst, max_dim, quality)).await??;
        info!("Downscaled {} ({} bytes) to {}x{} for recognition", name, size, w, h);
        Some(guard)
    } else {
        None
    };

    let content_type = mime_guess::from_path(&name).first_raw().unwrap_or("application/octet-stream");
    state
        .objects
        .put_object(&name, file.bytes.to_vec(), content_type)
        .await?;
    let url = state.objects.public_url(&name);

    let payload = match &resized {
        Some(r) => tokio::fs::read(r.path()).await?,
        None => file.bytes.to_vec(),
    };
    let face_ids = state.faces.index_faces(payload, &name).await?;
    for face_id in &face_ids {
        state.store.upsert_face_record(face_id, &url).await;
    }

    Ok(StoredPhoto { url, face_ids, downscaled: resized.is_some() })
}

use std::collections::BTreeSet;
use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::cloud::ObjectStore;
use crate::error::AppResult;
use crate::utils::path::{object_key_from_url, unique_name, TempFile};
use crate::AppState;

pub const MAX_MATCHES: i32 = 5;
/// High-precision similarity cut-off, on the recognition service's 0-100 scale.
pub const MATCH_THRESHOLD: f32 = 98.0;
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(3600);

/// Find the photos a selfie appears in.
///
/// Returns presigned URLs when at least one could be minted, otherwise the stored URLs.
/// No match is an empty list, not an error.
pub async fn search_by_selfie(state: &AppState, probe: Bytes) -> AppResult<Vec<String>> {
    let temp = TempFile::new(state.config.temp_dir.join(unique_name("jpg")));
    tokio::fs::write(temp.path(), &probe).await?;
    let image = tokio::fs::read(temp.path()).await?;

    let matched = state.faces.search_faces_by_image(image, MAX_MATCHES, MATCH_THRESHOLD).await;
    drop(temp);
    let face_ids = matched?;
    debug!("Selfie matched {} faces", face_ids.len());

    if face_ids.is_empty() {
        return Ok(Vec::new());
    }

    let photo_urls = state.store.find_photos_by_face_ids(&face_ids).await;
    let signed = sign_urls(state.objects.as_ref(), &photo_urls).await;
    if signed.is_empty() {
        Ok(photo_urls.into_iter().collect())
    } else {
        Ok(signed)
    }
}

/// Presign each stored URL; URLs that fail to sign are left out.
pub async fn sign_urls(objects: &dyn ObjectStore, urls: &BTreeSet<String>) -> Vec<String> {
    let mut signed = Vec::with_capacity(urls.len());
    for url in urls {
        match objects.signed_url(object_key_from_url(url), SIGNED_URL_TTL).await {
            Ok(s) => signed.push(s),
            Err(e) => warn!("Error generating presigned URL for {}: {}", url, e),
        }
    }
    signed
}

use std::collections::HashSet;

use tracing::{info, warn};

use crate::error::AppResult;
use crate::utils::path::object_key_from_url;
use crate::AppState;

/// Delete every gallery object referenced by a face record, then every record.
///
/// Keys the object store refuses to delete are logged and the records are removed anyway.
/// Faces stay in the recognition collection; searches that hit them resolve to nothing.
pub async fn delete_all_photos(state: &AppState) -> AppResult<usize> {
    let urls = state.store.list_all_photos().await;
    let mut seen = HashSet::new();
    let keys: Vec<String> = urls
        .iter()
        .map(|u| object_key_from_url(u).to_string())
        .filter(|k| seen.insert(k.clone()))
        .collect();

    if keys.is_empty() {
        info!("No objects to delete from storage");
    } else {
        let failed = state.objects.delete_objects(&keys).await?;
        if !failed.is_empty() {
            warn!("{} of {} objects were not deleted from storage", failed.len(), keys.len());
        }
    }

    state.store.delete_all_records().await;
    Ok(keys.len())
}

use std::sync::Arc;

use axum::extract::{Multipart, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::api::views;
use crate::error::{AppError, AppResult};
use crate::pipeline::lookup;
use crate::AppState;

pub async fn index() -> Html<String> {
    views::index_page()
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let faces = state.store.count_faces().await;
    let body = json!({
        "status": if faces.is_some() { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "database": "SQLite",
        "faces": faces,
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    });
    (StatusCode::OK, Json(body))
}

/// Pull the `selfie` file out of a multipart body.
pub async fn read_selfie(multipart: Option<Multipart>) -> AppResult<Bytes> {
    let mut multipart = multipart.ok_or_else(|| AppError::Validation("No selfie provided".to_string()))?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("selfie") {
            continue;
        }
        if field.file_name().map_or(true, str::is_empty) {
            return Err(AppError::Validation("No selfie selected".to_string()));
        }
        return field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e)));
    }
    Err(AppError::Validation("No selfie provided".to_string()))
}

pub async fn search(State(state): State<Arc<AppState>>, multipart: Option<Multipart>) -> Result<Json<Value>, AppError> {
    let probe = read_selfie(multipart).await?;
    let photo_urls = lookup::search_by_selfie(&state, probe).await.map_err(|e| {
        error!("Search error: {}", e);
        e
    })?;
    info!("Search returned {} photos", photo_urls.len());
    Ok(Json(json!({ "photo_urls": photo_urls })))
}

/// Values of every `photos` parameter in a query string, in order.
pub fn photos_from_query(raw: &str) -> Vec<String> {
    raw.split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(k, _)| *k == "photos")
        .filter_map(|(_, v)| urlencoding::decode(&v.replace('+', " ")).ok().map(|s| s.into_owned()))
        .filter(|v| !v.is_empty())
        .collect()
}

pub async fn gallery(RawQuery(query): RawQuery) -> Html<String> {
    let photos = query.as_deref().map(photos_from_query).unwrap_or_default();
    views::gallery_page(&photos)
}

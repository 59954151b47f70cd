use axum::extract::DefaultBodyLimit;
use axum::{Router, routing::{get, post}};
use std::sync::Arc;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;
use crate::AppState;
use crate::api::{handlers, handlers_admin};

pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/search", post(handlers::search))
        .route("/gallery", get(handlers::gallery))
        .route("/admin", get(handlers_admin::admin_panel).post(handlers_admin::admin_login))
        .route("/admin/logout", post(handlers_admin::admin_logout))
        .route("/admin/upload", post(handlers_admin::upload_photos))
        .route("/admin/all_photos", get(handlers_admin::all_photos))
        .route("/admin/delete_all_photos", post(handlers_admin::delete_all_photos))
        .route("/admin/faces", get(handlers_admin::faces))
        .route("/admin/faces/:face_id", get(handlers_admin::face_photos))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

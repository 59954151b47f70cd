use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tower_cookies::Cookies;
use tracing::{error, info, warn};

use crate::api::session::{self, AuthContext, Flash};
use crate::api::views;
use crate::pipeline::{self, UploadedFile};
use crate::AppState;

fn flash_redirect(cookies: &Cookies, category: &str, message: &str) -> Response {
    session::set_flash(cookies, category, message);
    Redirect::to("/admin").into_response()
}

fn unauthorized(cookies: &Cookies) -> Response {
    flash_redirect(cookies, "danger", "Unauthorized access")
}

pub async fn admin_panel(auth: AuthContext, cookies: Cookies) -> Response {
    let flash = session::take_flash(&cookies);
    if auth.is_admin() {
        views::admin_page(flash.as_ref()).into_response()
    } else {
        views::login_page(flash.as_ref()).into_response()
    }
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    password: String,
}

pub async fn admin_login(State(state): State<Arc<AppState>>, cookies: Cookies, Form(form): Form<LoginForm>) -> Response {
    if form.password == state.config.admin_password {
        if let Err(e) = session::start_admin_session(&cookies, &state.config.session_secret) {
            error!("Admin login failed: {}", e);
            let flash = Flash { category: "danger".to_string(), message: e.to_string() };
            return views::login_page(Some(&flash)).into_response();
        }
        info!("Admin login succeeded");
        flash_redirect(&cookies, "success", "Logged in successfully!")
    } else {
        warn!("Admin login failed: invalid password");
        let flash = Flash { category: "danger".to_string(), message: "Invalid password".to_string() };
        views::login_page(Some(&flash)).into_response()
    }
}

pub async fn admin_logout(cookies: Cookies) -> Response {
    session::end_admin_session(&cookies);
    flash_redirect(&cookies, "info", "You have been logged out.")
}

async fn read_photos(multipart: &mut Multipart) -> Result<Vec<UploadedFile>, axum::extract::multipart::MultipartError> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("photos") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        files.push(UploadedFile { file_name, bytes });
    }
    Ok(files)
}

pub async fn upload_photos(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    cookies: Cookies,
    multipart: Option<Multipart>,
) -> Response {
    if !auth.is_admin() {
        return unauthorized(&cookies);
    }
    let Some(mut multipart) = multipart else {
        return flash_redirect(&cookies, "message", "No file part");
    };
    let files = match read_photos(&mut multipart).await {
        Ok(files) => files,
        Err(e) => {
            error!("Admin upload error: {}", e);
            return flash_redirect(&cookies, "danger", &format!("Error uploading photos: {}", e));
        }
    };
    if files.is_empty() {
        return flash_redirect(&cookies, "message", "No file part");
    }
    if files[0].file_name.is_empty() {
        return flash_redirect(&cookies, "message", "No selected file");
    }

    match pipeline::ingest_batch(&state, files).await {
        Ok(_) => flash_redirect(&cookies, "success", "Photos uploaded and indexed successfully!"),
        Err(e) => {
            error!("Admin upload error: {}", e);
            flash_redirect(&cookies, "danger", &format!("Error uploading photos: {}", e))
        }
    }
}

/// Distinct photo URLs, newest first.
fn distinct_in_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
}

pub async fn all_photos(State(state): State<Arc<AppState>>, auth: AuthContext, cookies: Cookies) -> Response {
    if !auth.is_admin() {
        return unauthorized(&cookies);
    }
    let photos = distinct_in_order(state.store.list_all_photos().await);
    views::all_photos_page(&photos).into_response()
}

pub async fn delete_all_photos(State(state): State<Arc<AppState>>, auth: AuthContext, cookies: Cookies) -> Response {
    if !auth.is_admin() {
        return unauthorized(&cookies);
    }
    match pipeline::delete_all_photos(&state).await {
        Ok(n) => {
            info!("Deleted {} photos from storage and all face records", n);
            flash_redirect(&cookies, "success", "All photos deleted from S3 and database!")
        }
        Err(e) => {
            error!("Error deleting all photos: {}", e);
            flash_redirect(&cookies, "danger", &format!("Error deleting photos: {}", e))
        }
    }
}

pub async fn faces(State(state): State<Arc<AppState>>, auth: AuthContext, cookies: Cookies) -> Response {
    if !auth.is_admin() {
        return unauthorized(&cookies);
    }
    let faces = state.store.list_unique_face_ids_with_counts().await;
    views::faces_page(&faces).into_response()
}

pub async fn face_photos(
    State(state): State<Arc<AppState>>,
    auth: AuthContext,
    cookies: Cookies,
    Path(face_id): Path<String>,
) -> Response {
    if !auth.is_admin() {
        return unauthorized(&cookies);
    }
    let photos = state.store.list_photos_for_face_id(&face_id).await;
    views::face_photos_page(&face_id, &photos).into_response()
}

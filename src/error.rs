use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Outcome of a failed ingestion, lookup or admin operation.
///
/// Flows return this untouched; the HTTP boundary decides whether it becomes a JSON body
/// (search API) or a flashed message with a redirect (admin pages).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("recognition error: {0}")]
    Recognition(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

pub type AppResult<T> = Result<T, AppError>;

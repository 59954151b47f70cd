use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Lowercased extension of an uploaded filename (text after the last `.`).
pub fn file_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    // Only keep plain alphanumeric extensions so the generated name stays a single path segment.
    if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn is_allowed_file(file_name: &str, allowed: &BTreeSet<String>) -> bool {
    file_extension(file_name).map(|ext| allowed.contains(&ext)).unwrap_or(false)
}

/// Collision-free storage name: random UUID plus the original extension.
pub fn unique_name(ext: &str) -> String {
    if ext.is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        format!("{}.{}", uuid::Uuid::new_v4(), ext)
    }
}

/// Object key for a stored photo URL: its trailing path segment.
pub fn object_key_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// A request-scoped temporary file, removed when the guard is dropped.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove temp file {:?}: {}", self.path, e);
            }
        }
    }
}

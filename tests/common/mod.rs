#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use facefind::api::routes;
use facefind::cloud::{FaceIndex, ObjectStore};
use facefind::db::RecordStore;
use facefind::error::{AppError, AppResult};
use facefind::pipeline::IngestSettings;
use facefind::utils::config::Config;
use facefind::AppState;
use parking_lot::Mutex;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const ADMIN_PASSWORD: &str = "test-password";

/// Create a record store backed by a fresh SQLite file.
pub fn setup_test_store() -> (TempDir, RecordStore) {
    let tmp = TempDir::new().unwrap();
    let url = format!("sqlite://{}", tmp.path().join("db").join("facefind.db").display());
    let store = RecordStore::open(Some(&url)).unwrap();
    (tmp, store)
}

pub fn test_config(tmp: &TempDir) -> Config {
    let temp_dir = tmp.path().join("scratch");
    std::fs::create_dir_all(&temp_dir).unwrap();
    let mut vars = HashMap::new();
    vars.insert("TEMP_DIR", temp_dir.display().to_string());
    vars.insert("ADMIN_PASSWORD", ADMIN_PASSWORD.to_string());
    vars.insert("SESSION_SECRET", "test-session-secret".to_string());
    Config::from_lookup(|k| vars.get(k).cloned())
}

#[derive(Clone, Debug)]
pub struct PutRecord {
    pub key: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Object store that keeps everything in memory.
#[derive(Default)]
pub struct FakeObjectStore {
    pub puts: Mutex<Vec<PutRecord>>,
    pub deleted: Mutex<Vec<String>>,
    pub fail_signing: Mutex<bool>,
    pub fail_delete: Mutex<bool>,
    /// Keys the store reports back as not deleted.
    pub undeletable: Mutex<BTreeSet<String>>,
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn put_object(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<()> {
        self.puts.lock().push(PutRecord { key: key.to_string(), bytes, content_type: content_type.to_string() });
        Ok(())
    }

    async fn delete_objects(&self, keys: &[String]) -> AppResult<Vec<String>> {
        if *self.fail_delete.lock() {
            return Err(AppError::Storage("AccessDenied".to_string()));
        }
        let undeletable = self.undeletable.lock();
        let (failed, deleted): (Vec<String>, Vec<String>) = keys.iter().cloned().partition(|k| undeletable.contains(k));
        self.deleted.lock().extend(deleted);
        Ok(failed)
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> AppResult<String> {
        if *self.fail_signing.lock() {
            return Err(AppError::Storage("signing unavailable".to_string()));
        }
        Ok(format!("{}?X-Amz-Expires={}", self.public_url(key), ttl.as_secs()))
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://test-bucket.s3.test.amazonaws.com/{}", key)
    }
}

/// Face index returning canned results.
#[derive(Default)]
pub struct FakeFaceIndex {
    /// Face ids handed out by successive `index_faces` calls, front first.
    pub index_results: Mutex<Vec<Vec<String>>>,
    pub search_result: Mutex<Vec<String>>,
    pub fail_search: Mutex<bool>,
    pub fail_index: Mutex<bool>,
    /// Payloads received by `index_faces`, with their external reference.
    pub indexed: Mutex<Vec<(String, Vec<u8>)>>,
    /// Probe payloads with the requested match limit and similarity threshold.
    pub searched: Mutex<Vec<(Vec<u8>, i32, f32)>>,
}

#[async_trait]
impl FaceIndex for FakeFaceIndex {
    async fn index_faces(&self, image: Vec<u8>, external_ref: &str) -> AppResult<Vec<String>> {
        if *self.fail_index.lock() {
            return Err(AppError::Recognition("InvalidImageFormatException".to_string()));
        }
        self.indexed.lock().push((external_ref.to_string(), image));
        let mut results = self.index_results.lock();
        if results.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(results.remove(0))
        }
    }

    async fn search_faces_by_image(&self, image: Vec<u8>, max_results: i32, threshold: f32) -> AppResult<Vec<String>> {
        self.searched.lock().push((image, max_results, threshold));
        if *self.fail_search.lock() {
            return Err(AppError::Recognition("InvalidParameterException".to_string()));
        }
        Ok(self.search_result.lock().clone())
    }
}

pub struct TestApp {
    pub tmp: TempDir,
    pub state: Arc<AppState>,
    pub objects: Arc<FakeObjectStore>,
    pub faces: Arc<FakeFaceIndex>,
}

/// Create AppState for testing, wired to in-memory fakes.
pub fn create_test_app(ingest: IngestSettings) -> TestApp {
    let (tmp, store) = setup_test_store();
    let config = test_config(&tmp);
    let objects = Arc::new(FakeObjectStore::default());
    let faces = Arc::new(FakeFaceIndex::default());
    let state = Arc::new(
        AppState::new(config, store, objects.clone(), faces.clone()).with_ingest_settings(ingest),
    );
    TestApp { tmp, state, objects, faces }
}

/// Serve the router on an ephemeral port.
pub async fn spawn_server(state: Arc<AppState>) -> u16 {
    let app = routes::router(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let listener = TcpListener::bind(&addr).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    port
}

/// Helper to make HTTP requests to test server
pub struct TestClient {
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestClient {
    /// Client that keeps cookies and never follows redirects.
    pub fn new(port: u16) -> Self {
        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            client: reqwest::Client::builder()
                .cookie_store(true)
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .unwrap(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client.get(self.url(path)).send().await
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Result<reqwest::Response> {
        self.client.post(self.url(path)).form(form).send().await
    }

    pub async fn post_multipart(&self, path: &str, form: reqwest::multipart::Form) -> reqwest::Result<reqwest::Response> {
        self.client.post(self.url(path)).multipart(form).send().await
    }

    pub async fn login(&self) {
        let resp = self.post_form("/admin", &[("password", ADMIN_PASSWORD)]).await.unwrap();
        assert_eq!(resp.status(), 303);
    }
}

pub fn file_part(name: &str, bytes: Vec<u8>) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(bytes).file_name(name.to_string())
}

/// Encode a noisy RGB image as PNG, so the file stays roughly `width * height * 3` bytes.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        let n = (x.wrapping_mul(7919) ^ y.wrapping_mul(104_729)).wrapping_mul(2_654_435_761);
        image::Rgb([(n >> 8) as u8, (n >> 16) as u8, (n >> 24) as u8])
    });
    let mut out = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), image::ImageOutputFormat::Png)
        .unwrap();
    out
}

/// Files left behind in the scratch directory.
pub fn scratch_files(state: &AppState) -> Vec<String> {
    std::fs::read_dir(&state.config.temp_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect()
}

pub mod schema;
pub mod writer;
pub mod query;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::models::face::{FaceRecord, FaceSummary};

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

pub fn open_or_create<P: AsRef<Path>>(db_path: P) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    schema::apply_pragmas(&conn)?;
    schema::apply_schema(&conn)?;
    Ok(conn)
}

pub fn create_pool<P: AsRef<Path>>(db_path: P, max_size: u32) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path.as_ref()).with_init(|c| {
        c.busy_timeout(Duration::from_secs(5))?;
        c.pragma_update(None, "synchronous", "NORMAL")
    });
    let pool = r2d2::Pool::builder()
        .max_size(max_size)
        .connection_timeout(Duration::from_secs(5))
        .build(manager)?;
    Ok(pool)
}

/// Resolve a `DATABASE_URL` (`sqlite://path`, `sqlite:path` or a bare path) to a file path.
pub fn database_path(url: &str) -> AppResult<PathBuf> {
    let url = url.trim();
    let path = if let Some(rest) = url.strip_prefix("sqlite://") {
        rest
    } else if let Some(rest) = url.strip_prefix("sqlite:") {
        rest
    } else if url.contains("://") {
        return Err(AppError::Config(format!("unsupported database url scheme: {}", url)));
    } else {
        url
    };
    if path.is_empty() {
        return Err(AppError::Config("DATABASE_URL does not name a database file".to_string()));
    }
    Ok(PathBuf::from(path))
}

/// Persistence for face records.
///
/// Every operation checks a connection out of the pool for its own duration. Failures are
/// logged and turned into an empty result (reads) or swallowed (writes), so callers only
/// notice a broken database through missing data.
#[derive(Clone)]
pub struct RecordStore {
    pool: DbPool,
}

impl RecordStore {
    /// Open the store named by `DATABASE_URL`, creating the schema if needed.
    pub fn open(database_url: Option<&str>) -> AppResult<Self> {
        let url = database_url
            .ok_or_else(|| AppError::Config("DATABASE_URL is not set; cannot connect to the database".to_string()))?;
        let path = database_path(url)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        open_or_create(&path).map_err(|e| AppError::Database(e.to_string()))?;
        let pool = create_pool(&path, 8).map_err(|e| AppError::Database(e.to_string()))?;
        info!("Database initialized at {:?}", path);
        Ok(Self { pool })
    }

    async fn run<T, F>(&self, op: &'static str, fallback: T, f: F) -> T
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let res = tokio::task::spawn_blocking(move || -> Result<T> {
            let conn = pool.get()?;
            f(&conn)
        })
        .await;
        match res {
            Ok(Ok(v)) => v,
            Ok(Err(e)) => {
                error!("Error {}: {}", op, e);
                fallback
            }
            Err(e) => {
                error!("Task error {}: {}", op, e);
                fallback
            }
        }
    }

    pub async fn upsert_face_record(&self, face_id: &str, photo_url: &str) {
        let record = FaceRecord { face_id: face_id.to_string(), photo_url: photo_url.to_string() };
        self.run("adding face record", (), move |conn| writer::add_face_record(conn, &record))
            .await
    }

    pub async fn find_photos_by_face_ids(&self, face_ids: &[String]) -> BTreeSet<String> {
        if face_ids.is_empty() {
            return BTreeSet::new();
        }
        let face_ids = face_ids.to_vec();
        self.run("getting photos by face IDs", BTreeSet::new(), move |conn| {
            query::get_photos_by_face_ids(conn, &face_ids)
        })
        .await
    }

    pub async fn list_all_photos(&self) -> Vec<String> {
        self.run("getting all photos", Vec::new(), query::get_all_photos).await
    }

    pub async fn delete_all_records(&self) {
        let deleted = self
            .run("deleting all face records", None, |conn| writer::delete_all_face_records(conn).map(Some))
            .await;
        if let Some(n) = deleted {
            info!("Deleted {} face records from database", n);
        }
    }

    pub async fn list_unique_face_ids_with_counts(&self) -> Vec<FaceSummary> {
        self.run("getting unique face IDs with counts", Vec::new(), query::get_unique_face_ids_with_counts)
            .await
    }

    pub async fn list_photos_for_face_id(&self, face_id: &str) -> Vec<String> {
        let face_id = face_id.to_string();
        self.run("getting photos by single face ID", Vec::new(), move |conn| {
            query::get_photos_by_single_face_id(conn, &face_id)
        })
        .await
    }

    pub async fn count_faces(&self) -> Option<i64> {
        self.run("counting faces", None, |conn| query::count_faces(conn).map(Some)).await
    }
}

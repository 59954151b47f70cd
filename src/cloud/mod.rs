//! Seams to the managed services the application delegates to: the object store that holds
//! gallery photos and the recognition service that owns the face collection.

pub mod rekognition;
pub mod s3;

use std::time::Duration;

use async_trait::async_trait;

use crate::error::AppResult;

pub use rekognition::RekognitionFaceIndex;
pub use s3::S3ObjectStore;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` with a public-read ACL.
    async fn put_object(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<()>;

    /// Delete `keys`, returning the keys the store refused to delete.
    async fn delete_objects(&self, keys: &[String]) -> AppResult<Vec<String>>;

    /// Time-limited GET URL for a private object.
    async fn signed_url(&self, key: &str, ttl: Duration) -> AppResult<String>;

    /// Durable URL recorded for a stored object.
    fn public_url(&self, key: &str) -> String;
}

#[async_trait]
pub trait FaceIndex: Send + Sync {
    /// Add every face found in `image` to the collection, returning the new face ids.
    async fn index_faces(&self, image: Vec<u8>, external_ref: &str) -> AppResult<Vec<String>>;

    /// Face ids in the collection that match the largest face in `image`.
    async fn search_faces_by_image(&self, image: Vec<u8>, max_results: i32, threshold: f32) -> AppResult<Vec<String>>;
}

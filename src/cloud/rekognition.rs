use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Attribute, Image};
use aws_sdk_rekognition::Client as RekognitionClient;
use tracing::debug;

use super::FaceIndex;
use crate::error::{AppError, AppResult};

pub struct RekognitionFaceIndex {
    client: RekognitionClient,
    collection_id: String,
}

impl RekognitionFaceIndex {
    pub fn new(sdk_config: &SdkConfig, collection_id: impl Into<String>) -> Self {
        Self { client: RekognitionClient::new(sdk_config), collection_id: collection_id.into() }
    }
}

fn recognition_err<E: std::error::Error>(e: E) -> AppError {
    AppError::Recognition(DisplayErrorContext(e).to_string())
}

fn image_of(bytes: Vec<u8>) -> Image {
    Image::builder().bytes(Blob::new(bytes)).build()
}

#[async_trait]
impl FaceIndex for RekognitionFaceIndex {
    async fn index_faces(&self, image: Vec<u8>, external_ref: &str) -> AppResult<Vec<String>> {
        let out = self
            .client
            .index_faces()
            .collection_id(&self.collection_id)
            .image(image_of(image))
            .external_image_id(external_ref)
            .detection_attributes(Attribute::All)
            .send()
            .await
            .map_err(recognition_err)?;
        let face_ids: Vec<String> = out
            .face_records()
            .iter()
            .filter_map(|r| r.face().and_then(|f| f.face_id()))
            .map(str::to_string)
            .collect();
        debug!("Indexed {} faces for {} in collection {}", face_ids.len(), external_ref, self.collection_id);
        Ok(face_ids)
    }

    async fn search_faces_by_image(&self, image: Vec<u8>, max_results: i32, threshold: f32) -> AppResult<Vec<String>> {
        let out = self
            .client
            .search_faces_by_image()
            .collection_id(&self.collection_id)
            .image(image_of(image))
            .max_faces(max_results)
            .face_match_threshold(threshold)
            .send()
            .await
            .map_err(recognition_err)?;
        Ok(out
            .face_matches()
            .iter()
            .filter_map(|m| m.face().and_then(|f| f.face_id()))
            .map(str::to_string)
            .collect())
    }
}

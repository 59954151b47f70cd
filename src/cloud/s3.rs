use std::time::Duration;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, Error as DeleteError, ObjectCannedAcl, ObjectIdentifier};
use aws_sdk_s3::Client as S3Client;
use tracing::{debug, info, warn};

use super::ObjectStore;
use crate::error::{AppError, AppResult};

/// S3 caps DeleteObjects at this many keys per request.
const DELETE_BATCH: usize = 1000;

pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
    region: String,
}

impl S3ObjectStore {
    pub fn new(sdk_config: &SdkConfig, bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self { client: S3Client::new(sdk_config), bucket: bucket.into(), region: region.into() }
    }
}

fn storage_err<E: std::error::Error>(e: E) -> AppError {
    AppError::Storage(DisplayErrorContext(e).to_string())
}

/// Keys reported back by a DeleteObjects call, each failure logged.
fn failed_keys(bucket: &str, errors: &[DeleteError]) -> Vec<String> {
    errors
        .iter()
        .map(|e| {
            let key = e.key().unwrap_or_default();
            warn!(
                "Failed to delete s3://{}/{}: {} {}",
                bucket,
                key,
                e.code().unwrap_or("?"),
                e.message().unwrap_or("unknown error")
            );
            key.to_string()
        })
        .collect()
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> AppResult<()> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(storage_err)?;
        debug!("Uploaded s3://{}/{} ({} bytes, {})", self.bucket, key, size, content_type);
        Ok(())
    }

    async fn delete_objects(&self, keys: &[String]) -> AppResult<Vec<String>> {
        let mut failed = Vec::new();
        for chunk in keys.chunks(DELETE_BATCH) {
            let objects = chunk
                .iter()
                .map(|k| ObjectIdentifier::builder().key(k).build().map_err(storage_err))
                .collect::<AppResult<Vec<_>>>()?;
            let delete = Delete::builder().set_objects(Some(objects)).quiet(true).build().map_err(storage_err)?;
            let out = self
                .client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(storage_err)?;
            failed.extend(failed_keys(&self.bucket, out.errors()));
        }
        info!("Deleted {} of {} objects from s3://{}", keys.len() - failed.len(), keys.len(), self.bucket);
        Ok(failed)
    }

    async fn signed_url(&self, key: &str, ttl: Duration) -> AppResult<String> {
        let presign = PresigningConfig::expires_in(ttl).map_err(storage_err)?;
        let req = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presign)
            .await
            .map_err(storage_err)?;
        Ok(req.uri().to_string())
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://{}.s3.{}.amazonaws.com/{}", self.bucket, self.region, key)
    }
}

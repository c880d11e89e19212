//! Object-storage hosting for generated images

use crate::{EgressError, Result};
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Default lifetime of a hosted image URL, in seconds.
pub const DEFAULT_IMAGE_URL_TTL_SECS: u64 = 3600;

/// Hosts generated image bytes and hands back a time-limited URL.
///
/// A trait seam so the SageMaker adapter can be tested without object storage.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store PNG bytes under a fresh key and return a presigned URL for them.
    async fn store_png(&self, bytes: Vec<u8>) -> Result<String>;
}

/// S3-backed image store with presigned GET URLs.
pub struct S3ImageStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    url_ttl_secs: u64,
}

impl S3ImageStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>, url_ttl_secs: u64) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            url_ttl_secs,
        }
    }
}

#[async_trait]
impl ImageStore for S3ImageStore {
    async fn store_png(&self, bytes: Vec<u8>) -> Result<String> {
        let key = format!("{}.png", Uuid::new_v4());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("image/png")
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| EgressError::Provider {
                status_code: 500,
                message: format!("S3 upload failed: {}", DisplayErrorContext(&e)),
            })?;

        let presigning = PresigningConfig::expires_in(Duration::from_secs(self.url_ttl_secs))
            .map_err(|e| EgressError::Config(format!("Invalid image URL TTL: {}", e)))?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .presigned(presigning)
            .await
            .map_err(|e| EgressError::Provider {
                status_code: 500,
                message: format!("S3 presign failed: {}", DisplayErrorContext(&e)),
            })?;

        debug!(bucket = %self.bucket, key = %key, "Stored generated image");
        Ok(presigned.uri().to_string())
    }
}

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

use crate::config::StorageOptions;
use crate::types::PresignedUrl;

/// Object storage operations the transfer pipeline needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload the file at `path` to `bucket/key`, tagged with `content_type`
    async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<()>;

    /// Presign a GET for `bucket/key` valid for `duration`
    async fn generate_presigned_url(
        &self,
        bucket: &str,
        key: &str,
        duration: Duration,
    ) -> Result<PresignedUrl>;

    /// Remove `bucket/key`
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()>;
}

/// S3 client wrapper for upload and presigned URL operations
pub struct S3Client {
    client: aws_sdk_s3::Client,
}

impl S3Client {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    /// Build a client whose credentials come from the AWS default chain
    /// (environment, profile files, SSO, instance metadata).
    pub async fn from_env(options: &StorageOptions) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(options.region.clone()));
        if let Some(profile) = &options.profile {
            loader = loader.profile_name(profile);
        }
        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint) = &options.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(aws_sdk_s3::Client::from_conf(builder.build()))
    }

    /// Build a client that signs with the given credentials only
    pub fn with_credentials(options: &StorageOptions, credentials: Credentials) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(options.region.clone()))
            .credentials_provider(credentials);
        if let Some(endpoint) = &options.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(aws_sdk_s3::Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    #[instrument(skip(self))]
    async fn upload_file(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> Result<()> {
        info!(
            "Uploading {} to s3://{}/{} as {}",
            path.display(),
            bucket,
            key,
            content_type
        );

        let body = ByteStream::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)
            .with_context(|| format!("Failed to put s3://{bucket}/{key}"))?;

        info!("Uploaded s3://{}/{}", bucket, key);

        Ok(())
    }

    /// Generate a presigned URL for an S3 object
    #[instrument(skip(self))]
    async fn generate_presigned_url(
        &self,
        bucket: &str,
        key: &str,
        duration: Duration,
    ) -> Result<PresignedUrl> {
        info!(
            "Generating presigned URL for s3://{}/{} with duration {:?}",
            bucket, key, duration
        );

        let presigning_config =
            PresigningConfig::expires_in(duration).context("Failed to create presigning config")?;

        let presigned_request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .context("Failed to generate presigned URL")?;

        let presigned = PresignedUrl::new(presigned_request.uri().to_string(), duration);
        info!("Presigned URL expires at {}", presigned.expires_at);

        Ok(presigned)
    }

    #[instrument(skip(self))]
    async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)
            .with_context(|| format!("Failed to delete s3://{bucket}/{key}"))?;

        info!("Deleted s3://{}/{}", bucket, key);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_client() -> S3Client {
        S3Client::with_credentials(
            &StorageOptions::default(),
            Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG", None, None, "test"),
        )
    }

    #[tokio::test]
    async fn test_presigned_url_encodes_bucket_key_and_expiry() {
        let presigned = offline_client()
            .generate_presigned_url("my-bucket", "cat.jpg", Duration::from_secs(3600))
            .await
            .unwrap();

        assert!(presigned.url.contains("my-bucket"));
        assert!(presigned.url.contains("cat.jpg"));
        assert!(presigned.url.contains("X-Amz-Expires=3600"));
        assert!(presigned.url.contains("X-Amz-Credential=AKIDEXAMPLE"));
        assert!(presigned.expires_at > chrono::Utc::now());
    }

    #[tokio::test]
    async fn test_presign_rejects_expiry_over_a_week() {
        let result = offline_client()
            .generate_presigned_url("my-bucket", "cat.jpg", Duration::from_secs(8 * 24 * 3600))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_custom_endpoint_uses_path_style() {
        let options = StorageOptions {
            endpoint_url: Some("http://localhost:9000".to_string()),
            ..StorageOptions::default()
        };
        let client = S3Client::with_credentials(
            &options,
            Credentials::new("AKIDEXAMPLE", "secret", None, None, "test"),
        );

        let presigned = client
            .generate_presigned_url("my-bucket", "cat.jpg", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(presigned
            .url
            .starts_with("http://localhost:9000/my-bucket/cat.jpg?"));
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{TransferError, TransferResult};

/// Region used when none is given
pub const DEFAULT_REGION: &str = "us-east-1";

/// Configuration for a single transfer
#[derive(Debug, Clone)]
pub struct Config {
    /// Source URL (e.g., https://example.com/photos/cat.jpg?token=abc)
    pub image_url: String,
    /// Destination bucket name
    pub bucket: String,
    /// How long the presigned URL stays valid
    pub expiration: Duration,
    /// Key derived from the source URL, also the scratch file name
    pub object_key: String,
    /// Directory holding the scratch copy (default: OS temp dir)
    pub scratch_dir: PathBuf,
    /// How to reach S3
    pub storage: StorageOptions,
}

/// Connection settings for the S3 client
#[derive(Debug, Clone)]
pub struct StorageOptions {
    pub region: String,
    /// S3-compatible endpoint (MinIO, LocalStack); forces path-style addressing
    pub endpoint_url: Option<String>,
    /// Named profile for the credential chain
    pub profile: Option<String>,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            profile: None,
        }
    }
}

impl Config {
    pub fn new(image_url: String, bucket: String, expiration_secs: u64) -> TransferResult<Self> {
        url::Url::parse(&image_url)
            .map_err(|e| TransferError::usage(format!("invalid image URL {image_url}: {e}")))?;

        if bucket.is_empty() {
            return Err(TransferError::usage("bucket name must not be empty"));
        }

        let object_key = object_key_from_url(&image_url).ok_or_else(|| {
            TransferError::usage(format!("cannot derive a file name from {image_url}"))
        })?;

        Ok(Config {
            image_url,
            bucket,
            expiration: Duration::from_secs(expiration_secs),
            object_key,
            scratch_dir: std::env::temp_dir(),
            storage: StorageOptions::default(),
        })
    }

    pub fn with_scratch_dir(mut self, scratch_dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = scratch_dir.into();
        self
    }

    pub fn with_storage(mut self, storage: StorageOptions) -> Self {
        self.storage = storage;
        self
    }

    /// Where the downloaded bytes are staged before upload
    pub fn scratch_path(&self) -> PathBuf {
        scratch_path_in(&self.scratch_dir, &self.object_key)
    }
}

pub(crate) fn scratch_path_in(dir: &Path, key: &str) -> PathBuf {
    dir.join(key)
}

/// Derive the object key from a source URL: the query string is dropped,
/// then the text after the last `/` is kept. Returns `None` when nothing is
/// left.
///
/// The result is not URL-decoded.
pub fn object_key_from_url(url: &str) -> Option<String> {
    // Cut the query first: it may itself contain `/`
    let path = url.split('?').next().unwrap_or(url);
    let key = path.rsplit('/').next().unwrap_or(path);

    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}

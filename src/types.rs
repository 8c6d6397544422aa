use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// Body and declared type of a fetched image
#[derive(Debug, Clone)]
pub struct DownloadedImage {
    pub bytes: Vec<u8>,
    /// `Content-Type` header as sent by the origin, if any
    pub content_type: Option<String>,
}

/// Presigned GET URL with its expiry
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

impl PresignedUrl {
    pub fn new(url: String, valid_for: Duration) -> Self {
        Self {
            url,
            expires_at: Utc::now() + valid_for,
        }
    }
}

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct TransferOutcome {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub presigned: PresignedUrl,
    /// Scratch copy that was staged and then removed
    pub scratch_path: PathBuf,
}

//! Error types for the transfer pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Result type for pipeline operations
pub type TransferResult<T> = Result<T, TransferError>;

/// Errors that can end a transfer, one per pipeline stage
#[derive(Error, Debug)]
pub enum TransferError {
    /// Bad invocation, detected before any network operation
    #[error("Invalid arguments: {0}")]
    Usage(String),

    /// Network failure or non-success HTTP status while fetching the image
    #[error("Failed to download image. {0:#}")]
    Download(anyhow::Error),

    /// Writing or removing the scratch copy failed
    #[error("Scratch file error at {}: {source}", .path.display())]
    Scratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// S3 rejected or never received the object
    #[error("Upload to S3 failed: {0:#}")]
    Upload(anyhow::Error),

    /// The object was uploaded but could not be presigned
    #[error("Failed to generate presigned URL: {0:#}")]
    Presign(anyhow::Error),

    /// Progress output could not be written
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

impl TransferError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn scratch(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Scratch {
            path: path.into(),
            source,
        }
    }
}

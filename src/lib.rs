pub mod config;
pub mod content_type;
pub mod download;
pub mod error;
pub mod pipeline;
pub mod s3;
pub mod scratch;
pub mod types;

pub use config::{object_key_from_url, Config, StorageOptions};
pub use download::Downloader;
pub use error::{TransferError, TransferResult};
pub use pipeline::TransferPipeline;
pub use s3::{ObjectStore, S3Client};
pub use scratch::ScratchFile;
pub use types::*;

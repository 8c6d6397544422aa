//! Download → upload → presign → cleanup, one stage after another.

use std::io::Write;

use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::content_type;
use crate::download::Downloader;
use crate::error::{TransferError, TransferResult};
use crate::s3::ObjectStore;
use crate::scratch::ScratchFile;
use crate::types::TransferOutcome;

/// Moves one image from an HTTP origin into object storage
pub struct TransferPipeline<S> {
    config: Config,
    downloader: Downloader,
    store: S,
}

impl<S: ObjectStore> TransferPipeline<S> {
    pub fn new(config: Config, downloader: Downloader, store: S) -> Self {
        Self {
            config,
            downloader,
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every stage, writing progress lines to `out`.
    ///
    /// The scratch copy is gone when this returns, whatever the outcome.
    #[instrument(skip_all, fields(url = %self.config.image_url, bucket = %self.config.bucket))]
    pub async fn run<W: Write>(&self, out: &mut W) -> TransferResult<TransferOutcome> {
        let config = &self.config;
        let key = config.object_key.as_str();

        writeln!(out, "Downloading image from {}...", config.image_url)?;
        let image = self
            .downloader
            .fetch(&config.image_url)
            .await
            .map_err(TransferError::Download)?;

        let scratch = ScratchFile::write(&config.scratch_dir, key, &image.bytes)
            .await
            .map_err(|e| TransferError::scratch(config.scratch_path(), e))?;
        writeln!(out, "Image saved as {}", scratch.path().display())?;

        let content_type = content_type::resolve(image.content_type.as_deref(), key);
        info!("Resolved content type {} for {}", content_type, key);

        self.store
            .upload_file(&config.bucket, key, scratch.path(), &content_type)
            .await
            .map_err(TransferError::Upload)?;
        writeln!(out, "File uploaded to S3 bucket: {}", config.bucket)?;

        let presigned = match self
            .store
            .generate_presigned_url(&config.bucket, key, config.expiration)
            .await
        {
            Ok(presigned) => presigned,
            Err(e) => {
                error!("Presigning failed, rolling back upload of {}: {:#}", key, e);
                self.rollback_upload().await;
                return Err(TransferError::Presign(e));
            }
        };
        writeln!(
            out,
            "Presigned URL (valid for {} seconds):\n{}",
            config.expiration.as_secs(),
            presigned.url
        )?;

        let scratch_path = scratch
            .remove()
            .map_err(|e| TransferError::scratch(config.scratch_path(), e))?;
        writeln!(out, "Temporary file removed: {}", scratch_path.display())?;

        Ok(TransferOutcome {
            bucket: config.bucket.clone(),
            key: key.to_string(),
            content_type,
            presigned,
            scratch_path,
        })
    }

    /// Best-effort removal of an object whose URL could not be produced
    async fn rollback_upload(&self) {
        let config = &self.config;
        if let Err(e) = self
            .store
            .delete_object(&config.bucket, &config.object_key)
            .await
        {
            warn!(
                "Could not remove s3://{}/{} after failed presign: {:#}",
                config.bucket, config.object_key, e
            );
        }
    }
}

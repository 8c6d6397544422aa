use anyhow::{Context, Result};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, instrument};

use crate::types::DownloadedImage;

/// HTTP client wrapper for fetching source images
#[derive(Debug, Clone, Default)]
pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch the whole body of `url` with a single GET.
    ///
    /// Any non-success status is an error.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<DownloadedImage> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .context("Origin returned an error status")?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let bytes = response
            .bytes()
            .await
            .context("Failed to read response body")?
            .to_vec();

        debug!("Declared content type: {:?}", content_type);
        info!("Downloaded {} bytes from {}", bytes.len(), url);

        Ok(DownloadedImage {
            bytes,
            content_type,
        })
    }
}

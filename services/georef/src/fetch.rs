//! Loading datasets from local paths, OPeNDAP endpoints and plain HTTP.
//!
//! Remote files are fetched in a single request. There is no retry or
//! resume: a failed request surfaces as [`NetCdfError::RemoteFetch`].

use std::time::Duration;

use anyhow::{Context, Result};
use bytes::Bytes;
use grid_common::Dataset;
use netcdf_parser::{load_dataset_from_bytes, DatasetSource, NetCdfError, ReadOptions};
use reqwest::Client;
use tracing::{info, instrument};

/// Loads datasets wherever they live.
pub struct DatasetFetcher {
    client: Client,
}

impl DatasetFetcher {
    /// Create a fetcher whose HTTP requests time out after `request_timeout`.
    pub fn new(request_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    /// Load the dataset at `location`.
    ///
    /// Plain HTTP(S) files are downloaded and parsed from memory; local
    /// files and OPeNDAP URLs are handed to libnetcdf. Reading runs on the
    /// blocking pool since libnetcdf calls are synchronous.
    #[instrument(skip(self, options), fields(location = %location))]
    pub async fn load(&self, location: &str, options: &ReadOptions) -> Result<Dataset> {
        let source = DatasetSource::parse(location);
        let options = options.clone();

        let dataset = match source {
            DatasetSource::Download(url) => {
                let bytes = self.download(&url).await?;
                tokio::task::spawn_blocking(move || load_dataset_from_bytes(&bytes, &options))
                    .await
                    .context("Dataset reader task failed")?
                    .with_context(|| format!("Failed to parse downloaded dataset {}", url))?
            }
            source => {
                let label = source.to_string();
                tokio::task::spawn_blocking(move || source.open(&options))
                    .await
                    .context("Dataset reader task failed")?
                    .with_context(|| format!("Failed to open {}", label))?
            }
        };

        info!(
            dimensions = dataset.dimensions().len(),
            variables = dataset.variables().len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Fetch the full body of `url`.
    pub async fn download(&self, url: &str) -> Result<Bytes, NetCdfError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NetCdfError::remote_fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetCdfError::remote_fetch(url, format!("HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| NetCdfError::remote_fetch(url, e))?;

        info!(url = %url, bytes = bytes.len(), "Downloaded remote dataset");
        Ok(bytes)
    }
}

//! Raw GRIB downloads.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

use forecast_common::{ForecastError, ForecastResult};

/// Source of raw GRIB bytes for a filter URL.
#[async_trait]
pub trait GribSource: Send + Sync {
    async fn fetch(&self, url: &str) -> ForecastResult<Bytes>;
}

/// HTTP(S) source backed by reqwest.
pub struct HttpGribSource {
    client: Client,
}

impl HttpGribSource {
    pub fn new(request_timeout: Duration) -> ForecastResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ForecastError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl GribSource for HttpGribSource {
    #[instrument(skip(self, url), fields(url = %url))]
    async fn fetch(&self, url: &str) -> ForecastResult<Bytes> {
        debug!("Downloading GRIB");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ForecastError::UpstreamFetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ForecastError::UpstreamFetch {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        debug!(bytes = bytes.len(), "Downloaded GRIB");
        Ok(bytes)
    }
}

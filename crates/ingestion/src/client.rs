//! Upstream client: download, decode and parse one variable at a time.

use futures::future::try_join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

use forecast_common::{FetchParameters, ForecastError, ForecastResult, GridField, VariableSelector};

use crate::config::UpstreamConfig;
use crate::decoder::{GribDumpDecoder, GridDecoder};
use crate::message::parse_grid_field;
use crate::nomads::variable_url;
use crate::source::{GribSource, HttpGribSource};

/// Fetches decoded grid fields from the GFS filter.
///
/// A semaphore bounds how many download+decode pipelines run at once across
/// all requests sharing this client.
pub struct UpstreamGribClient {
    base_url: String,
    source: Arc<dyn GribSource>,
    decoder: Arc<dyn GridDecoder>,
    slots: Arc<Semaphore>,
}

impl UpstreamGribClient {
    pub fn new(
        base_url: impl Into<String>,
        source: Arc<dyn GribSource>,
        decoder: Arc<dyn GridDecoder>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            source,
            decoder,
            slots: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// HTTP source and subprocess decoder built from `config`.
    pub fn from_config(config: &UpstreamConfig) -> ForecastResult<Self> {
        let source = HttpGribSource::new(config.request_timeout)?;
        let decoder =
            GribDumpDecoder::from_command_line(&config.decoder_command, config.max_output_bytes)?;
        Ok(Self::new(
            config.base_url.clone(),
            Arc::new(source),
            Arc::new(decoder),
            config.max_concurrent,
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Slots currently free.
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }

    /// Download and decode one variable.
    #[instrument(skip(self, params, selector), fields(variable = selector.variable.code()))]
    pub async fn fetch_variable(
        &self,
        params: &FetchParameters,
        selector: VariableSelector,
    ) -> ForecastResult<GridField> {
        let url = variable_url(&self.base_url, params, selector);

        let _permit = self
            .slots
            .acquire()
            .await
            .map_err(|_| ForecastError::Internal("upstream slots closed".to_string()))?;

        debug!(state = "downloading", url = %url, "Fetching variable");
        let grib = self.source.fetch(&url).await?;

        debug!(state = "decoding", bytes = grib.len(), "Decoding variable");
        let output = self.decoder.decode(grib).await?;

        parse_grid_field(&output, selector)
    }

    /// Fetch every variable of `params` concurrently, in selector order.
    pub async fn fetch_all(&self, params: &FetchParameters) -> ForecastResult<Vec<GridField>> {
        try_join_all(
            params
                .variables
                .iter()
                .map(|selector| self.fetch_variable(params, *selector)),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use forecast_common::{Product, Variable};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use test_utils::{create_test_field, decoder_output, sample_parameters};

    /// Returns decoder JSON directly, picking the variable from the URL.
    #[derive(Default)]
    struct FakeSource {
        urls: Mutex<Vec<String>>,
        active: AtomicUsize,
        peak: AtomicUsize,
        fail_with: Option<u16>,
    }

    #[async_trait]
    impl GribSource for FakeSource {
        async fn fetch(&self, url: &str) -> ForecastResult<Bytes> {
            self.urls.lock().unwrap().push(url.to_string());
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);

            if let Some(status) = self.fail_with {
                return Err(ForecastError::UpstreamStatus {
                    url: url.to_string(),
                    status,
                });
            }

            let selector = Product::all()
                .iter()
                .flat_map(|p| p.variables().iter())
                .find(|s| url.ends_with(&format!("var_{}=on", s.variable.code())))
                .copied()
                .ok_or_else(|| ForecastError::Internal(format!("unexpected url {}", url)))?;
            Ok(Bytes::from(decoder_output(&create_test_field(selector, 4, 3))))
        }
    }

    struct PassthroughDecoder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GridDecoder for PassthroughDecoder {
        async fn decode(&self, grib: Bytes) -> ForecastResult<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(grib.to_vec())
        }
    }

    fn client(source: Arc<FakeSource>, max_concurrent: usize) -> (UpstreamGribClient, Arc<PassthroughDecoder>) {
        let decoder = Arc::new(PassthroughDecoder {
            calls: AtomicUsize::new(0),
        });
        let client = UpstreamGribClient::new("http://mock/filter_", source, decoder.clone(), max_concurrent);
        (client, decoder)
    }

    #[tokio::test]
    async fn test_fetch_all_returns_fields_in_order() {
        let source = Arc::new(FakeSource::default());
        let (client, decoder) = client(source.clone(), 4);
        let params = sample_parameters(Product::Cloud, "LOW");

        let fields = client.fetch_all(&params).await.unwrap();

        let variables: Vec<Variable> = fields.iter().map(|f| f.selector.variable).collect();
        assert_eq!(
            variables,
            vec![Variable::CloudCover, Variable::Precipitation, Variable::SnowPercentage]
        );
        assert_eq!(fields[0].width, 4);
        assert_eq!(decoder.calls.load(Ordering::SeqCst), 3);
        assert_eq!(source.urls.lock().unwrap().len(), 3);
        assert!(source.urls.lock().unwrap()[0].starts_with("http://mock/filter_1p00.pl?"));
    }

    #[tokio::test]
    async fn test_slots_bound_concurrency() {
        let source = Arc::new(FakeSource::default());
        let (client, _) = client(source.clone(), 1);
        let params = sample_parameters(Product::Cloud, "LOW");

        client.fetch_all(&params).await.unwrap();

        assert_eq!(source.peak.load(Ordering::SeqCst), 1);
        assert_eq!(client.available_slots(), 1);
    }

    #[tokio::test]
    async fn test_variables_fetch_concurrently() {
        let source = Arc::new(FakeSource::default());
        let (client, _) = client(source.clone(), 4);
        let params = sample_parameters(Product::Cloud, "LOW");

        client.fetch_all(&params).await.unwrap();

        assert!(source.peak.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn test_upstream_status_propagates() {
        let source = Arc::new(FakeSource {
            fail_with: Some(404),
            ..Default::default()
        });
        let (client, decoder) = client(source, 4);
        let params = sample_parameters(Product::Wind, "HIGH");

        let err = client.fetch_all(&params).await.unwrap_err();
        assert!(matches!(err, ForecastError::UpstreamStatus { status: 404, .. }));
        assert_eq!(err.http_status_code(), 502);
        assert_eq!(decoder.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_from_config_defaults() {
        let client = UpstreamGribClient::from_config(&UpstreamConfig::default()).unwrap();
        assert_eq!(client.base_url(), crate::nomads::DEFAULT_BASE_URL);
        assert_eq!(client.available_slots(), 4);
    }
}

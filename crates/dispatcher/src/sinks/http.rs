//! HttpSink - POSTs each record as JSON to a fixed endpoint

use std::time::Duration;

use contracts::{ContractError, DeliveryError, NotificationSink, SinkResponse, SinkSettings};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tracing::{debug, instrument};

/// Configuration for HttpSink
#[derive(Debug, Clone)]
pub struct HttpSinkConfig {
    /// Target URL
    pub endpoint: Url,
    /// Per-request timeout (None = wait indefinitely)
    pub timeout: Option<Duration>,
}

impl HttpSinkConfig {
    /// Create config from sink settings
    pub fn from_settings(settings: &SinkSettings) -> Result<Self, String> {
        let endpoint_str = settings
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| "missing 'endpoint' setting".to_string())?;

        let endpoint = Url::parse(endpoint_str)
            .map_err(|e| format!("invalid endpoint '{}': {}", endpoint_str, e))?;

        Ok(Self {
            endpoint,
            timeout: settings.timeout_secs.map(Duration::from_secs),
        })
    }
}

/// Sink that delivers records over HTTP
pub struct HttpSink {
    name: String,
    config: HttpSinkConfig,
    client: Client,
}

impl HttpSink {
    /// Create a new HttpSink
    pub fn new(name: impl Into<String>, config: HttpSinkConfig) -> Result<Self, reqwest::Error> {
        let name = name.into();
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        debug!(
            sink = %name,
            endpoint = %config.endpoint,
            timeout = ?config.timeout,
            "HttpSink ready"
        );

        Ok(Self {
            name,
            config,
            client,
        })
    }

    /// Create from settings (for factory)
    pub fn from_settings(settings: &SinkSettings) -> Result<Self, ContractError> {
        let config = HttpSinkConfig::from_settings(settings)
            .map_err(|e| ContractError::sink_setup(&settings.name, e))?;

        Self::new(&settings.name, config)
            .map_err(|e| ContractError::sink_setup(&settings.name, e.to_string()))
    }

    pub fn endpoint(&self) -> &Url {
        &self.config.endpoint
    }
}

impl NotificationSink for HttpSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "http_sink_send",
        skip(self, body),
        fields(sink = %self.name, bytes = body.len())
    )]
    async fn send(&self, body: Vec<u8>) -> Result<SinkResponse, DeliveryError> {
        let response = self
            .client
            .post(self.config.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| DeliveryError::transport(&self.name, e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| DeliveryError::response_body(&self.name, e.to_string()))?;

        debug!(sink = %self.name, status, bytes = body.len(), "Response read");
        Ok(SinkResponse { status, body })
    }
}

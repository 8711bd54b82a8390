//! HTTP transport for the remote API.

use async_trait::async_trait;
use docpipe_config::ConnectorConfig;
use reqwest::{Client, Proxy};
use tracing::{debug, instrument};
use url::Url;

use crate::error::InvokeError;
use crate::invoker::{Invoker, Request};

/// POSTs JSON bodies to `{base_url}{service}{post_suffix}`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
  client: Client,
  base_url: String,
  post_suffix: String,
}

impl HttpTransport {
  /// Build a transport from connector settings.
  pub fn new(config: &ConnectorConfig) -> Result<Self, InvokeError> {
    let mut builder = Client::builder();
    if let Some(proxy) = &config.proxy {
      builder = builder.proxy(Proxy::all(proxy)?);
    }

    Ok(Self {
      client: builder.build()?,
      base_url: config.base_url.clone(),
      post_suffix: config.post_suffix.clone(),
    })
  }

  /// Full endpoint URL for a service.
  pub fn endpoint(&self, service: &str) -> Result<Url, InvokeError> {
    let url = format!("{}{}{}", self.base_url, service, self.post_suffix);
    Url::parse(&url).map_err(|source| InvokeError::InvalidUrl { url, source })
  }
}

#[async_trait]
impl Invoker for HttpTransport {
  #[instrument(name = "http_invoke", skip(self, request), fields(service = %service))]
  async fn invoke(
    &self,
    service: &str,
    request: Request,
  ) -> Result<serde_json::Value, InvokeError> {
    let url = self.endpoint(service)?;

    let response = self.client.post(url).json(&request).send().await?;
    let status = response.status();
    let body = response.text().await?;

    debug!(status = status.as_u16(), bytes = body.len(), "response received");

    if !status.is_success() {
      return Err(InvokeError::Status {
        status: status.as_u16(),
        body,
      });
    }

    // Try to parse body as JSON, fall back to string
    Ok(serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body)))
  }
}

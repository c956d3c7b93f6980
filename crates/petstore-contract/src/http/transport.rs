//! HTTP transport trait and the reqwest implementation

use async_trait::async_trait;
use http::HeaderMap;
use std::fmt;
use std::time::Duration;
use url::Url;

use super::{ApiRequest, ApiResponse};
use crate::config::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
use crate::error::{Error, Result};
use crate::observability::Exchange;

/// Issues a single request and buffers the whole response.
///
/// Implementations must not retry and must not interpret status codes: a 404
/// is a perfectly good answer for a negative scenario. Failing to get any
/// answer at all is reported as `Error::Timeout` or `Error::Connection`.
#[async_trait]
pub trait HttpTransport: Send + Sync + fmt::Debug {
    /// Send `request` to the absolute `url`.
    async fn execute(&self, url: Url, request: &ApiRequest) -> Result<ApiResponse>;

    /// Get the transport name for debugging/logging.
    fn transport_name(&self) -> &'static str;
}

/// Transport backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport with the default timeouts.
    pub fn new() -> Result<Self> {
        Self::with_timeouts(DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT, HeaderMap::new())
    }

    /// Create a transport with explicit timeouts and default headers.
    pub fn with_timeouts(
        timeout: Duration,
        connect_timeout: Duration,
        default_headers: HeaderMap,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|e| Error::HttpClient(e.to_string()))?;

        Ok(Self {
            http_client,
            timeout,
        })
    }

    /// Get the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, url: Url, request: &ApiRequest) -> Result<ApiResponse> {
        let mut req = self
            .http_client
            .request(request.method().clone(), url)
            .timeout(self.timeout);

        if !request.query_pairs().is_empty() {
            req = req.query(request.query_pairs());
        }

        let mut sent_bytes = 0;
        if let Some(body) = request.body() {
            let bytes = serde_json::to_vec(body)?;
            sent_bytes = bytes.len();
            req = req
                .header(http::header::CONTENT_TYPE, "application/json")
                .body(bytes);
        }

        let exchange = Exchange::begin(request, sent_bytes);

        let classify = |e: reqwest::Error| {
            let error = if e.is_timeout() {
                Error::Timeout(self.timeout)
            } else {
                Error::from(e)
            };
            exchange.unanswered(&error);
            error
        };

        let resp = req.send().await.map_err(classify)?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(classify)?.to_vec();
        let elapsed = exchange.answered(status, body.len());

        Ok(ApiResponse::new(status, headers, body, elapsed))
    }

    fn transport_name(&self) -> &'static str {
        "reqwest"
    }
}

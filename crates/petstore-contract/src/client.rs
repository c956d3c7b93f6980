//! Client for the service under test

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::{
    config::ContractConfig,
    error::{Error, Result},
    http::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport},
    resources::{Pets, Store},
};

/// Stateless issuer of requests against one configured service instance.
///
/// Cloning is cheap; clones share the transport.
///
/// # Example
///
/// ```rust,no_run
/// use petstore_contract::ApiClient;
///
/// # async fn example() -> petstore_contract::Result<()> {
/// let client = ApiClient::builder()
///     .base_url("http://localhost:8080/api/v3")
///     .build()?;
///
/// let response = client.pets().get(9999).await?;
/// assert_eq!(response.status_code(), 404);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("transport", &self.inner.transport.transport_name())
            .finish()
    }
}

impl ApiClient {
    /// Create a client for `base_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if `base_url` is not an http(s) URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Create a client from a configuration object.
    pub fn from_config(config: ContractConfig) -> Result<Self> {
        let base_url = parse_base_url(config.resolved_base_url())?;
        let transport = ReqwestTransport::with_timeouts(
            config.timeout,
            config.connect_timeout,
            config.default_headers,
        )?;

        Ok(Self::with_parts(base_url, Arc::new(transport)))
    }

    /// Create a client that sends through a custom transport.
    pub fn from_transport(
        base_url: impl AsRef<str>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        Ok(Self::with_parts(parse_base_url(base_url.as_ref())?, transport))
    }

    fn with_parts(base_url: Url, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                transport,
                base_url,
            }),
        }
    }

    /// Access the `/pet` endpoints.
    ///
    /// The handle shares this client's transport and does not outlive it.
    pub fn pets(&self) -> Pets {
        Pets::new(self.clone())
    }

    /// Access the `/store` endpoints.
    pub fn store(&self) -> Store {
        Store::new(self.clone())
    }

    /// The base URL every path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve a request path against the base URL.
    ///
    /// Paths are appended, not joined, so the `/api/v3` prefix survives.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Url::parse(&format!("{base}/{path}"))
            .map_err(|e| Error::InvalidUrl(format!("cannot build URL for path '{path}': {e}")))
    }

    /// Send an arbitrary request.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(request.path())?;
        self.inner.transport.execute(url, &request).await
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| Error::InvalidUrl(format!("'{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(Error::InvalidUrl(format!(
            "'{raw}': unsupported scheme '{other}'"
        ))),
    }
}

/// Builder for [`ApiClient`].
#[derive(Debug, Default)]
pub struct ApiClientBuilder {
    config: ContractConfig,
}

impl ApiClientBuilder {
    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Add a default header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self> {
        let key_str = key.into();
        let value_str = value.into();

        let key: http::HeaderName = key_str
            .parse()
            .map_err(|_| Error::InvalidHeaderName(key_str.clone()))?;
        let value: http::HeaderValue = value_str
            .parse()
            .map_err(|_| Error::InvalidHeaderValue(value_str.clone()))?;

        self.config.default_headers.insert(key, value);
        Ok(self)
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: ContractConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ApiClient> {
        ApiClient::from_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_BASE_URL;

    #[test]
    fn test_client_builder() {
        let client = ApiClient::builder()
            .base_url("http://petstore.test:9090/api/v3")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(
            client.base_url().as_str(),
            "http://petstore.test:9090/api/v3"
        );
    }

    #[test]
    fn test_client_default_base_url() {
        let client = ApiClient::builder().build().unwrap();
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_url_for_keeps_prefix() {
        let client = ApiClient::new("http://petstore.test:9090/api/v3").unwrap();
        assert_eq!(
            client.url_for("/pet/1").unwrap().as_str(),
            "http://petstore.test:9090/api/v3/pet/1"
        );

        let trailing = ApiClient::new("http://petstore.test:9090/api/v3/").unwrap();
        assert_eq!(
            trailing.url_for("store/inventory").unwrap().as_str(),
            "http://petstore.test:9090/api/v3/store/inventory"
        );
    }

    #[test]
    fn test_client_rejects_non_http_scheme() {
        let result = ApiClient::new("ftp://petstore.test/api/v3");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_resource_handles_share_client_state() {
        let client = ApiClient::new("http://petstore.test/api/v3").unwrap();
        let pets = client.pets();
        assert_eq!(Arc::strong_count(&client.inner), 2);
        drop(pets);
        assert_eq!(Arc::strong_count(&client.inner), 1);
    }

    #[test]
    fn test_client_state_freed_after_drop() {
        let client = ApiClient::new("http://petstore.test/api/v3").unwrap();
        let inner = Arc::downgrade(&client.inner);
        let _ = client.pets();
        let _ = client.store();
        drop(client);
        assert!(inner.upgrade().is_none());
    }
}

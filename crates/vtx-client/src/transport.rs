//! HTTP transport: executes one request and classifies its response.

use std::future::Future;
use std::time::Duration;

use vtx_config::RequestConfig;
use vtx_core::LookupError;

use crate::request::{RawResponse, RequestDescriptor};
use crate::status::check_status;

/// Executes a single request.
///
/// Implementations must return `Ok` for success statuses and for 401, and
/// fail with the classified [`LookupError`] otherwise (see [`check_status`]).
pub trait Transport: Send + Sync + 'static {
    fn execute(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = Result<RawResponse, LookupError>> + Send;
}

/// Synchronous closures act as transports, with the same status checks applied.
/// Handy for scripting backend behavior in tests.
impl<F> Transport for F
where
    F: Fn(&RequestDescriptor) -> Result<RawResponse, LookupError> + Send + Sync + 'static,
{
    fn execute(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = Result<RawResponse, LookupError>> + Send {
        std::future::ready(self(request).and_then(|resp| check_status(resp, &request.url)))
    }
}

/// reqwest-backed transport configured from [`RequestConfig`].
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport honoring the CA bundle, client identity, proxy,
    /// certificate verification, and timeout options.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Config`] if a certificate file cannot be read or
    /// parsed, the proxy URL is invalid, or the client fails to build.
    pub fn new(config: &RequestConfig) -> Result<Self, LookupError> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("vtx/", env!("CARGO_PKG_VERSION")));

        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        if !config.ca.is_empty() {
            let pem = read_pem(&config.ca)?;
            let cert = reqwest::Certificate::from_pem(&pem)
                .map_err(|e| LookupError::Config(format!("invalid CA bundle {}: {e}", config.ca)))?;
            builder = builder.add_root_certificate(cert);
        }

        if config.has_client_identity() {
            let mut pem = read_pem(&config.cert)?;
            pem.extend(read_pem(&config.key)?);
            let identity = reqwest::Identity::from_pem(&pem)
                .map_err(|e| LookupError::Config(format!("invalid client certificate: {e}")))?;
            builder = builder.identity(identity);
        }

        if !config.passphrase.is_empty() {
            tracing::warn!("request.passphrase is set but encrypted keys are not supported; ignoring");
        }

        if !config.proxy.is_empty() {
            let proxy = reqwest::Proxy::all(&config.proxy)
                .map_err(|e| LookupError::Config(format!("invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }

        if config.accepts_invalid_certs() {
            tracing::warn!("TLS certificate verification is disabled (reject_unauthorized = false)");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|e| LookupError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    async fn execute(&self, request: &RequestDescriptor) -> Result<RawResponse, LookupError> {
        let mut builder = self.http.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await.map_err(|error| {
            tracing::debug!(%error, url = %request.url, "HTTP request failed");
            LookupError::network(
                "The server you are trying to connect to is unavailable. Check the Vertex URL option.",
                Some(&request.url),
            )
        })?;

        let raw = RawResponse::from_reqwest(resp).await?;
        tracing::trace!(
            status = raw.status,
            method = request.method.as_str(),
            url = %request.url,
            entity = ?request.entity,
            "HTTP response"
        );
        check_status(raw, &request.url)
    }
}

impl RawResponse {
    /// Drain a reqwest response into an owned [`RawResponse`].
    ///
    /// Header values that are not visible ASCII are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Network`] if the body cannot be read.
    pub async fn from_reqwest(resp: reqwest::Response) -> Result<Self, LookupError> {
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let url = resp.url().to_string();
        let body = resp.text().await.map_err(|e| {
            LookupError::network(format!("failed to read response body: {e}"), Some(&url))
        })?;
        Ok(Self {
            status,
            headers,
            body,
        })
    }
}

fn read_pem(path: &str) -> Result<Vec<u8>, LookupError> {
    std::fs::read(path).map_err(|e| LookupError::Config(format!("failed to read {path}: {e}")))
}

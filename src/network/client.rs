/*!
 * reqwest-backed transport and the typed network manager.
 */

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use super::http::{is_server_error, HttpResponse, Method, RequestDescriptor};
use super::HttpTransport;
use crate::errors::NetworkError;

/// Production transport built on a pooled reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// HTTP client for API requests
    client: Client,
    /// Base URL used when a request does not override it
    base_url: String,
}

impl ReqwestTransport {
    /// Create a transport for `base_url` with a request timeout
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| {
                error!("Failed to build HTTP client: {}", e);
                NetworkError::from(e)
            })?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &RequestDescriptor) -> Result<HttpResponse, NetworkError> {
        let url = request.url(&self.base_url)?;
        debug!("{} {}", request.method, url);

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, url);

        if let Some(payload) = request.body.to_bytes()? {
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(payload);
        }

        if !request.token.is_empty() {
            builder = builder.header(header::AUTHORIZATION, &request.token);
        }

        let response = builder.send().await.map_err(|e| {
            error!("Request to {} failed: {}", request.path, e);
            NetworkError::from(e)
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        Ok(HttpResponse { status, body })
    }
}

/// Typed front of the network gateway
///
/// Maps 5xx statuses to `ServerProblem` before looking at the payload and
/// every lower-level failure to `Transport`. There is no automatic retry.
#[derive(Clone)]
pub struct NetworkManager {
    transport: Arc<dyn HttpTransport>,
}

impl NetworkManager {
    /// Create a manager over any transport
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Create a manager over a reqwest transport
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, NetworkError> {
        Ok(Self::new(Arc::new(ReqwestTransport::new(base_url, timeout_secs)?)))
    }

    /// Perform a request and decode the JSON body into `T`
    pub async fn perform<T: DeserializeOwned>(
        &self,
        request: &RequestDescriptor,
    ) -> Result<T, NetworkError> {
        let response = self.send(request).await?;
        serde_json::from_slice(&response.body).map_err(|e| {
            error!("Failed to decode response of {}: {}", request.path, e);
            NetworkError::from(e)
        })
    }

    /// Perform a request and return only the status code
    pub async fn perform_status(&self, request: &RequestDescriptor) -> Result<u16, NetworkError> {
        Ok(self.send(request).await?.status)
    }

    async fn send(&self, request: &RequestDescriptor) -> Result<HttpResponse, NetworkError> {
        let response = self.transport.execute(request).await?;

        if is_server_error(response.status) {
            error!(
                "Server problem ({}) for {} {}",
                response.status, request.method, request.path
            );
            return Err(NetworkError::ServerProblem {
                status: response.status,
            });
        }

        Ok(response)
    }
}

impl std::fmt::Debug for NetworkManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkManager").finish_non_exhaustive()
    }
}

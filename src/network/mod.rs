/*!
 * Network gateway for the backend and dictionary services.
 *
 * This module contains:
 * - `http`: declarative request descriptors and raw responses
 * - `client`: the reqwest transport and the typed `NetworkManager`
 * - `requests`: backend requests and their response models
 * - `dictionary`: remote dictionary lookups
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::NetworkError;

/// Executes request descriptors against a remote service
///
/// Implementations only move bytes; status classification and decoding
/// happen in `NetworkManager`, so every transport gets the same error
/// mapping.
#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    /// Send `request` and return the raw status and body
    ///
    /// # Returns
    /// * `Result<HttpResponse, NetworkError>` - the response, or a transport error
    async fn execute(&self, request: &RequestDescriptor) -> Result<HttpResponse, NetworkError>;
}

pub mod http;
pub mod client;
pub mod requests;
pub mod dictionary;

pub use client::{NetworkManager, ReqwestTransport};
pub use http::{Body, HttpResponse, Method, Queries, RequestDescriptor};

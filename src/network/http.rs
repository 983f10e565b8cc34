/*!
 * Declarative HTTP request descriptors.
 *
 * A `RequestDescriptor` says what to send (method, path, queries, body,
 * token) without saying how; transports turn it into a real request.
 */

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::NetworkError;

/// Status codes the gateway treats as a server problem
pub const SERVER_ERROR_STATUS: std::ops::RangeInclusive<u16> = 500..=599;

/// Whether `status` belongs to the server-error range
pub fn is_server_error(status: u16) -> bool {
    SERVER_ERROR_STATUS.contains(&status)
}

/// Query string parameters, kept sorted for reproducible URLs
pub type Queries = BTreeMap<String, String>;

/// HTTP verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Request payload variants
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
    /// No payload
    #[default]
    None,
    /// Pre-encoded bytes sent as-is
    Raw(Bytes),
    /// A serialized model
    Model(Value),
    /// Loose key/value JSON object
    KeyValue(Map<String, Value>),
}

impl Body {
    /// Serialize a model into a body
    pub fn model<T: Serialize>(model: &T) -> Result<Self, NetworkError> {
        let value = serde_json::to_value(model)
            .map_err(|e| NetworkError::Transport(format!("Failed to encode body: {}", e)))?;
        Ok(Self::Model(value))
    }

    /// Whether there is anything to send
    pub fn is_none(&self) -> bool {
        matches!(self, Body::None)
    }

    /// Encoded payload bytes, `None` for an empty body
    pub fn to_bytes(&self) -> Result<Option<Bytes>, NetworkError> {
        match self {
            Body::None => Ok(None),
            Body::Raw(data) => Ok(Some(data.clone())),
            Body::Model(value) => Ok(Some(Bytes::from(serde_json::to_vec(value)?))),
            Body::KeyValue(map) => Ok(Some(Bytes::from(serde_json::to_vec(map)?))),
        }
    }
}

/// Everything needed to issue one HTTP request
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestDescriptor {
    /// Base URL overriding the transport's default
    pub base: Option<String>,
    /// HTTP method
    pub method: Method,
    /// Path appended to the base URL
    pub path: String,
    /// Query parameters
    pub queries: Queries,
    /// Payload
    pub body: Body,
    /// Value of the Authorization header; empty means none
    pub token: String,
}

impl RequestDescriptor {
    /// Create a descriptor for `method` on `path`
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Default::default()
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// PUT request
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    /// DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Send to another service than the transport's default
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Add a query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.queries.insert(key.into(), value.to_string());
        self
    }

    /// Set the payload
    pub fn body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Serialize `model` as the payload
    pub fn model<T: Serialize>(self, model: &T) -> Result<Self, NetworkError> {
        Ok(self.body(Body::model(model)?))
    }

    /// Set the Authorization header value
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Full URL for this request against `default_base`
    pub fn url(&self, default_base: &str) -> Result<url::Url, NetworkError> {
        let base = self.base.as_deref().unwrap_or(default_base);
        let raw = format!("{}{}", base, self.path);

        let mut url = url::Url::parse(&raw)
            .map_err(|e| NetworkError::Transport(format!("Can not create url {}: {}", raw, e)))?;

        if !self.queries.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.queries.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url)
    }
}

/// Raw response handed back by a transport
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response payload
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response from a status and body
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

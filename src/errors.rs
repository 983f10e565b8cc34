/*!
 * Error types for the lexicard application.
 *
 * This module contains custom error types for the network gateway, the
 * credential store and the application as a whole, using the thiserror
 * crate for ergonomic error definitions. The persistence gateway has no
 * error type of its own: store failures are absorbed inside the gateway.
 */

use thiserror::Error;

/// Closed set of failures returned by the network gateway
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The server answered with a status code in the 5xx range
    #[error("Server problem: HTTP {status}")]
    ServerProblem {
        /// HTTP status code
        status: u16,
    },

    /// Any lower-level failure: connection, URL construction, body decoding
    #[error("Transport error: {0}")]
    Transport(String),
}

impl NetworkError {
    /// Whether this error was produced by a 5xx response
    pub fn is_server_problem(&self) -> bool {
        matches!(self, Self::ServerProblem { .. })
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(error: serde_json::Error) -> Self {
        Self::Transport(format!("Failed to decode response: {}", error))
    }
}

/// Errors raised by credential store implementations
#[derive(Error, Debug)]
pub enum CredentialError {
    /// Reading or writing the backing file failed
    #[error("Credential storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but could not be parsed
    #[error("Credential storage is corrupted: {0}")]
    Corrupted(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the network gateway
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    /// Error from the credential store
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

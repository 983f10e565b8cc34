/*!
 * Tests for error types and conversions
 */

use lexicard::errors::{AppError, CredentialError, NetworkError};

#[test]
fn test_networkError_serverProblem_shouldDisplayStatus() {
    let error = NetworkError::ServerProblem { status: 503 };
    assert!(error.to_string().contains("503"));
    assert!(error.is_server_problem());
}

#[test]
fn test_networkError_transport_shouldNotBeServerProblem() {
    let error = NetworkError::Transport("connection reset".to_string());
    assert!(error.to_string().contains("connection reset"));
    assert!(!error.is_server_problem());
}

#[test]
fn test_networkError_fromJsonError_shouldBeTransport() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error = NetworkError::from(json_error);
    assert!(matches!(error, NetworkError::Transport(message) if message.contains("decode")));
}

#[test]
fn test_appError_fromNetworkError_shouldWrapCorrectly() {
    let error: AppError = NetworkError::ServerProblem { status: 500 }.into();
    assert!(matches!(error, AppError::Network(NetworkError::ServerProblem { status: 500 })));
    assert!(error.to_string().starts_with("Network error"));
}

#[test]
fn test_appError_fromCredentialError_shouldWrapCorrectly() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: AppError = CredentialError::from(io).into();
    assert!(matches!(error, AppError::Credential(CredentialError::Io(_))));
    assert!(error.to_string().contains("denied"));
}

#[test]
fn test_appError_fromAnyhow_shouldBeUnknown() {
    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(message) if message == "something odd"));
}

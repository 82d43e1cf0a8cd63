//! OAuth 2.0 protocol error types.
//!
//! Implements the error vocabulary of RFC 6749 for the grants this core
//! handles.
//!
//! ## NIST 800-53 Rev5: SI-11 (Error Handling)
//!
//! Validation errors carry enough context to log and audit; storage and
//! transaction failures are wrapped with fixed hints before crossing the
//! core boundary so database error text is never returned to a token
//! requester. No error message contains a secret or a raw token.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OAuth 2.0 errors for token issuance.
#[derive(Debug, Error)]
pub enum OAuth2Error {
    /// Invalid request parameters.
    #[error("invalid_request: {0}")]
    InvalidRequest(String),

    /// Client authentication failed or the client is unknown.
    #[error("invalid_client: {0}")]
    InvalidClient(String),

    /// The grant is invalid for this client (e.g., a public client on
    /// client-credentials, or a disallowed audience).
    #[error("invalid_grant: {0}")]
    InvalidGrant(String),

    /// The client requested a scope outside its configured set.
    #[error("invalid_scope: {0}")]
    InvalidScope(String),

    /// Unsupported grant type.
    #[error("unsupported_grant_type: {0}")]
    UnsupportedGrantType(String),

    /// The configured access-token issuer has no registry entry, so
    /// federation records cannot be created. A deployment configuration
    /// problem, not a transient fault.
    #[error("token issuer '{0}' is not a registered issuer")]
    IssuerNotRegistered(String),

    /// Storage or transaction failure not attributable to caller input.
    #[error("server_error: {0}")]
    ServerError(String),
}

impl OAuth2Error {
    /// Returns the OAuth 2.0 error code (RFC 6749 Section 5.2).
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidClient(_) => "invalid_client",
            Self::InvalidGrant(_) => "invalid_grant",
            Self::InvalidScope(_) => "invalid_scope",
            Self::UnsupportedGrantType(_) => "unsupported_grant_type",
            Self::IssuerNotRegistered(_) | Self::ServerError(_) => "server_error",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest(_)
            | Self::InvalidGrant(_)
            | Self::InvalidScope(_)
            | Self::UnsupportedGrantType(_) => 400,
            Self::InvalidClient(_) => 401,
            Self::IssuerNotRegistered(_) | Self::ServerError(_) => 500,
        }
    }

    /// Creates an error response body for OAuth 2.0.
    #[must_use]
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.error_code().to_string(),
            error_description: Some(self.to_string()),
        }
    }
}

/// OAuth 2.0 error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,

    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

/// Result type for OAuth 2.0 operations.
pub type OAuth2Result<T> = Result<T, OAuth2Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_client_errors() {
        assert_eq!(OAuth2Error::InvalidScope("s".to_string()).http_status(), 400);
        assert_eq!(OAuth2Error::InvalidGrant("g".to_string()).http_status(), 400);
        assert_eq!(
            OAuth2Error::InvalidClient("c".to_string()).http_status(),
            401
        );
    }

    #[test]
    fn issuer_misconfiguration_is_distinct_but_still_a_server_error() {
        let err = OAuth2Error::IssuerNotRegistered("https://sts.internal".to_string());
        assert_eq!(err.error_code(), "server_error");
        assert_eq!(err.http_status(), 500);
        assert!(err.to_string().contains("https://sts.internal"));
    }

    #[test]
    fn error_response_carries_the_code() {
        let response = OAuth2Error::InvalidScope("scope 'admin' not allowed".to_string())
            .to_error_response();
        assert_eq!(response.error, "invalid_scope");
        assert!(response.error_description.unwrap().contains("admin"));
    }
}

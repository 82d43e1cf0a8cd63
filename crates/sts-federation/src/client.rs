//! Outbound userinfo fetch.

use std::time::Duration;

use reqwest::StatusCode;
use sts_model::NewUserInfo;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{FederationError, FederationResult};

/// Default timeout for userinfo requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for remote issuers' userinfo endpoints.
///
/// The subject's raw token authenticates the request as a bearer
/// credential. It is never persisted and never logged.
#[derive(Debug, Clone)]
pub struct UserInfoClient {
    http: reqwest::Client,
}

impl UserInfoClient {
    /// Creates a client with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> FederationResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| FederationError::Request(e.to_string()))?;
        Ok(Self { http })
    }

    /// Creates a client over an existing `reqwest` client, keeping its
    /// timeouts and TLS configuration.
    #[must_use]
    pub const fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Builds the userinfo endpoint URL for an issuer URI.
    fn endpoint(issuer_uri: &str) -> FederationResult<Url> {
        let mut url =
            Url::parse(issuer_uri).map_err(|e| FederationError::Endpoint(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|()| FederationError::Endpoint("issuer URI cannot be a base".to_string()))?
            .pop_if_empty()
            .push("userinfo");

        Ok(url)
    }

    /// Fetches the identity record for the holder of `raw_token` from
    /// the issuer's userinfo endpoint.
    ///
    /// Aborts when the caller drops the future; no retries are made.
    ///
    /// # Errors
    ///
    /// Returns a typed fetch error for malformed issuer URIs, transport
    /// failures, non-200 responses, and undecodable bodies.
    #[instrument(skip(self, raw_token))]
    pub async fn fetch_from_issuer(
        &self,
        issuer_uri: &str,
        raw_token: &str,
    ) -> FederationResult<NewUserInfo> {
        let endpoint = Self::endpoint(issuer_uri)?;
        debug!(%endpoint, "fetching userinfo from issuer");

        let response = self
            .http
            .get(endpoint)
            .bearer_auth(raw_token)
            .send()
            .await
            .map_err(|e| FederationError::Request(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(FederationError::UnexpectedStatus {
                status: response.status().as_u16(),
            });
        }

        response
            .json::<NewUserInfo>()
            .await
            .map_err(|e| FederationError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn endpoint_appends_userinfo_segment() {
        let url = UserInfoClient::endpoint("https://someidp.com").unwrap();
        assert_eq!(url.as_str(), "https://someidp.com/userinfo");

        let url = UserInfoClient::endpoint("https://someidp.com/auth/realm/").unwrap();
        assert_eq!(url.as_str(), "https://someidp.com/auth/realm/userinfo");
    }

    #[test]
    fn malformed_issuer_uri_fails_before_any_request() {
        let err = UserInfoClient::endpoint("://").unwrap_err();
        assert!(matches!(err, FederationError::Endpoint(_)));
    }

    #[tokio::test]
    async fn fetch_parses_userinfo_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("authorization", "Bearer supersecrettoken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "adam",
                "email": "ad@am.com",
                "sub": "super-admin",
                "iss": "https://woo.com",
            })))
            .mount(&server)
            .await;

        let client = UserInfoClient::new().unwrap();
        let info = client
            .fetch_from_issuer(&server.uri(), "supersecrettoken")
            .await
            .unwrap();

        assert_eq!(info.name.as_deref(), Some("adam"));
        assert_eq!(info.email.as_deref(), Some("ad@am.com"));
        assert_eq!(info.subject, "super-admin");
        assert_eq!(info.issuer, "https://woo.com");
    }

    #[tokio::test]
    async fn non_200_response_is_a_typed_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = UserInfoClient::new().unwrap();
        let err = client
            .fetch_from_issuer(&server.uri(), "tok")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FederationError::UnexpectedStatus { status: 500 }
        ));
        assert!(err.is_fetch_error());
    }

    #[tokio::test]
    async fn undecodable_body_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = UserInfoClient::new().unwrap();
        let err = client
            .fetch_from_issuer(&server.uri(), "tok")
            .await
            .unwrap_err();

        assert!(matches!(err, FederationError::Decode(_)));
    }

    #[tokio::test]
    async fn error_messages_never_contain_the_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = UserInfoClient::new().unwrap();
        let err = client
            .fetch_from_issuer(&server.uri(), "supersecrettoken")
            .await
            .unwrap_err();

        assert!(!err.to_string().contains("supersecrettoken"));
    }
}

//! The mint-access-token capability.
//!
//! The grant handler assembles a [`Session`]; a [`TokenSigner`] turns it
//! into a signed access token response. [`JwtSigner`] is the provided
//! implementation; deployments with an external token-issuance service
//! implement the trait over that instead.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use sts_core::scope;
use uuid::Uuid;

use crate::error::{OAuth2Error, OAuth2Result};
use crate::request::AccessRequest;
use crate::session::Session;

/// Mints the signed access token for a populated session.
pub trait TokenSigner: Send + Sync {
    /// Produces the signed access token response.
    ///
    /// # Errors
    ///
    /// Returns `OAuth2Error::ServerError` when the session is incomplete
    /// or signing fails.
    fn mint(&self, request: &AccessRequest, session: &Session) -> OAuth2Result<AccessTokenResponse>;
}

/// OAuth 2.0 access token response (RFC 6749 Section 5.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    /// The signed access token.
    pub access_token: String,
    /// Token type, always `Bearer`.
    pub token_type: String,
    /// Lifetime of the token in seconds.
    pub expires_in: i64,
    /// Space-joined scopes granted, when any were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Supported signing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlgorithm {
    /// ECDSA with P-384 and SHA-384.
    Es384,
    /// RSA PKCS#1 v1.5 with SHA-384.
    Rs384,
    /// RSA PSS with SHA-384.
    Ps384,
    /// HMAC with SHA-384. Symmetric; for tests and single-party setups.
    Hs384,
}

impl SigningAlgorithm {
    const fn jwt_algorithm(self) -> Algorithm {
        match self {
            Self::Es384 => Algorithm::ES384,
            Self::Rs384 => Algorithm::RS384,
            Self::Ps384 => Algorithm::PS384,
            Self::Hs384 => Algorithm::HS384,
        }
    }
}

/// A signing key with its identifier.
pub struct SigningKey {
    /// Key ID placed in the `kid` header of minted tokens.
    pub kid: String,
    /// Signing algorithm.
    pub algorithm: SigningAlgorithm,
    encoding_key: EncodingKey,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .field("encoding_key", &"[REDACTED]")
            .finish()
    }
}

impl SigningKey {
    /// Creates a signing key from a PEM-encoded private key.
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not match the algorithm or the
    /// algorithm is symmetric.
    pub fn from_pem(
        kid: impl Into<String>,
        algorithm: SigningAlgorithm,
        private_key_pem: &[u8],
    ) -> OAuth2Result<Self> {
        let encoding_key = match algorithm {
            SigningAlgorithm::Es384 => EncodingKey::from_ec_pem(private_key_pem)
                .map_err(|e| OAuth2Error::ServerError(format!("invalid signing key: {e}")))?,
            SigningAlgorithm::Rs384 | SigningAlgorithm::Ps384 => {
                EncodingKey::from_rsa_pem(private_key_pem)
                    .map_err(|e| OAuth2Error::ServerError(format!("invalid signing key: {e}")))?
            }
            SigningAlgorithm::Hs384 => {
                return Err(OAuth2Error::ServerError(
                    "HMAC keys are raw secrets, not PEM documents".to_string(),
                ));
            }
        };

        Ok(Self {
            kid: kid.into(),
            algorithm,
            encoding_key,
        })
    }

    /// Creates a symmetric HS384 signing key from a raw secret.
    #[must_use]
    pub fn from_hmac_secret(kid: impl Into<String>, secret: &[u8]) -> Self {
        Self {
            kid: kid.into(),
            algorithm: SigningAlgorithm::Hs384,
            encoding_key: EncodingKey::from_secret(secret),
        }
    }
}

/// JWT-producing [`TokenSigner`].
#[derive(Debug)]
pub struct JwtSigner {
    issuer: String,
    key: SigningKey,
}

impl JwtSigner {
    /// Creates a signer issuing tokens under the given issuer URI.
    ///
    /// The key's `kid` must match what the handler's
    /// [`crate::SigningKeyProvider`] announces, or verifiers will look up
    /// the wrong key.
    #[must_use]
    pub fn new(issuer: impl Into<String>, key: SigningKey) -> Self {
        Self {
            issuer: issuer.into(),
            key,
        }
    }
}

impl TokenSigner for JwtSigner {
    fn mint(&self, request: &AccessRequest, session: &Session) -> OAuth2Result<AccessTokenResponse> {
        let subject = session.subject.as_deref().ok_or_else(|| {
            OAuth2Error::ServerError("session has no subject claim".to_string())
        })?;
        let expires_at = session.expires_at.ok_or_else(|| {
            OAuth2Error::ServerError("session has no expiry".to_string())
        })?;

        let now = Utc::now();
        let mut claims = serde_json::Map::new();
        claims.insert("iss".to_string(), serde_json::json!(self.issuer));
        claims.insert("sub".to_string(), serde_json::json!(subject));
        if !session.granted_audience.is_empty() {
            claims.insert("aud".to_string(), serde_json::json!(session.granted_audience));
        }
        claims.insert("exp".to_string(), serde_json::json!(expires_at.timestamp()));
        claims.insert("iat".to_string(), serde_json::json!(now.timestamp()));
        claims.insert(
            "jti".to_string(),
            serde_json::json!(Uuid::now_v7().to_string()),
        );
        let scope = (!request.requested_scopes.is_empty())
            .then(|| scope::join(&request.requested_scopes));
        if let Some(scope) = &scope {
            claims.insert("scope".to_string(), serde_json::json!(scope));
        }
        for (name, value) in &session.claims {
            claims.insert(name.clone(), value.clone());
        }

        let mut header = Header::new(self.key.algorithm.jwt_algorithm());
        header.kid = Some(self.key.kid.clone());

        let access_token = encode(&header, &claims, &self.key.encoding_key)
            .map_err(|e| OAuth2Error::ServerError(format!("token signing failed: {e}")))?;

        Ok(AccessTokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: (expires_at - now).num_seconds(),
            scope,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
    use sts_model::OAuthClient;

    fn request() -> AccessRequest {
        AccessRequest::client_credentials(OAuthClient {
            id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            name: "svc".to_string(),
            secret: Some("hash".to_string()),
            audience: vec!["api.internal".to_string()],
            scope: "read write".to_string(),
        })
        .with_scope("read")
    }

    fn session() -> Session {
        let mut session = Session::new();
        session.set_subject("urn:sts:user/0193e5d4-0000-7000-8000-000000000000");
        session.grant_audience("api.internal");
        session.expires_at = Some(Utc::now() + Duration::seconds(300));
        session.key_id = Some("test-key".to_string());
        session.add_claim("client_id", serde_json::json!("c1"));
        session
    }

    #[test]
    fn mints_a_verifiable_token_with_populated_claims() {
        let signer = JwtSigner::new(
            "https://sts.internal",
            SigningKey::from_hmac_secret("test-key", b"test-secret"),
        );

        let response = signer.mint(&request(), &session()).unwrap();
        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.scope.as_deref(), Some("read"));
        assert!((295..=300).contains(&response.expires_in));

        let header = decode_header(&response.access_token).unwrap();
        assert_eq!(header.kid.as_deref(), Some("test-key"));

        let mut validation = Validation::new(Algorithm::HS384);
        validation.validate_aud = false;
        let decoded = decode::<serde_json::Value>(
            &response.access_token,
            &DecodingKey::from_secret(b"test-secret"),
            &validation,
        )
        .unwrap();

        assert_eq!(decoded.claims["iss"], "https://sts.internal");
        assert_eq!(
            decoded.claims["sub"],
            "urn:sts:user/0193e5d4-0000-7000-8000-000000000000"
        );
        assert_eq!(decoded.claims["aud"], serde_json::json!(["api.internal"]));
        assert_eq!(decoded.claims["client_id"], "c1");
        assert_eq!(decoded.claims["scope"], "read");
    }

    #[test]
    fn session_without_subject_cannot_be_minted() {
        let signer = JwtSigner::new(
            "https://sts.internal",
            SigningKey::from_hmac_secret("test-key", b"test-secret"),
        );
        let mut incomplete = session();
        incomplete.subject = None;

        let err = signer.mint(&request(), &incomplete).unwrap_err();
        assert!(matches!(err, OAuth2Error::ServerError(_)));
    }

    #[test]
    fn signing_key_debug_redacts_material() {
        let key = SigningKey::from_hmac_secret("test-key", b"test-secret");
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("test-secret"));
    }

    #[test]
    fn hmac_key_cannot_be_built_from_pem() {
        let err = SigningKey::from_pem("k", SigningAlgorithm::Hs384, b"not a pem").unwrap_err();
        assert!(matches!(err, OAuth2Error::ServerError(_)));
    }
}

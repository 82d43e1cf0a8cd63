//! Policy seams for the grant handler.
//!
//! The handler takes its scope, audience, lifespan, and signing-key
//! decisions through these narrow traits so deployments can swap
//! strategies without touching the state machine.

use chrono::Duration;
use sts_model::OAuthClient;

use crate::error::{OAuth2Error, OAuth2Result};

/// Decides whether a client's configured scopes permit a requested scope.
pub trait ScopePolicy: Send + Sync {
    /// Returns true when `requested` is permitted by `client_scopes`.
    fn allows(&self, client_scopes: &[String], requested: &str) -> bool;
}

/// Scope policy requiring an exact, case-sensitive match.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactScopePolicy;

impl ScopePolicy for ExactScopePolicy {
    fn allows(&self, client_scopes: &[String], requested: &str) -> bool {
        client_scopes.iter().any(|s| s == requested)
    }
}

/// Scope policy where a configured scope also permits dot-separated
/// descendants: a client holding `repo` may request `repo.read`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HierarchicScopePolicy;

impl ScopePolicy for HierarchicScopePolicy {
    fn allows(&self, client_scopes: &[String], requested: &str) -> bool {
        client_scopes.iter().any(|held| {
            requested == held
                || (requested.starts_with(held)
                    && requested[held.len()..].starts_with('.'))
        })
    }
}

/// Decides whether a requested audience set is acceptable for a client.
pub trait AudiencePolicy: Send + Sync {
    /// Validates `requested` against the client's configured audience.
    ///
    /// # Errors
    ///
    /// Returns `OAuth2Error::InvalidGrant` naming the first rejected
    /// audience.
    fn validate(&self, client_audience: &[String], requested: &[String]) -> OAuth2Result<()>;
}

/// Audience policy requiring every requested audience to appear verbatim
/// in the client's configured list.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactAudiencePolicy;

impl AudiencePolicy for ExactAudiencePolicy {
    fn validate(&self, client_audience: &[String], requested: &[String]) -> OAuth2Result<()> {
        for audience in requested {
            if !client_audience.contains(audience) {
                return Err(OAuth2Error::InvalidGrant(format!(
                    "requested audience '{audience}' has not been whitelisted for the client"
                )));
            }
        }
        Ok(())
    }
}

/// Computes the effective access-token lifespan for a client.
pub trait LifespanPolicy: Send + Sync {
    /// Returns the access-token lifespan to apply for this client.
    fn access_token_lifespan(&self, client: &OAuthClient) -> Duration;
}

/// Lifespan policy applying one system-wide default.
///
/// Client-specific overrides are a matter of providing a different
/// implementation; the schema stores none.
#[derive(Debug, Clone, Copy)]
pub struct DefaultLifespanPolicy {
    lifespan: Duration,
}

impl DefaultLifespanPolicy {
    /// Creates a policy with the given default lifespan.
    #[must_use]
    pub const fn new(lifespan: Duration) -> Self {
        Self { lifespan }
    }

    /// Creates a policy from a lifespan in seconds.
    #[must_use]
    pub fn from_secs(secs: i64) -> Self {
        Self::new(Duration::seconds(secs))
    }
}

impl LifespanPolicy for DefaultLifespanPolicy {
    fn access_token_lifespan(&self, _client: &OAuthClient) -> Duration {
        self.lifespan
    }
}

/// Names the signing key the downstream signer will use, so the `kid`
/// header can be fixed while claims are assembled.
pub trait SigningKeyProvider: Send + Sync {
    /// Identifier of the active signing key.
    fn signing_key_id(&self) -> &str;
}

/// A fixed signing key identifier.
#[derive(Debug, Clone)]
pub struct StaticSigningKey {
    key_id: String,
}

impl StaticSigningKey {
    /// Creates a provider always naming the given key.
    #[must_use]
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
        }
    }
}

impl SigningKeyProvider for StaticSigningKey {
    fn signing_key_id(&self) -> &str {
        &self.key_id
    }
}

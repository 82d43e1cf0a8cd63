//! OAuth 2.0 service client domain model.

use serde::{Deserialize, Serialize};
use sts_core::scope;
use uuid::Uuid;

/// A registered OAuth 2.0 client.
///
/// The secret is stored as a one-way hash; the plaintext exists only in
/// the [`CreatedOAuthClient`] returned at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthClient {
    /// Unique identifier. Doubles as the OAuth `client_id`.
    pub id: Uuid,
    /// Tenant the client belongs to.
    pub tenant_id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// PHC-formatted hash of the client secret. `None` for public clients.
    #[serde(skip_serializing)]
    pub secret: Option<String>,
    /// Audiences the client may request tokens for.
    pub audience: Vec<String>,
    /// Space-joined scopes the client may request.
    pub scope: String,
}

impl OAuthClient {
    /// Whether this is a public client (no credential on record).
    ///
    /// Public clients are derived from the absence of a secret rather
    /// than stored as a flag, and are ineligible for the
    /// client-credentials grant.
    #[must_use]
    pub fn is_public(&self) -> bool {
        match &self.secret {
            Some(hash) => hash.is_empty(),
            None => true,
        }
    }

    /// The client's permitted scopes as a list.
    #[must_use]
    pub fn scopes(&self) -> Vec<String> {
        scope::split(&self.scope)
    }
}

/// Input for registering an OAuth 2.0 client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOAuthClient {
    /// Tenant the client belongs to.
    pub tenant_id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// Plaintext secret to register. When `None`, the registry generates
    /// one.
    #[serde(skip_serializing)]
    pub secret: Option<String>,
    /// Audiences the client may request tokens for.
    pub audience: Vec<String>,
    /// Space-joined scopes the client may request.
    pub scope: String,
}

impl NewOAuthClient {
    /// Creates a client registration input.
    #[must_use]
    pub fn new(tenant_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            tenant_id,
            name: name.into(),
            secret: None,
            audience: Vec::new(),
            scope: String::new(),
        }
    }

    /// Sets an explicit plaintext secret.
    #[must_use]
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Adds a permitted audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience.push(audience.into());
        self
    }

    /// Sets the permitted scopes (space-joined).
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }
}

/// Result of registering a client.
///
/// This is the only place the plaintext secret ever appears; it is not
/// recoverable afterwards.
#[derive(Debug, Clone)]
pub struct CreatedOAuthClient {
    /// The stored client (secret field holds the hash).
    pub client: OAuthClient,
    /// The plaintext secret, returned exactly once.
    pub secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_without_secret_is_public() {
        let client = OAuthClient {
            id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            name: "spa".to_string(),
            secret: None,
            audience: vec![],
            scope: String::new(),
        };
        assert!(client.is_public());
    }

    #[test]
    fn client_with_hash_is_confidential() {
        let client = OAuthClient {
            id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            name: "backend".to_string(),
            secret: Some("$argon2id$v=19$...".to_string()),
            audience: vec![],
            scope: String::new(),
        };
        assert!(!client.is_public());
    }

    #[test]
    fn scopes_split_on_whitespace() {
        let client = OAuthClient {
            id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            name: "svc".to_string(),
            secret: Some("hash".to_string()),
            audience: vec![],
            scope: "read write".to_string(),
        };
        assert_eq!(client.scopes(), vec!["read", "write"]);
    }

    #[test]
    fn secret_is_never_serialized() {
        let client = OAuthClient {
            id: Uuid::now_v7(),
            tenant_id: Uuid::now_v7(),
            name: "svc".to_string(),
            secret: Some("hash".to_string()),
            audience: vec!["api.internal".to_string()],
            scope: "read".to_string(),
        };
        let json = serde_json::to_value(&client).unwrap();
        assert!(json.get("secret").is_none());
    }
}

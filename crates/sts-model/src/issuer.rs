//! Token issuer domain model.
//!
//! Issuers are the trusted external parties whose tokens this STS
//! federates. The `uri` is the federation key matched against the `iss`
//! claim of incoming tokens.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::claims_mapping::ClaimsMapping;

/// A trusted external token issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuer {
    /// Unique identifier.
    pub id: Uuid,
    /// Tenant the issuer belongs to.
    pub tenant_id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// Issuer URI as found in the `iss` claim of tokens it signs. Unique
    /// across all issuers.
    pub uri: String,
    /// URI where the issuer's JWKS lives. Must be reachable by the STS.
    pub jwks_uri: String,
    /// Claim transformation expressions applied to tokens from this issuer.
    pub claim_mappings: ClaimsMapping,
}

impl Issuer {
    /// Creates a new issuer with an empty claims mapping.
    #[must_use]
    pub fn new(
        tenant_id: Uuid,
        name: impl Into<String>,
        uri: impl Into<String>,
        jwks_uri: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            tenant_id,
            name: name.into(),
            uri: uri.into(),
            jwks_uri: jwks_uri.into(),
            claim_mappings: ClaimsMapping::new(),
        }
    }

    /// Sets the claim mappings.
    #[must_use]
    pub fn with_claim_mappings(mut self, mappings: ClaimsMapping) -> Self {
        self.claim_mappings = mappings;
        self
    }
}

/// A partial update to an issuer.
///
/// Only fields that are set are applied; everything else is left
/// unchanged. A replaced claims mapping is re-validated before commit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssuerUpdate {
    /// New name, if changing.
    pub name: Option<String>,
    /// New issuer URI, if changing.
    pub uri: Option<String>,
    /// New JWKS URI, if changing.
    pub jwks_uri: Option<String>,
    /// Replacement claim mappings, if changing.
    pub claim_mappings: Option<ClaimsMapping>,
}

impl IssuerUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the issuer URI.
    #[must_use]
    pub fn uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Sets the JWKS URI.
    #[must_use]
    pub fn jwks_uri(mut self, jwks_uri: impl Into<String>) -> Self {
        self.jwks_uri = Some(jwks_uri.into());
        self
    }

    /// Sets the claim mappings.
    #[must_use]
    pub fn claim_mappings(mut self, mappings: ClaimsMapping) -> Self {
        self.claim_mappings = Some(mappings);
        self
    }

    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.uri.is_none()
            && self.jwks_uri.is_none()
            && self.claim_mappings.is_none()
    }

    /// Applies the update to an issuer, consuming the update.
    pub fn apply_to(self, issuer: &mut Issuer) {
        if let Some(name) = self.name {
            issuer.name = name;
        }
        if let Some(uri) = self.uri {
            issuer.uri = uri;
        }
        if let Some(jwks_uri) = self.jwks_uri {
            issuer.jwks_uri = jwks_uri;
        }
        if let Some(mappings) = self.claim_mappings {
            issuer.claim_mappings = mappings;
        }
    }
}

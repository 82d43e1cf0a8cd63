//! Row types mapping between the relational schema and the domain model.

use sqlx::FromRow;
use sqlx::types::Json;
use sts_core::scope;
use sts_model::{ClaimsMapping, Issuer, OAuthClient, UserInfo};
use uuid::Uuid;

/// An `issuers` row.
#[derive(Debug, FromRow)]
pub struct IssuerRow {
    /// Primary key.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Display name.
    pub name: String,
    /// Issuer URI (unique).
    pub uri: String,
    /// JWKS URI.
    pub jwksuri: String,
    /// Claims mapping as a JSON object of claim name to expression source.
    pub mappings: Json<ClaimsMapping>,
}

impl IssuerRow {
    /// Converts the row into the domain type.
    #[must_use]
    pub fn into_issuer(self) -> Issuer {
        Issuer {
            id: self.id,
            tenant_id: self.tenant_id,
            name: self.name,
            uri: self.uri,
            jwks_uri: self.jwksuri,
            claim_mappings: self.mappings.0,
        }
    }
}

/// A `user_info` row joined with its issuer's URI.
#[derive(Debug, FromRow)]
pub struct UserInfoRow {
    /// Primary key.
    pub id: Uuid,
    /// Display name, if the source provider supplied one.
    pub name: Option<String>,
    /// Email, if the source provider supplied one.
    pub email: Option<String>,
    /// Subject under the issuer.
    pub sub: String,
    /// Issuer URI (joined from `issuers`).
    pub iss: String,
}

impl UserInfoRow {
    /// Converts the row into the domain type.
    #[must_use]
    pub fn into_user_info(self) -> UserInfo {
        UserInfo {
            id: self.id,
            name: self.name,
            email: self.email,
            issuer: self.iss,
            subject: self.sub,
        }
    }
}

/// An `oauth_clients` row.
#[derive(Debug, FromRow)]
pub struct OAuthClientRow {
    /// Primary key.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Display name.
    pub name: String,
    /// Hashed secret; NULL for public clients.
    pub secret: Option<String>,
    /// Space-joined audience list.
    pub audience: String,
    /// Space-joined scopes.
    pub scope: String,
}

impl OAuthClientRow {
    /// Converts the row into the domain type, splitting the audience.
    #[must_use]
    pub fn into_client(self) -> OAuthClient {
        OAuthClient {
            id: self.id,
            tenant_id: self.tenant_id,
            name: self.name,
            secret: self.secret,
            audience: scope::split(&self.audience),
            scope: self.scope,
        }
    }
}

//! OAuth client registry provider trait.

use async_trait::async_trait;
use sts_model::{CreatedOAuthClient, NewOAuthClient, OAuthClient};
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for registered OAuth 2.0 service clients.
#[async_trait]
pub trait OAuthClientProvider: Send + Sync {
    /// Registers a client.
    ///
    /// The secret is hashed before persistence; when the input carries no
    /// secret, one is generated. The returned [`CreatedOAuthClient`] is
    /// the only place the plaintext ever appears.
    async fn create(&self, client: NewOAuthClient) -> StorageResult<CreatedOAuthClient>;

    /// Looks up a client by ID.
    async fn lookup_by_id(&self, id: Uuid) -> StorageResult<Option<OAuthClient>>;

    /// Deletes a client.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when no client has the ID.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;

    /// Verifies a plaintext secret against the stored hash for a client.
    ///
    /// Returns `Ok(false)` on mismatch and for public clients.
    async fn verify_secret(&self, id: Uuid, secret: &str) -> StorageResult<bool>;
}

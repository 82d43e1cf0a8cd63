//! Issuer registry provider trait.

use async_trait::async_trait;
use sts_model::{Issuer, IssuerUpdate};
use uuid::Uuid;

use crate::error::StorageResult;

/// Provider for the registry of trusted external token issuers.
///
/// The registry is the sole writer of issuer rows and of the embedded
/// claims mapping. Implementations must be thread-safe; the read path is
/// hit on every incoming federated token.
#[async_trait]
pub trait IssuerProvider: Send + Sync {
    /// Registers a new issuer.
    ///
    /// The claims mapping is validated before persistence; an unparsable
    /// expression is rejected.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Duplicate` when the URI is already
    /// registered and `StorageError::InvalidData` when the mapping does
    /// not compile.
    async fn create(&self, issuer: Issuer) -> StorageResult<Issuer>;

    /// Gets an issuer by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when no issuer has the ID.
    async fn get_by_id(&self, id: Uuid) -> StorageResult<Issuer>;

    /// Gets an issuer by URI.
    ///
    /// This is the hot path matched against incoming token `iss` claims;
    /// implementations must back it with an index.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFoundByName` when no issuer has the URI.
    async fn get_by_uri(&self, uri: &str) -> StorageResult<Issuer>;

    /// Applies a partial update, leaving unset fields unchanged.
    ///
    /// A replaced claims mapping is re-validated before commit.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when the issuer doesn't exist and
    /// `StorageError::InvalidData` when a replacement mapping does not
    /// compile.
    async fn update(&self, id: Uuid, update: IssuerUpdate) -> StorageResult<Issuer>;

    /// Deletes an issuer.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when the issuer doesn't exist and
    /// `StorageError::ForeignKey` while federation records still
    /// reference it.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;
}

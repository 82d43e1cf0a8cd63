//! Federated identity record provider trait.

use async_trait::async_trait;
use sts_model::{NewUserInfo, UserInfo};
use uuid::Uuid;

use crate::error::StorageResult;
use crate::transaction::TransactionManager;

/// Provider for federated identity records.
///
/// This store is the sole writer of `user_info` rows. Writes go through
/// an explicit transaction from [`TransactionManager`]; reads run outside
/// any transaction.
#[async_trait]
pub trait UserInfoProvider: TransactionManager {
    /// Looks up the record for an (issuer URI, subject) pair.
    ///
    /// Reads only stored state; no outbound request is made.
    async fn lookup_by_claims(
        &self,
        issuer_uri: &str,
        subject: &str,
    ) -> StorageResult<Option<UserInfo>>;

    /// Looks up a record by its locally assigned ID.
    async fn lookup_by_id(&self, id: Uuid) -> StorageResult<Option<UserInfo>>;

    /// Stores a new federation record inside the given transaction,
    /// returning the row with its assigned ID.
    ///
    /// The issuer URI is resolved to a registered issuer first, and the
    /// resolve-then-insert pair is atomic within the transaction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFoundByName` (entity "issuer") when the
    /// issuer is unregistered, and `StorageError::Duplicate` when a
    /// record already exists for the (issuer, subject) pair. Concurrent
    /// duplicate inserts resolve to exactly one surviving row; every
    /// other writer observes the conflict.
    async fn store_user_info(
        &self,
        tx: &mut Self::Tx,
        user_info: NewUserInfo,
    ) -> StorageResult<UserInfo>;
}

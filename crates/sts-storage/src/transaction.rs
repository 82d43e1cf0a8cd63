//! Explicit transaction handling.
//!
//! The federation write path is the only multi-statement transactional
//! unit in the core. Transactions are explicit values obtained from
//! [`TransactionManager::begin`] and passed by parameter into store
//! calls; there are no ambient, context-carried handles. Every exit path
//! must either commit or roll back, and implementations must roll back
//! on drop so cancellation never leaks an open transaction.

use async_trait::async_trait;

use crate::error::StorageResult;

/// Begins, commits, and rolls back units of work.
#[async_trait]
pub trait TransactionManager: Send + Sync {
    /// Backend-specific transaction handle.
    type Tx: Send;

    /// Begins a transaction.
    async fn begin(&self) -> StorageResult<Self::Tx>;

    /// Commits a transaction, making its writes visible.
    async fn commit(&self, tx: Self::Tx) -> StorageResult<()>;

    /// Rolls a transaction back, discarding its writes.
    async fn rollback(&self, tx: Self::Tx) -> StorageResult<()>;
}

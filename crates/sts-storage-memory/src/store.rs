//! Shared in-memory state and transaction handling.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use sts_crypto::SecretHasher;
use sts_model::{Issuer, OAuthClient, UserInfo};
use sts_storage::{StorageError, StorageResult, TransactionManager};
use uuid::Uuid;

/// A federation record as stored, referencing its issuer by ID the way
/// the relational schema does.
#[derive(Debug, Clone)]
pub(crate) struct UserInfoRecord {
    pub(crate) id: Uuid,
    pub(crate) name: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) subject: String,
    pub(crate) issuer_id: Uuid,
}

impl UserInfoRecord {
    pub(crate) fn into_user_info(self, issuer_uri: String) -> UserInfo {
        UserInfo {
            id: self.id,
            name: self.name,
            email: self.email,
            issuer: issuer_uri,
            subject: self.subject,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct State {
    pub(crate) issuers: HashMap<Uuid, Issuer>,
    /// Secondary index backing the hot `get_by_uri` path.
    pub(crate) issuers_by_uri: HashMap<String, Uuid>,
    pub(crate) user_info: HashMap<Uuid, UserInfoRecord>,
    pub(crate) clients: HashMap<Uuid, OAuthClient>,
}

impl State {
    pub(crate) fn issuer_uri(&self, issuer_id: Uuid) -> Option<String> {
        self.issuers.get(&issuer_id).map(|i| i.uri.clone())
    }

    pub(crate) fn has_user_info_for(&self, issuer_id: Uuid, subject: &str) -> bool {
        self.user_info
            .values()
            .any(|r| r.issuer_id == issuer_id && r.subject == subject)
    }
}

/// In-memory storage engine implementing every provider trait.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    pub(crate) state: Arc<Mutex<State>>,
    pub(crate) hasher: SecretHasher,
}

impl MemoryStorage {
    /// Creates an empty store with the default secret-hash configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(SecretHasher::with_defaults())
    }

    /// Creates an empty store with a specific secret hasher.
    #[must_use]
    pub fn with_hasher(hasher: SecretHasher) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            hasher,
        }
    }

    pub(crate) fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of committed federation records. Diagnostic aid for tests
    /// asserting on side effects.
    #[must_use]
    pub fn user_info_count(&self) -> usize {
        self.lock().user_info.len()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// A staged unit of work against [`MemoryStorage`].
///
/// Writes accumulate here and are applied to the shared state only on
/// commit; dropping the transaction discards them, so abandoned
/// transactions roll back exactly like the SQL backend's.
#[derive(Debug, Default)]
pub struct MemoryTransaction {
    pub(crate) staged_user_info: Vec<UserInfoRecord>,
}

#[async_trait]
impl TransactionManager for MemoryStorage {
    type Tx = MemoryTransaction;

    async fn begin(&self) -> StorageResult<Self::Tx> {
        Ok(MemoryTransaction::default())
    }

    async fn commit(&self, tx: Self::Tx) -> StorageResult<()> {
        let mut state = self.lock();

        // Re-check constraints at commit time: another transaction may
        // have committed the same (issuer, subject) pair since the write
        // was staged. Exactly one row survives; later writers conflict.
        for record in &tx.staged_user_info {
            if state.has_user_info_for(record.issuer_id, &record.subject) {
                return Err(StorageError::duplicate(
                    "user_info",
                    "sub",
                    record.subject.clone(),
                ));
            }
            if !state.issuers.contains_key(&record.issuer_id) {
                return Err(StorageError::ForeignKey(
                    "user_info references a deleted issuer".to_string(),
                ));
            }
        }

        for record in tx.staged_user_info {
            state.user_info.insert(record.id, record);
        }

        Ok(())
    }

    async fn rollback(&self, tx: Self::Tx) -> StorageResult<()> {
        drop(tx);
        Ok(())
    }
}

//! In-memory federated identity store.

use async_trait::async_trait;
use sts_model::{NewUserInfo, UserInfo};
use sts_storage::{StorageError, StorageResult, UserInfoProvider};
use uuid::Uuid;

use crate::store::{MemoryStorage, UserInfoRecord};

#[async_trait]
impl UserInfoProvider for MemoryStorage {
    async fn lookup_by_claims(
        &self,
        issuer_uri: &str,
        subject: &str,
    ) -> StorageResult<Option<UserInfo>> {
        let state = self.lock();
        let Some(issuer_id) = state.issuers_by_uri.get(issuer_uri).copied() else {
            return Ok(None);
        };

        Ok(state
            .user_info
            .values()
            .find(|r| r.issuer_id == issuer_id && r.subject == subject)
            .cloned()
            .map(|r| r.into_user_info(issuer_uri.to_string())))
    }

    async fn lookup_by_id(&self, id: Uuid) -> StorageResult<Option<UserInfo>> {
        let state = self.lock();
        Ok(state.user_info.get(&id).cloned().and_then(|r| {
            let uri = state.issuer_uri(r.issuer_id)?;
            Some(r.into_user_info(uri))
        }))
    }

    async fn store_user_info(
        &self,
        tx: &mut Self::Tx,
        user_info: NewUserInfo,
    ) -> StorageResult<UserInfo> {
        let state = self.lock();

        let issuer_id = state
            .issuers_by_uri
            .get(&user_info.issuer)
            .copied()
            .ok_or_else(|| StorageError::not_found_by_name("issuer", &user_info.issuer))?;

        let already_staged = tx
            .staged_user_info
            .iter()
            .any(|r| r.issuer_id == issuer_id && r.subject == user_info.subject);
        if already_staged || state.has_user_info_for(issuer_id, &user_info.subject) {
            return Err(StorageError::duplicate(
                "user_info",
                "sub",
                user_info.subject.clone(),
            ));
        }

        let record = UserInfoRecord {
            id: Uuid::now_v7(),
            name: user_info.name.clone(),
            email: user_info.email.clone(),
            subject: user_info.subject.clone(),
            issuer_id,
        };
        let id = record.id;
        tx.staged_user_info.push(record);

        Ok(user_info.into_user_info(id))
    }
}

//! In-memory issuer registry.

use async_trait::async_trait;
use sts_claims::CompiledMapping;
use sts_model::{ClaimsMapping, Issuer, IssuerUpdate};
use sts_storage::{IssuerProvider, StorageError, StorageResult};
use uuid::Uuid;

use crate::store::MemoryStorage;

fn validate_mappings(mappings: &ClaimsMapping) -> StorageResult<()> {
    CompiledMapping::compile(mappings)
        .map(|_| ())
        .map_err(|e| StorageError::InvalidData(e.to_string()))
}

#[async_trait]
impl IssuerProvider for MemoryStorage {
    async fn create(&self, issuer: Issuer) -> StorageResult<Issuer> {
        validate_mappings(&issuer.claim_mappings)?;

        let mut state = self.lock();
        if state.issuers_by_uri.contains_key(&issuer.uri) {
            return Err(StorageError::duplicate("issuer", "uri", issuer.uri.clone()));
        }

        state.issuers_by_uri.insert(issuer.uri.clone(), issuer.id);
        state.issuers.insert(issuer.id, issuer.clone());
        Ok(issuer)
    }

    async fn get_by_id(&self, id: Uuid) -> StorageResult<Issuer> {
        self.lock()
            .issuers
            .get(&id)
            .cloned()
            .ok_or(StorageError::not_found("issuer", id))
    }

    async fn get_by_uri(&self, uri: &str) -> StorageResult<Issuer> {
        let state = self.lock();
        state
            .issuers_by_uri
            .get(uri)
            .and_then(|id| state.issuers.get(id))
            .cloned()
            .ok_or_else(|| StorageError::not_found_by_name("issuer", uri))
    }

    async fn update(&self, id: Uuid, update: IssuerUpdate) -> StorageResult<Issuer> {
        if let Some(mappings) = &update.claim_mappings {
            validate_mappings(mappings)?;
        }

        let mut state = self.lock();
        let current = state
            .issuers
            .get(&id)
            .cloned()
            .ok_or(StorageError::not_found("issuer", id))?;

        let mut updated = current.clone();
        update.apply_to(&mut updated);

        if updated.uri != current.uri {
            if state.issuers_by_uri.contains_key(&updated.uri) {
                return Err(StorageError::duplicate(
                    "issuer",
                    "uri",
                    updated.uri.clone(),
                ));
            }
            state.issuers_by_uri.remove(&current.uri);
            state.issuers_by_uri.insert(updated.uri.clone(), id);
        }

        state.issuers.insert(id, updated.clone());
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let mut state = self.lock();

        let issuer = state
            .issuers
            .get(&id)
            .cloned()
            .ok_or(StorageError::not_found("issuer", id))?;

        if state.user_info.values().any(|r| r.issuer_id == id) {
            return Err(StorageError::ForeignKey(
                "issuer is referenced by federation records".to_string(),
            ));
        }

        state.issuers_by_uri.remove(&issuer.uri);
        state.issuers.remove(&id);
        Ok(())
    }
}

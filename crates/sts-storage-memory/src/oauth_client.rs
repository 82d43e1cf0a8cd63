//! In-memory OAuth client registry.

use async_trait::async_trait;
use sts_core::scope;
use sts_crypto::random::generate_client_secret;
use sts_model::{CreatedOAuthClient, NewOAuthClient, OAuthClient};
use sts_storage::{OAuthClientProvider, StorageError, StorageResult};
use uuid::Uuid;

use crate::store::MemoryStorage;

#[async_trait]
impl OAuthClientProvider for MemoryStorage {
    async fn create(&self, client: NewOAuthClient) -> StorageResult<CreatedOAuthClient> {
        let plaintext = client.secret.clone().unwrap_or_else(generate_client_secret);
        let hash = self
            .hasher
            .hash(&plaintext)
            .map_err(|e| StorageError::Internal(e.to_string()))?;

        // Round-trip the audience through the space-joined storage form so
        // the in-memory backend normalizes exactly like the SQL one.
        let audience = scope::split(&scope::join(&client.audience));

        let stored = OAuthClient {
            id: Uuid::now_v7(),
            tenant_id: client.tenant_id,
            name: client.name,
            secret: Some(hash),
            audience,
            scope: client.scope,
        };

        self.lock().clients.insert(stored.id, stored.clone());

        Ok(CreatedOAuthClient {
            client: stored,
            secret: plaintext,
        })
    }

    async fn lookup_by_id(&self, id: Uuid) -> StorageResult<Option<OAuthClient>> {
        Ok(self.lock().clients.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        self.lock()
            .clients
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::not_found("oauth client", id))
    }

    async fn verify_secret(&self, id: Uuid, secret: &str) -> StorageResult<bool> {
        let Some(client) = self.lookup_by_id(id).await? else {
            return Ok(false);
        };
        if client.is_public() {
            return Ok(false);
        }
        let Some(hash) = &client.secret else {
            return Ok(false);
        };

        self.hasher
            .verify(secret, hash)
            .map_err(|e| StorageError::Internal(e.to_string()))
    }
}

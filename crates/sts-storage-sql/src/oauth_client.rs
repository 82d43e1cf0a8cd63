//! `PostgreSQL` implementation of the OAuth client registry.

use async_trait::async_trait;
use sqlx::PgPool;
use sts_core::scope;
use sts_crypto::SecretHasher;
use sts_crypto::random::generate_client_secret;
use sts_model::{CreatedOAuthClient, NewOAuthClient, OAuthClient};
use sts_storage::{OAuthClientProvider, StorageError, StorageResult};
use uuid::Uuid;

use crate::entities::OAuthClientRow;
use crate::error::{from_sqlx_error, map_constraint_error};

const SELECT_COLUMNS: &str = "id, tenant_id, name, secret, audience, scope";

/// `PostgreSQL` OAuth client registry.
///
/// Secrets are hashed before they reach a query; the plaintext is
/// returned to the caller once, at creation, and never logged.
pub struct PgOAuthClientProvider {
    pool: PgPool,
    hasher: SecretHasher,
}

impl PgOAuthClientProvider {
    /// Creates a new `PostgreSQL` OAuth client provider.
    #[must_use]
    pub const fn new(pool: PgPool, hasher: SecretHasher) -> Self {
        Self { pool, hasher }
    }
}

#[async_trait]
impl OAuthClientProvider for PgOAuthClientProvider {
    async fn create(&self, client: NewOAuthClient) -> StorageResult<CreatedOAuthClient> {
        let plaintext = client.secret.clone().unwrap_or_else(generate_client_secret);
        let hash = self
            .hasher
            .hash(&plaintext)
            .map_err(|e| StorageError::Internal(e.to_string()))?;

        let id = Uuid::now_v7();
        sqlx::query(
            r"INSERT INTO oauth_clients (id, tenant_id, name, secret, audience, scope)
              VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(id)
        .bind(client.tenant_id)
        .bind(&client.name)
        .bind(&hash)
        .bind(scope::join(&client.audience))
        .bind(&client.scope)
        .execute(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "oauth client", "id", id.to_string()))?;

        Ok(CreatedOAuthClient {
            client: OAuthClient {
                id,
                tenant_id: client.tenant_id,
                name: client.name,
                secret: Some(hash),
                audience: client.audience,
                scope: client.scope,
            },
            secret: plaintext,
        })
    }

    async fn lookup_by_id(&self, id: Uuid) -> StorageResult<Option<OAuthClient>> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM oauth_clients WHERE id = $1");
        let row: Option<OAuthClientRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        Ok(row.map(OAuthClientRow::into_client))
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM oauth_clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("oauth client", id));
        }

        Ok(())
    }

    async fn verify_secret(&self, id: Uuid, secret: &str) -> StorageResult<bool> {
        let Some(client) = self.lookup_by_id(id).await? else {
            return Ok(false);
        };

        // Public clients have nothing to verify against.
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

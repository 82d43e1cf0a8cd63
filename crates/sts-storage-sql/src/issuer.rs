//! `PostgreSQL` implementation of the issuer registry.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use sts_claims::CompiledMapping;
use sts_model::{ClaimsMapping, Issuer, IssuerUpdate};
use sts_storage::{IssuerProvider, StorageError, StorageResult};
use uuid::Uuid;

use crate::entities::IssuerRow;
use crate::error::{from_sqlx_error, map_constraint_error};

const SELECT_COLUMNS: &str = "id, tenant_id, name, uri, jwksuri, mappings";

/// `PostgreSQL` issuer registry.
///
/// `get_by_uri` is backed by the unique index on `issuers.uri`.
pub struct PgIssuerProvider {
    pool: PgPool,
}

impl PgIssuerProvider {
    /// Creates a new `PostgreSQL` issuer provider.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Rejects a mapping that does not compile, before it reaches storage.
fn validate_mappings(mappings: &ClaimsMapping) -> StorageResult<()> {
    CompiledMapping::compile(mappings)
        .map(|_| ())
        .map_err(|e| StorageError::InvalidData(e.to_string()))
}

#[async_trait]
impl IssuerProvider for PgIssuerProvider {
    async fn create(&self, issuer: Issuer) -> StorageResult<Issuer> {
        validate_mappings(&issuer.claim_mappings)?;

        sqlx::query(
            r"INSERT INTO issuers (id, tenant_id, name, uri, jwksuri, mappings)
              VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(issuer.id)
        .bind(issuer.tenant_id)
        .bind(&issuer.name)
        .bind(&issuer.uri)
        .bind(&issuer.jwks_uri)
        .bind(Json(&issuer.claim_mappings))
        .execute(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "issuer", "uri", &issuer.uri))?;

        Ok(issuer)
    }

    async fn get_by_id(&self, id: Uuid) -> StorageResult<Issuer> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM issuers WHERE id = $1");
        let row: Option<IssuerRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        row.map(IssuerRow::into_issuer)
            .ok_or(StorageError::not_found("issuer", id))
    }

    async fn get_by_uri(&self, uri: &str) -> StorageResult<Issuer> {
        let query = format!("SELECT {SELECT_COLUMNS} FROM issuers WHERE uri = $1");
        let row: Option<IssuerRow> = sqlx::query_as(&query)
            .bind(uri)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        row.map(IssuerRow::into_issuer)
            .ok_or_else(|| StorageError::not_found_by_name("issuer", uri))
    }

    async fn update(&self, id: Uuid, update: IssuerUpdate) -> StorageResult<Issuer> {
        if let Some(mappings) = &update.claim_mappings {
            validate_mappings(mappings)?;
        }

        let mut issuer = self.get_by_id(id).await?;
        update.apply_to(&mut issuer);

        let result = sqlx::query(
            r"UPDATE issuers
              SET name = $2, uri = $3, jwksuri = $4, mappings = $5
              WHERE id = $1",
        )
        .bind(issuer.id)
        .bind(&issuer.name)
        .bind(&issuer.uri)
        .bind(&issuer.jwks_uri)
        .bind(Json(&issuer.claim_mappings))
        .execute(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "issuer", "uri", &issuer.uri))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("issuer", id));
        }

        Ok(issuer)
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM issuers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_constraint_error(e, "issuer", "id", id.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("issuer", id));
        }

        Ok(())
    }
}

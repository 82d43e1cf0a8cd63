//! Schema creation.
//!
//! Migration tooling is out of scope for the core, so the schema ships as
//! DDL applied at startup. All statements are idempotent.

use sqlx::PgPool;
use sts_storage::StorageError;

use crate::error::from_sqlx_error;

const CREATE_ISSUERS: &str = r"
    CREATE TABLE IF NOT EXISTS issuers (
        id        UUID PRIMARY KEY,
        tenant_id UUID NOT NULL,
        name      TEXT NOT NULL,
        uri       TEXT NOT NULL,
        jwksuri   TEXT NOT NULL,
        mappings  JSONB NOT NULL DEFAULT '{}',
        UNIQUE (uri)
    )";

const CREATE_OAUTH_CLIENTS: &str = r"
    CREATE TABLE IF NOT EXISTS oauth_clients (
        id        UUID PRIMARY KEY,
        tenant_id UUID NOT NULL,
        name      TEXT NOT NULL,
        secret    TEXT,
        audience  TEXT NOT NULL DEFAULT '',
        scope     TEXT NOT NULL DEFAULT ''
    )";

const CREATE_USER_INFO: &str = r"
    CREATE TABLE IF NOT EXISTS user_info (
        id     UUID PRIMARY KEY,
        name   TEXT,
        email  TEXT,
        sub    TEXT NOT NULL,
        iss_id UUID NOT NULL REFERENCES issuers(id),
        UNIQUE (iss_id, sub)
    )";

/// Creates the STS tables if they do not exist.
///
/// # Errors
///
/// Returns an error if any statement fails.
pub async fn create_schema(pool: &PgPool) -> Result<(), StorageError> {
    for statement in [CREATE_ISSUERS, CREATE_OAUTH_CLIENTS, CREATE_USER_INFO] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(from_sqlx_error)?;
    }
    Ok(())
}

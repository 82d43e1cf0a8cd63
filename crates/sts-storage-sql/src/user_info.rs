//! `PostgreSQL` implementation of the federated identity store.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use sts_model::{NewUserInfo, UserInfo};
use sts_storage::{StorageError, StorageResult, TransactionManager, UserInfoProvider};
use uuid::Uuid;

use crate::entities::UserInfoRow;
use crate::error::{from_sqlx_error, map_constraint_error};

/// `PostgreSQL` federated identity store.
///
/// The write path resolves the issuer URI and inserts the record inside
/// one transaction; the unique constraint on (`iss_id`, `sub`) guarantees
/// a single surviving row under concurrent duplicate inserts.
pub struct PgUserInfoProvider {
    pool: PgPool,
}

impl PgUserInfoProvider {
    /// Creates a new `PostgreSQL` user-info provider.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionManager for PgUserInfoProvider {
    type Tx = Transaction<'static, Postgres>;

    async fn begin(&self) -> StorageResult<Self::Tx> {
        self.pool
            .begin()
            .await
            .map_err(|e| StorageError::Transaction(e.to_string()))
    }

    async fn commit(&self, tx: Self::Tx) -> StorageResult<()> {
        tx.commit()
            .await
            .map_err(|e| StorageError::Transaction(e.to_string()))
    }

    async fn rollback(&self, tx: Self::Tx) -> StorageResult<()> {
        tx.rollback()
            .await
            .map_err(|e| StorageError::Transaction(e.to_string()))
    }
}

#[async_trait]
impl UserInfoProvider for PgUserInfoProvider {
    async fn lookup_by_claims(
        &self,
        issuer_uri: &str,
        subject: &str,
    ) -> StorageResult<Option<UserInfo>> {
        let row: Option<UserInfoRow> = sqlx::query_as(
            r"SELECT ui.id, ui.name, ui.email, ui.sub, i.uri AS iss
              FROM user_info ui
              JOIN issuers i ON ui.iss_id = i.id
              WHERE i.uri = $1 AND ui.sub = $2",
        )
        .bind(issuer_uri)
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(row.map(UserInfoRow::into_user_info))
    }

    async fn lookup_by_id(&self, id: Uuid) -> StorageResult<Option<UserInfo>> {
        let row: Option<UserInfoRow> = sqlx::query_as(
            r"SELECT ui.id, ui.name, ui.email, ui.sub, i.uri AS iss
              FROM user_info ui
              JOIN issuers i ON ui.iss_id = i.id
              WHERE ui.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(row.map(UserInfoRow::into_user_info))
    }

    async fn store_user_info(
        &self,
        tx: &mut Self::Tx,
        user_info: NewUserInfo,
    ) -> StorageResult<UserInfo> {
        let issuer_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM issuers WHERE uri = $1")
            .bind(&user_info.issuer)
            .fetch_optional(&mut **tx)
            .await
            .map_err(from_sqlx_error)?;

        let issuer_id = issuer_id
            .ok_or_else(|| StorageError::not_found_by_name("issuer", &user_info.issuer))?;

        let id = Uuid::now_v7();
        sqlx::query(
            r"INSERT INTO user_info (id, name, email, sub, iss_id)
              VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(&user_info.name)
        .bind(&user_info.email)
        .bind(&user_info.subject)
        .bind(issuer_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| map_constraint_error(e, "user_info", "sub", &user_info.subject))?;

        Ok(user_info.into_user_info(id))
    }
}

//! Client credentials grant handler.
//!
//! Implements the token endpoint behavior of RFC 6749 Section 4.4 for
//! already-authenticated service clients: validation, session setup, the
//! transactional federation write, and claim population. Signing the
//! resulting token happens behind [`crate::TokenSigner`], outside this
//! module.

use std::sync::Arc;

use chrono::Utc;
use sts_core::OAuth2Config;
use sts_model::NewUserInfo;
use sts_storage::{StorageError, UserInfoProvider};
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::error::{OAuth2Error, OAuth2Result};
use crate::policy::{
    AudiencePolicy, DefaultLifespanPolicy, ExactAudiencePolicy, ExactScopePolicy, LifespanPolicy,
    ScopePolicy, SigningKeyProvider, StaticSigningKey,
};
use crate::request::{AccessRequest, GrantType};
use crate::session::Session;

/// Prefix of subject claims minted for federated identities.
pub const SUBJECT_URN_PREFIX: &str = "urn:sts:user/";

/// Handler for the `client_credentials` grant.
///
/// One handler serves many concurrent requests; all per-request state
/// lives in the [`Session`] passed to [`handle`](Self::handle).
pub struct ClientCredentialsGrantHandler<S> {
    store: Arc<S>,
    scope_policy: Box<dyn ScopePolicy>,
    audience_policy: Box<dyn AudiencePolicy>,
    lifespan_policy: Box<dyn LifespanPolicy>,
    signing_keys: Box<dyn SigningKeyProvider>,
    access_token_issuer: String,
    userinfo_audience: String,
}

impl<S: UserInfoProvider> ClientCredentialsGrantHandler<S> {
    /// Creates a handler with the default policies: exact scope matching,
    /// exact audience matching, and the configured default lifespan.
    #[must_use]
    pub fn new(store: Arc<S>, config: &OAuth2Config) -> Self {
        Self {
            store,
            scope_policy: Box::new(ExactScopePolicy),
            audience_policy: Box::new(ExactAudiencePolicy),
            lifespan_policy: Box::new(DefaultLifespanPolicy::from_secs(
                config.access_token_lifespan_secs,
            )),
            signing_keys: Box::new(StaticSigningKey::new("default")),
            access_token_issuer: config.access_token_issuer.clone(),
            userinfo_audience: config.userinfo_audience.clone(),
        }
    }

    /// Replaces the scope policy.
    #[must_use]
    pub fn with_scope_policy(mut self, policy: impl ScopePolicy + 'static) -> Self {
        self.scope_policy = Box::new(policy);
        self
    }

    /// Replaces the audience policy.
    #[must_use]
    pub fn with_audience_policy(mut self, policy: impl AudiencePolicy + 'static) -> Self {
        self.audience_policy = Box::new(policy);
        self
    }

    /// Replaces the lifespan policy.
    #[must_use]
    pub fn with_lifespan_policy(mut self, policy: impl LifespanPolicy + 'static) -> Self {
        self.lifespan_policy = Box::new(policy);
        self
    }

    /// Replaces the signing key provider.
    #[must_use]
    pub fn with_signing_keys(mut self, provider: impl SigningKeyProvider + 'static) -> Self {
        self.signing_keys = Box::new(provider);
        self
    }

    /// Whether this handler serves the request.
    ///
    /// Exactly one grant-type value, `client_credentials`, is accepted;
    /// anything else makes the handler decline so the dispatcher can try
    /// other handlers.
    #[must_use]
    pub fn can_handle(&self, request: &AccessRequest) -> bool {
        matches!(request.grant_types.as_slice(), [GrantType::ClientCredentials])
    }

    /// Runs the grant state machine, terminal on first failure.
    ///
    /// On success the session carries the granted audience, expiry, `kid`
    /// header, the `client_id` claim, and a subject of the form
    /// `urn:sts:user/<federation-record-id>`.
    ///
    /// # Errors
    ///
    /// `InvalidScope` for a disallowed scope, `InvalidGrant` for an
    /// audience mismatch or a public client, `IssuerNotRegistered` when
    /// the configured token issuer is missing from the registry, and
    /// `ServerError` for storage faults. No failure leaves a transaction
    /// open or a partial write behind.
    #[instrument(skip_all, fields(client_id = %request.client.id))]
    pub async fn handle(
        &self,
        request: &AccessRequest,
        session: &mut Session,
    ) -> OAuth2Result<()> {
        let client = &request.client;

        let client_scopes = client.scopes();
        for scope in &request.requested_scopes {
            if !self.scope_policy.allows(&client_scopes, scope) {
                return Err(OAuth2Error::InvalidScope(format!(
                    "the client is not allowed to request scope '{scope}'"
                )));
            }
        }

        self.audience_policy
            .validate(&client.audience, &request.requested_audience)?;
        for audience in &request.requested_audience {
            session.grant_audience(audience.clone());
        }
        session.grant_audience(self.userinfo_audience.clone());

        // The client must have authenticated with the authorization
        // server; the outer layer has done so for every non-public
        // client before the request reaches this handler.
        if client.is_public() {
            return Err(OAuth2Error::InvalidGrant(
                "the client is marked as public and is not allowed to use \
                 authorization grant 'client_credentials'"
                    .to_string(),
            ));
        }

        let lifespan = self.lifespan_policy.access_token_lifespan(client);
        session.expires_at = Some(Utc::now() + lifespan);
        session.key_id = Some(self.signing_keys.signing_key_id().to_string());
        session.add_claim("client_id", serde_json::json!(client.id.to_string()));

        let user_id = self.federate_client(client.id).await?;
        session.set_subject(format!("{SUBJECT_URN_PREFIX}{user_id}"));

        Ok(())
    }

    /// Ensures a federation record exists for the client under the
    /// configured token issuer, returning its ID.
    ///
    /// The first grant for a client creates the record transactionally;
    /// later grants reuse it. A concurrent first grant may win the
    /// insert; the loser observes the typed conflict and reads the
    /// surviving row.
    async fn federate_client(&self, client_id: Uuid) -> OAuth2Result<Uuid> {
        let subject = client_id.to_string();

        if let Some(existing) = self
            .store
            .lookup_by_claims(&self.access_token_issuer, &subject)
            .await
            .map_err(|e| self.storage_failure(e, "unable to look up user info for client"))?
        {
            return Ok(existing.id);
        }

        let mut tx = self.store.begin().await.map_err(|e| {
            error!(error = %e, "could not start transaction");
            OAuth2Error::ServerError("could not start transaction".to_string())
        })?;

        let user_info = NewUserInfo::new(self.access_token_issuer.clone(), subject.clone());
        let stored = match self.store.store_user_info(&mut tx, user_info).await {
            Ok(stored) => stored,
            Err(err) => {
                self.abort(tx).await;
                return match err {
                    StorageError::Duplicate { .. } => self.reread_after_conflict(&subject).await,
                    other => Err(self.federation_failure(other)),
                };
            }
        };

        match self.store.commit(tx).await {
            Ok(()) => {
                debug!(user_id = %stored.id, "federated client");
                Ok(stored.id)
            }
            Err(StorageError::Duplicate { .. }) => self.reread_after_conflict(&subject).await,
            Err(err) => Err(self.storage_failure(err, "unable to store user info for client")),
        }
    }

    /// Re-reads the federation record after losing a concurrent insert.
    async fn reread_after_conflict(&self, subject: &str) -> OAuth2Result<Uuid> {
        self.store
            .lookup_by_claims(&self.access_token_issuer, subject)
            .await
            .map_err(|e| self.storage_failure(e, "unable to look up user info for client"))?
            .map(|info| info.id)
            .ok_or_else(|| {
                OAuth2Error::ServerError("unable to create user info for client".to_string())
            })
    }

    /// Rolls a transaction back, logging (but not propagating) rollback
    /// failures so the original error wins.
    async fn abort(&self, tx: S::Tx) {
        if let Err(err) = self.store.rollback(tx).await {
            error!(error = %err, "failed to roll back transaction");
        }
    }

    /// Maps a federation-write failure, surfacing an unregistered token
    /// issuer distinctly from transient storage faults.
    fn federation_failure(&self, err: StorageError) -> OAuth2Error {
        if err.is_not_found_entity("issuer") {
            error!(issuer = %self.access_token_issuer, "access token issuer is not registered");
            return OAuth2Error::IssuerNotRegistered(self.access_token_issuer.clone());
        }
        self.storage_failure(err, "unable to create user info for client")
    }

    /// Wraps a storage error with a fixed hint; the underlying detail is
    /// logged, not returned to the caller.
    fn storage_failure(&self, err: StorageError, hint: &str) -> OAuth2Error {
        error!(error = %err, "{hint}");
        OAuth2Error::ServerError(hint.to_string())
    }
}

//! Translation of externally-verified claims into internal claims.
//!
//! Once an outer layer has verified a subject token's signature, the
//! token's `iss` claim selects a registered issuer and that issuer's
//! claim mappings produce the claims the STS will embed in the token it
//! issues. Mappings are compiled on first use and cached per issuer.

use std::sync::Arc;

use sts_claims::MappingCache;
use sts_storage::IssuerProvider;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::error::FederationResult;

/// Applies per-issuer claim mappings to verified claim sets.
pub struct ClaimsTranslator<I> {
    issuers: Arc<I>,
    cache: MappingCache,
}

impl<I: IssuerProvider> ClaimsTranslator<I> {
    /// Creates a translator over the given issuer registry.
    #[must_use]
    pub fn new(issuers: Arc<I>) -> Self {
        Self {
            issuers,
            cache: MappingCache::new(),
        }
    }

    /// Translates the claims of a verified token from `issuer_uri` into
    /// the internally-issued claim set.
    ///
    /// # Errors
    ///
    /// Fails when the issuer is unregistered, the stored mapping no
    /// longer compiles, or any single claim expression fails (the whole
    /// mapping fails, naming the claim).
    #[instrument(skip(self, claims))]
    pub async fn translate(
        &self,
        issuer_uri: &str,
        claims: &serde_json::Map<String, serde_json::Value>,
    ) -> FederationResult<serde_json::Map<String, serde_json::Value>> {
        let issuer = self.issuers.get_by_uri(issuer_uri).await?;
        let compiled = self
            .cache
            .get_or_compile(issuer.id, &issuer.claim_mappings)?;

        debug!(issuer = %issuer.uri, claims = compiled.len(), "translating claims");
        Ok(compiled.evaluate(claims)?)
    }

    /// Drops the cached compiled mapping for an issuer. Must be called
    /// when an issuer's mapping is updated or the issuer is deleted.
    pub fn invalidate(&self, issuer_id: Uuid) {
        self.cache.invalidate(issuer_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sts_model::{ClaimsMapping, Issuer, IssuerUpdate};
    use sts_storage_memory::MemoryStorage;

    fn input(pairs: &[(&str, &str)]) -> serde_json::Map<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), serde_json::Value::String((*v).to_string())))
            .collect()
    }

    async fn seeded_store() -> (MemoryStorage, Issuer) {
        let store = MemoryStorage::new();
        let issuer = Issuer::new(
            Uuid::now_v7(),
            "Example",
            "https://example.com/",
            "https://example.com/.well-known/jwks.json",
        )
        .with_claim_mappings(
            ClaimsMapping::new()
                .with_claim("email", "claims.email")
                .with_claim("admin", "claims.role == 'admin'"),
        );
        let issuer = sts_storage::IssuerProvider::create(&store, issuer)
            .await
            .unwrap();
        (store, issuer)
    }

    #[tokio::test]
    async fn translates_claims_through_issuer_mapping() {
        let (store, _issuer) = seeded_store().await;
        let translator = ClaimsTranslator::new(Arc::new(store));

        let out = translator
            .translate(
                "https://example.com/",
                &input(&[("email", "mal@iketh.co"), ("role", "admin")]),
            )
            .await
            .unwrap();

        assert_eq!(out["email"], serde_json::json!("mal@iketh.co"));
        assert_eq!(out["admin"], serde_json::json!(true));
    }

    #[tokio::test]
    async fn unknown_issuer_is_a_storage_error() {
        let (store, _issuer) = seeded_store().await;
        let translator = ClaimsTranslator::new(Arc::new(store));

        let err = translator
            .translate("https://evil.biz/", &input(&[]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            crate::FederationError::Storage(ref e) if e.is_not_found_entity("issuer")
        ));
    }

    #[tokio::test]
    async fn failing_expression_names_the_claim() {
        let (store, _issuer) = seeded_store().await;
        let translator = ClaimsTranslator::new(Arc::new(store));

        // "email" is missing from the input, so the email expression fails.
        let err = translator
            .translate("https://example.com/", &input(&[("role", "admin")]))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("email"));
    }

    #[tokio::test]
    async fn invalidate_picks_up_replaced_mapping() {
        let (store, issuer) = seeded_store().await;
        let store = Arc::new(store);
        let translator = ClaimsTranslator::new(Arc::clone(&store));

        let out = translator
            .translate(
                "https://example.com/",
                &input(&[("email", "a@b.c"), ("role", "user")]),
            )
            .await
            .unwrap();
        assert_eq!(out["admin"], serde_json::json!(false));

        store
            .update(
                issuer.id,
                IssuerUpdate::new()
                    .claim_mappings(ClaimsMapping::new().with_claim("admin", "true")),
            )
            .await
            .unwrap();
        translator.invalidate(issuer.id);

        let out = translator
            .translate("https://example.com/", &input(&[]))
            .await
            .unwrap();
        assert_eq!(out["admin"], serde_json::json!(true));
        assert!(out.get("email").is_none());
    }
}

//! In-memory cache of compiled claim mappings.
//!
//! Only mapping source text is persisted; compiled programs live here,
//! keyed by issuer ID. Entries must be invalidated when an issuer's
//! mapping is replaced or the issuer is deleted.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use sts_model::ClaimsMapping;
use uuid::Uuid;

use crate::error::ClaimsResult;
use crate::expr::CompiledMapping;

/// Concurrent cache of compiled mappings keyed by issuer ID.
///
/// Reads take a shared lock; compilation happens outside any lock, so a
/// slow compile never blocks concurrent lookups for other issuers.
#[derive(Debug, Default)]
pub struct MappingCache {
    inner: RwLock<HashMap<Uuid, Arc<CompiledMapping>>>,
}

impl MappingCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached compiled mapping for an issuer, if present.
    #[must_use]
    pub fn get(&self, issuer_id: Uuid) -> Option<Arc<CompiledMapping>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&issuer_id)
            .cloned()
    }

    /// Returns the compiled form of `mapping`, compiling and caching it
    /// on first use.
    ///
    /// # Errors
    ///
    /// Propagates compilation failures; nothing is cached on error.
    pub fn get_or_compile(
        &self,
        issuer_id: Uuid,
        mapping: &ClaimsMapping,
    ) -> ClaimsResult<Arc<CompiledMapping>> {
        if let Some(compiled) = self.get(issuer_id) {
            return Ok(compiled);
        }

        let compiled = Arc::new(CompiledMapping::compile(mapping)?);
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        // A concurrent compile of the same mapping may have won; keep the
        // first entry so repeated lookups stay pointer-stable.
        Ok(guard
            .entry(issuer_id)
            .or_insert_with(|| Arc::clone(&compiled))
            .clone())
    }

    /// Drops the cached entry for an issuer. Call on mapping update or
    /// issuer deletion.
    pub fn invalidate(&self, issuer_id: Uuid) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&issuer_id);
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of cached mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> ClaimsMapping {
        ClaimsMapping::new().with_claim("email", "claims.email")
    }

    #[test]
    fn caches_compiled_mapping() {
        let cache = MappingCache::new();
        let issuer_id = Uuid::now_v7();

        let first = cache.get_or_compile(issuer_id, &mapping()).unwrap();
        let second = cache.get_or_compile(issuer_id, &mapping()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_forces_recompile() {
        let cache = MappingCache::new();
        let issuer_id = Uuid::now_v7();

        let first = cache.get_or_compile(issuer_id, &mapping()).unwrap();
        cache.invalidate(issuer_id);
        assert!(cache.get(issuer_id).is_none());

        let replacement = ClaimsMapping::new().with_claim("email", "claims.mail");
        let second = cache.get_or_compile(issuer_id, &replacement).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.represent().get("email"), Some("claims.mail"));
    }

    #[test]
    fn compile_failure_caches_nothing() {
        let cache = MappingCache::new();
        let issuer_id = Uuid::now_v7();

        let broken = ClaimsMapping::new().with_claim("email", "claims.email +");
        assert!(cache.get_or_compile(issuer_id, &broken).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn entries_are_independent_per_issuer() {
        let cache = MappingCache::new();
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();

        cache.get_or_compile(a, &mapping()).unwrap();
        cache.get_or_compile(b, &mapping()).unwrap();
        cache.invalidate(a);

        assert!(cache.get(a).is_none());
        assert!(cache.get(b).is_some());
    }
}

//! Claim transformation mappings.
//!
//! A [`ClaimsMapping`] associates output claim names with the source text
//! of the expression that produces each claim. Source text is the only
//! persisted and API-visible form; compilation to an executable form
//! happens lazily in `sts-claims` and is cached per issuer. Persisted
//! state is therefore always human-auditable, and re-serializing a
//! mapping reproduces it byte for byte.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Map of output claim name to claim-expression source text.
///
/// Entries are kept in claim-name order so representations are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimsMapping(BTreeMap<String, String>);

impl ClaimsMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds a claim expression, replacing any existing entry for the claim.
    #[must_use]
    pub fn with_claim(mut self, claim: impl Into<String>, source: impl Into<String>) -> Self {
        self.0.insert(claim.into(), source.into());
        self
    }

    /// Returns the expression source for a claim, if present.
    #[must_use]
    pub fn get(&self, claim: &str) -> Option<&str> {
        self.0.get(claim).map(String::as_str)
    }

    /// Iterates over (claim, source) pairs in claim-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of claims in the mapping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping has no claims.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the human-readable representation: claim name to expression
    /// source text. Since source text is the stored form, this is the
    /// mapping itself.
    #[must_use]
    pub const fn represent(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl FromIterator<(String, String)> for ClaimsMapping {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_object() {
        let mapping = ClaimsMapping::new()
            .with_claim("email", "claims.email")
            .with_claim("admin", "claims.role == 'admin'");

        let json = serde_json::to_string(&mapping).unwrap();
        assert_eq!(
            json,
            r#"{"admin":"claims.role == 'admin'","email":"claims.email"}"#
        );
    }

    #[test]
    fn round_trips_through_json() {
        let mapping = ClaimsMapping::new().with_claim("sub", "claims.sub");
        let json = serde_json::to_string(&mapping).unwrap();
        let back: ClaimsMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mapping);
    }

    #[test]
    fn with_claim_replaces_existing() {
        let mapping = ClaimsMapping::new()
            .with_claim("email", "claims.email")
            .with_claim("email", "claims.mail");
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("email"), Some("claims.mail"));
    }
}

//! Per-request token session.
//!
//! A [`Session`] holds the claim set being assembled for one token
//! request. It lives exactly as long as the request; nothing in it is
//! persisted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// The mutable state of one token issuance.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Subject claim for the outbound token, set during claim population.
    pub subject: Option<String>,
    /// Audiences granted to the outbound token.
    pub granted_audience: Vec<String>,
    /// Expiry of the outbound access token.
    pub expires_at: Option<DateTime<Utc>>,
    /// Identifier of the signing key the signer will use (`kid` header).
    pub key_id: Option<String>,
    /// Additional claims to embed in the outbound token.
    pub claims: HashMap<String, serde_json::Value>,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the subject claim.
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = Some(subject.into());
    }

    /// Grants an audience to the outbound token, ignoring duplicates.
    pub fn grant_audience(&mut self, audience: impl Into<String>) {
        let audience = audience.into();
        if !self.granted_audience.contains(&audience) {
            self.granted_audience.push(audience);
        }
    }

    /// Adds an additional claim.
    pub fn add_claim(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.claims.insert(name.into(), value);
    }
}

//! # sts-oauth2
//!
//! The client-credentials grant for the STS (RFC 6749 Section 4.4).
//!
//! [`ClientCredentialsGrantHandler`] runs the per-request state machine:
//! scope check, audience check, client-type check, session setup, the
//! transactional federation write, and claim population. Policy decisions
//! are injected through narrow traits ([`ScopePolicy`], [`AudiencePolicy`],
//! [`LifespanPolicy`], [`SigningKeyProvider`]) so the handler depends on
//! no particular OAuth 2.0 framework, and the signed token itself is
//! produced behind the [`TokenSigner`] capability.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod grant;
pub mod policy;
pub mod request;
pub mod session;
pub mod signer;

pub use error::{ErrorResponse, OAuth2Error, OAuth2Result};
pub use grant::{ClientCredentialsGrantHandler, SUBJECT_URN_PREFIX};
pub use policy::{
    AudiencePolicy, DefaultLifespanPolicy, ExactAudiencePolicy, ExactScopePolicy,
    HierarchicScopePolicy, LifespanPolicy, ScopePolicy, SigningKeyProvider, StaticSigningKey,
};
pub use request::{AccessRequest, GrantType};
pub use session::Session;
pub use signer::{AccessTokenResponse, JwtSigner, SigningAlgorithm, SigningKey, TokenSigner};

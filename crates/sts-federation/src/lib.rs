//! # sts-federation
//!
//! Federation of external identities:
//!
//! - [`UserInfoClient`] fetches a fresh identity record from a remote
//!   issuer's userinfo endpoint, authenticated with the subject's own
//!   token.
//! - [`ClaimsTranslator`] turns the claim set of an externally-verified
//!   token into the internally-issued claim set, using the owning
//!   issuer's claim mappings.
//!
//! Neither path retries; failures are reported upward and retry policy
//! belongs to the caller.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod client;
pub mod error;
pub mod translate;

pub use client::UserInfoClient;
pub use error::{FederationError, FederationResult};
pub use translate::ClaimsTranslator;

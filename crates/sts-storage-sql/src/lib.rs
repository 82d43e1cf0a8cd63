//! # sts-storage-sql
//!
//! `PostgreSQL` implementations of the STS storage provider traits.
//!
//! - [`PgIssuerProvider`] - issuer registry with indexed URI lookup
//! - [`PgUserInfoProvider`] - federated identity records with explicit
//!   transactions over the resolve-issuer-then-insert write path
//! - [`PgOAuthClientProvider`] - service clients with hashed-at-rest
//!   secrets
//!
//! Unique and foreign-key violations are surfaced as typed conflicts
//! rather than generic query errors.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod entities;
pub mod error;
pub mod issuer;
pub mod oauth_client;
pub mod pool;
pub mod schema;
pub mod user_info;

pub use issuer::PgIssuerProvider;
pub use oauth_client::PgOAuthClientProvider;
pub use pool::{PoolConfig, create_pool};
pub use user_info::PgUserInfoProvider;

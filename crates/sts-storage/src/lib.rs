//! # sts-storage
//!
//! Storage abstraction traits for the STS.
//!
//! This crate defines the provider interfaces implemented by concrete
//! backends (`sts-storage-sql`, `sts-storage-memory`):
//!
//! - [`IssuerProvider`] - registry of trusted external issuers
//! - [`UserInfoProvider`] - federated identity records
//! - [`OAuthClientProvider`] - registered service clients
//! - [`TransactionManager`] - explicit unit-of-work handling for the
//!   federation write path
//!
//! All providers must be safe under concurrent access.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod error;
pub mod issuer;
pub mod oauth_client;
pub mod transaction;
pub mod user_info;

pub use error::{StorageError, StorageResult};
pub use issuer::IssuerProvider;
pub use oauth_client::OAuthClientProvider;
pub use transaction::TransactionManager;
pub use user_info::UserInfoProvider;

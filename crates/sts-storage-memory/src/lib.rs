//! # sts-storage-memory
//!
//! In-memory implementations of the STS storage provider traits, with
//! the same observable semantics as the `PostgreSQL` backend: unique
//! URI and (issuer, subject) constraints, referential integrity between
//! issuers and federation records, and staged transaction writes that
//! become visible only on commit.
//!
//! Intended for tests and embedded use; data lives for the lifetime of
//! the [`MemoryStorage`] value.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod issuer;
pub mod oauth_client;
pub mod store;
pub mod user_info;

pub use store::{MemoryStorage, MemoryTransaction};

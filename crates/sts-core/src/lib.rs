//! # sts-core
//!
//! Shared configuration types and small primitives used across the STS
//! workspace. This crate carries no I/O and no protocol logic; it exists
//! so that storage backends, the grant handler, and the crypto layer all
//! agree on configuration shape and on boundary string formats.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod scope;

pub use config::{Config, DatabaseConfig, OAuth2Config, SecretHashConfig};

//! # sts-claims
//!
//! The claims-mapping engine: compiles per-issuer CEL expressions and
//! evaluates them against the claim set of an externally-verified token,
//! producing the claims to embed in an internally-issued one.
//!
//! Expressions see a single input variable, `claims`, bound to the flat
//! claim map. Compilation rejects unparsable sources and references to
//! anything outside that input set; evaluation is deterministic, does no
//! I/O, and fails a mapping as a whole when any one expression fails.
//!
//! Mapping source text is the only persisted form. [`MappingCache`]
//! holds compiled programs in memory keyed by issuer ID.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod cache;
pub mod error;
pub mod expr;

pub use cache::MappingCache;
pub use error::{ClaimsError, ClaimsResult};
pub use expr::{CompiledExpr, CompiledMapping, INPUT_VARIABLE};

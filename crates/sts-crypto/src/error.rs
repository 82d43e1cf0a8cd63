//! Crypto error types.

use thiserror::Error;

/// Errors from secret hashing and verification.
///
/// Messages carry diagnostics from the hashing backend only; they never
/// include the secret being processed.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Hashing failed.
    #[error("secret hashing failed: {0}")]
    Hash(String),

    /// A stored hash could not be parsed.
    #[error("stored secret hash is malformed: {0}")]
    InvalidHash(String),
}

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

//! Client-secret hashing and verification using Argon2id.
//!
//! ## NIST 800-53 Rev5: IA-5 (Authenticator Management)
//!
//! Secrets are stored only as salted, memory-hard hashes. Verification
//! uses the `password_hash` machinery, which compares in constant time.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sts_core::SecretHashConfig;

use crate::error::{CryptoError, CryptoResult};

/// Hashes and verifies client secrets with Argon2id.
#[derive(Debug, Clone)]
pub struct SecretHasher {
    config: SecretHashConfig,
}

impl SecretHasher {
    /// Creates a hasher with the given work-factor configuration.
    #[must_use]
    pub const fn new(config: SecretHashConfig) -> Self {
        Self { config }
    }

    /// Creates a hasher with the default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(SecretHashConfig::default())
    }

    fn build_params(&self) -> CryptoResult<Params> {
        Params::new(
            self.config.memory_cost_kib,
            self.config.time_cost,
            self.config.parallelism,
            Some(self.config.output_length as usize),
        )
        .map_err(|e| CryptoError::Hash(e.to_string()))
    }

    /// Hashes a plaintext secret, returning the PHC-formatted string.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured parameters are invalid or
    /// hashing fails.
    pub fn hash(&self, secret: &str) -> CryptoResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.build_params()?);

        let hash = argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| CryptoError::Hash(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Verifies a plaintext secret against a stored PHC hash.
    ///
    /// Returns `Ok(false)` on mismatch; parameters are taken from the
    /// stored hash, so verification keeps working after the configured
    /// work factor changes.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidHash` when the stored hash does not
    /// parse.
    pub fn verify(&self, secret: &str, stored_hash: &str) -> CryptoResult<bool> {
        let parsed =
            PasswordHash::new(stored_hash).map_err(|e| CryptoError::InvalidHash(e.to_string()))?;

        match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CryptoError::InvalidHash(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> SecretHasher {
        // Minimal cost so the test suite stays fast.
        SecretHasher::new(SecretHashConfig {
            memory_cost_kib: 8,
            time_cost: 1,
            parallelism: 1,
            output_length: 32,
        })
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hasher = fast_hasher();
        let hash = hasher.hash("s").unwrap();

        assert!(hasher.verify("s", &hash).unwrap());
        assert!(!hasher.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn hash_is_phc_formatted_and_not_the_plaintext() {
        let hasher = fast_hasher();
        let hash = hasher.hash("hunter2").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, "hunter2");
        assert!(!hash.contains("hunter2"));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = fast_hasher();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn work_factor_comes_from_config() {
        let hasher = SecretHasher::new(SecretHashConfig {
            memory_cost_kib: 16,
            time_cost: 3,
            parallelism: 1,
            output_length: 32,
        });
        let hash = hasher.hash("s").unwrap();
        assert!(hash.contains("m=16,t=3,p=1"));
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        let hasher = fast_hasher();
        assert!(matches!(
            hasher.verify("s", "not-a-phc-string"),
            Err(CryptoError::InvalidHash(_))
        ));
    }
}

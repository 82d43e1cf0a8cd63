//! Secure random generation for client secrets.

use rand::distr::{Alphanumeric, SampleString};

/// Length of generated client secrets.
///
/// 32 alphanumeric characters is roughly 190 bits of entropy, well above
/// the 128-bit floor recommended by RFC 6749.
pub const CLIENT_SECRET_LENGTH: usize = 32;

/// Generates a cryptographically secure alphanumeric string.
#[must_use]
pub fn random_alphanumeric(len: usize) -> String {
    let mut rng = rand::rng();
    Alphanumeric.sample_string(&mut rng, len)
}

/// Generates a new client secret.
#[must_use]
pub fn generate_client_secret() -> String {
    random_alphanumeric(CLIENT_SECRET_LENGTH)
}

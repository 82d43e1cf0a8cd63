//! Configuration for the STS core.
//!
//! Supports loading configuration from files or environment through serde;
//! every section has sensible defaults so embedded and test usage can start
//! from `Config::default()` and override selectively.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// OAuth 2.0 token issuance configuration.
    pub oauth2: OAuth2Config,
    /// Client-secret hashing configuration.
    pub secret_hash: SecretHashConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    pub min_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/sts".to_string(),
            max_connections: 10,
            min_connections: 1,
        }
    }
}

/// OAuth 2.0 token issuance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuth2Config {
    /// Issuer URI placed in the `iss` claim of minted access tokens.
    ///
    /// Also the issuer under which service clients are federated: the
    /// client-credentials grant records its federation rows against this
    /// URI, so it must be registered as an issuer before the grant can
    /// succeed.
    pub access_token_issuer: String,

    /// Default access token lifespan in seconds, used when no
    /// client-specific policy overrides it.
    pub access_token_lifespan_secs: i64,

    /// Audience granted to every issued token in addition to the audience
    /// the client requested, so holders can always call the userinfo
    /// endpoint.
    pub userinfo_audience: String,
}

impl Default for OAuth2Config {
    fn default() -> Self {
        Self {
            access_token_issuer: "http://localhost:8080".to_string(),
            access_token_lifespan_secs: 300, // 5 minutes
            userinfo_audience: "http://localhost:8080/userinfo".to_string(),
        }
    }
}

/// Client-secret hashing configuration.
///
/// ## NIST 800-53 Rev5: IA-5 (Authenticator Management)
///
/// The work factor is configuration rather than a constant so deployments
/// can raise it over time without a code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretHashConfig {
    /// Argon2 memory cost in KiB.
    pub memory_cost_kib: u32,
    /// Argon2 time cost (iterations).
    pub time_cost: u32,
    /// Argon2 parallelism factor.
    pub parallelism: u32,
    /// Output hash length in bytes.
    pub output_length: u32,
}

impl Default for SecretHashConfig {
    fn default() -> Self {
        // OWASP recommended settings for Argon2id
        Self {
            memory_cost_kib: 19 * 1024, // 19 MiB
            time_cost: 2,
            parallelism: 1,
            output_length: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lifespan_is_five_minutes() {
        let config = OAuth2Config::default();
        assert_eq!(config.access_token_lifespan_secs, 300);
    }

    #[test]
    fn default_hash_config_meets_owasp_floor() {
        let config = SecretHashConfig::default();
        assert!(config.memory_cost_kib >= 19 * 1024);
        assert!(config.time_cost >= 2);
        assert!(config.parallelism >= 1);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.database.url, config.database.url);
        assert_eq!(
            back.oauth2.access_token_issuer,
            config.oauth2.access_token_issuer
        );
    }
}

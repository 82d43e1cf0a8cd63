//! Federation error types.

use sts_claims::ClaimsError;
use sts_storage::StorageError;
use thiserror::Error;

/// Errors from federation operations.
///
/// Fetch failures carry the issuer-side condition (bad endpoint,
/// transport fault, unexpected status, undecodable body); they never
/// carry the subject's token.
#[derive(Debug, Error)]
pub enum FederationError {
    /// The issuer URI could not be turned into a userinfo endpoint.
    #[error("invalid userinfo endpoint: {0}")]
    Endpoint(String),

    /// The outbound request failed before a response arrived.
    #[error("userinfo request failed: {0}")]
    Request(String),

    /// The issuer answered with a non-200 status.
    #[error("unexpected response code {status} from userinfo endpoint")]
    UnexpectedStatus {
        /// HTTP status returned by the issuer.
        status: u16,
    },

    /// The response body was not a valid userinfo document.
    #[error("failed to decode userinfo response: {0}")]
    Decode(String),

    /// Storage failure while resolving the issuer.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Claim mapping failure while translating claims.
    #[error(transparent)]
    Claims(#[from] ClaimsError),
}

impl FederationError {
    /// Whether this is a fetch failure (as opposed to a storage or
    /// mapping failure).
    #[must_use]
    pub const fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Endpoint(_) | Self::Request(_) | Self::UnexpectedStatus { .. } | Self::Decode(_)
        )
    }
}

/// Result type for federation operations.
pub type FederationResult<T> = Result<T, FederationError>;

//! Error types for the vault layer.

use linkgate_protocol::ProtocolError;
use linkgate_store::StoreError;

/// Errors that can occur during vault operations.
///
/// A missing, already-used or expired link is NOT an error: `redeem`
/// reports it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The mapping could not be read, written or deleted.
    #[error("link storage failed: {0}")]
    Store(#[from] StoreError),

    /// A stored mapping could not be encoded or decoded.
    #[error("link record corrupt: {0}")]
    Codec(#[from] ProtocolError),

    /// A trusted domain produced an unusable extraction pattern.
    #[error("invalid trusted-domain pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

//! Error types for the session layer.

use linkgate_protocol::ProtocolError;
use linkgate_store::StoreError;

/// Errors that can occur while issuing sessions.
///
/// Validation never returns one of these: an unreadable session list simply
/// means the token is not valid.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session list could not be read from or written to the store.
    #[error("session storage failed: {0}")]
    Store(#[from] StoreError),

    /// The stored session list could not be encoded or decoded.
    #[error("session record corrupt: {0}")]
    Codec(#[from] ProtocolError),
}

//! Error types for the protocol layer.
//!
//! Each crate in Linkgate defines its own error enum. A `ProtocolError`
//! always means a value could not be turned into bytes or back, never a
//! storage or session problem.

/// Errors that can occur while encoding or decoding values.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Usually a stored record written by an incompatible version, or
    /// truncated data.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}

/// Errors from the payload cipher.
///
/// Decryption failures collapse into one variant: a bad
/// base64 string, a truncated payload, a wrong key and a tampered tag all
/// look the same to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CipherError {
    #[error("encryption failed")]
    EncryptionFailed,

    #[error("DECRYPTION_FAILED")]
    DecryptionFailed,
}

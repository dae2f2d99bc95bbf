//! Unified error type for the gateway.

use linkgate_protocol::CipherError;
use linkgate_session::SessionError;
use linkgate_vault::VaultError;

/// Everything a gateway operation can fail with.
///
/// Sub-crate errors convert in through `#[from]`, so `?` works on session,
/// vault and cipher results alike. Two variants share one
/// message: a client cannot tell a wrong access key from a dead session.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The access key was not accepted.
    #[error("access denied")]
    InvalidCredential,

    /// The session token is missing, unknown or expired.
    #[error("access denied")]
    SessionInvalid,

    /// The encrypted payload could not be opened with the session token.
    /// The facade reports this to callers as `SessionInvalid`.
    #[error("payload could not be decrypted: {0}")]
    PayloadDecryptFailure(#[from] CipherError),

    /// The opaque link is unknown, expired or already redeemed.
    #[error("link not found or already used")]
    LinkNotFoundOrUsed,

    /// The content source failed or timed out.
    #[error("content source unavailable: {0}")]
    UpstreamContentSourceUnavailable(String),

    /// The request was missing a field or could not be parsed.
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// The content source has no such item.
    #[error("content not found")]
    ContentNotFound,

    /// Session storage failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// Link storage failed, or the vault is misconfigured.
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// The gateway actor has stopped.
    #[error("gateway unavailable")]
    Unavailable,
}

impl GatewayError {
    /// `true` for the two "access denied" variants (and a decrypt failure,
    /// which is reported the same way).
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredential | Self::SessionInvalid | Self::PayloadDecryptFailure(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use linkgate_store::StoreError;

    use super::*;

    #[test]
    fn test_access_denied_variants_share_message() {
        assert_eq!(GatewayError::InvalidCredential.to_string(), "access denied");
        assert_eq!(GatewayError::SessionInvalid.to_string(), "access denied");
    }

    #[test]
    fn test_from_cipher_error() {
        let err: GatewayError = CipherError::DecryptionFailed.into();
        assert!(matches!(err, GatewayError::PayloadDecryptFailure(_)));
        assert!(err.is_access_denied());
    }

    #[test]
    fn test_from_session_error() {
        let err: GatewayError = SessionError::Store(StoreError::Unavailable("down".into())).into();
        assert!(matches!(err, GatewayError::Session(_)));
        assert!(err.to_string().contains("down"));
        assert!(!err.is_access_denied());
    }

    #[test]
    fn test_from_vault_error() {
        let err: GatewayError = VaultError::Store(StoreError::Unavailable("gone".into())).into();
        assert!(matches!(err, GatewayError::Vault(_)));
    }
}

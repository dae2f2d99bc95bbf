//! Symmetric encryption of request payloads, keyed by the session token.
//!
//! Search queries travel encrypted so that an observer of the HTTP traffic
//! (or a cache in between) cannot read them. Both ends already share a
//! secret, the session token, so the key is derived from it:
//!
//! ```text
//! key     = SHA-256(salt || token)
//! payload = base64( nonce[24] || ciphertext || tag[16] )
//! ```
//!
//! The AEAD tag means a payload encrypted under a different token, or
//! modified in transit, fails to decrypt instead of yielding garbage.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::{CipherError, SessionToken};

const NONCE_LEN: usize = 24;
const KEY_LEN: usize = 32;

/// Default salt. Deployments should override it through configuration.
pub const DEFAULT_SALT: &str = "linkgate-payload-v1";

/// Encrypts and decrypts payloads under a per-session key.
#[derive(Debug, Clone)]
pub struct TokenCipher {
    salt: String,
}

impl TokenCipher {
    /// Creates a cipher using `salt` for key derivation.
    pub fn new(salt: impl Into<String>) -> Self {
        Self { salt: salt.into() }
    }

    fn cipher_for(&self, token: &SessionToken) -> XChaCha20Poly1305 {
        let mut hasher = Sha256::new();
        hasher.update(self.salt.as_bytes());
        hasher.update(token.as_str().as_bytes());
        let digest = hasher.finalize();

        let mut key = [0_u8; KEY_LEN];
        key.copy_from_slice(&digest[..KEY_LEN]);
        XChaCha20Poly1305::new(Key::from_slice(&key))
    }

    /// Encrypts `plaintext` and returns the base64 payload.
    ///
    /// A fresh random nonce is used every call, so encrypting the same text
    /// twice produces different payloads.
    pub fn encrypt(&self, token: &SessionToken, plaintext: &str) -> Result<String, CipherError> {
        let nonce: [u8; NONCE_LEN] = rand::rng().random();
        let ciphertext = self
            .cipher_for(token)
            .encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| CipherError::EncryptionFailed)?;

        let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        output.extend_from_slice(&nonce);
        output.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(output))
    }

    /// Decrypts a base64 payload produced by [`encrypt`](Self::encrypt)
    /// under the same token.
    ///
    /// # Errors
    /// `CipherError::DecryptionFailed` for anything that is not a valid
    /// payload for this token: bad base64, too short, wrong key, tampered
    /// bytes, or plaintext that is not UTF-8.
    pub fn decrypt(&self, token: &SessionToken, payload: &str) -> Result<String, CipherError> {
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|_| CipherError::DecryptionFailed)?;
        if bytes.len() <= NONCE_LEN {
            return Err(CipherError::DecryptionFailed);
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let plaintext = self
            .cipher_for(token)
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| CipherError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::DecryptionFailed)
    }
}

impl Default for TokenCipher {
    fn default() -> Self {
        Self::new(DEFAULT_SALT)
    }
}

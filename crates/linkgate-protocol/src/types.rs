//! Core protocol types for Linkgate.
//!
//! Two kinds of types live here:
//!
//! - **Identity types** ([`SessionToken`], [`OpaqueId`], [`SessionTier`]) —
//!   the secrets and labels that the session store and link vault hand out.
//! - **Wire types** (`SessionResponse`, `SearchResponse`, …) — the JSON
//!   shapes exchanged with browser clients over HTTP. Field names are
//!   camelCase because the client is JavaScript.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Milliseconds since the UNIX epoch. Every expiry in Linkgate uses this
/// unit, because it is what clients receive as `expiresAt`.
pub type EpochMillis = u64;

/// Generates a random 32-character hex string (128 bits of entropy).
///
/// `rand::rng()` is a cryptographically secure generator seeded from the
/// OS, so the result is unguessable. Both session tokens and opaque link
/// IDs come from here: a predictable value in either would let a client
/// hijack a session or enumerate links.
pub fn random_hex_id() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Shortens a secret for logging: first 8 characters followed by `…`.
fn redact(f: &mut fmt::Formatter<'_>, prefix: &str, secret: &str) -> fmt::Result {
    let head: String = secret.chars().take(8).collect();
    if head.len() < secret.len() {
        write!(f, "{prefix}{head}…")
    } else {
        write!(f, "{prefix}{head}")
    }
}

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A bearer token identifying one session.
///
/// The token is also the key-derivation input for the payload cipher, so
/// clients must present it byte-for-byte as issued.
///
/// `Display` is redacted so that `tracing::info!(%token, ...)` never writes
/// a usable credential to the logs. Use [`SessionToken::as_str`] when the
/// raw value is needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generates a fresh random token.
    pub fn generate() -> Self {
        Self(random_hex_id())
    }

    /// Wraps a token string received from a client.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        redact(f, "tok-", &self.0)
    }
}

/// An identifier with no semantic relation to the URL it references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueId(String);

impl OpaqueId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(random_hex_id())
    }

    /// Wraps an identifier received from a client.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OpaqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        redact(f, "lnk-", &self.0)
    }
}

/// Access level of a session.
///
/// - **Public**: handed out to anyone who calls init. Short-lived.
/// - **Privileged**: handed out only after a valid access key. Long-lived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionTier {
    Public,
    Privileged,
}

impl fmt::Display for SessionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Privileged => write!(f, "privileged"),
        }
    }
}

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

/// One search hit from the content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    /// The content source's identifier for the item.
    pub id: String,
    /// Cleaned, human-readable title.
    pub title: String,
}

/// A download link as shown to the client: an opaque reference plus a label.
/// The real URL never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadLink {
    pub id: OpaqueId,
    pub label: String,
}

/// Full detail for one content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub title: String,
    pub post_id: String,
    pub links: Vec<DownloadLink>,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// `POST /api/auth` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRequest {
    pub key: String,
}

/// `POST /api/search` body. `payload` is the query encrypted with the
/// session token (see [`TokenCipher`](crate::TokenCipher)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedRequest {
    pub payload: String,
}

/// `POST /api/resolve` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub id: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Response to `GET /api/init` and a successful `POST /api/auth`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub success: bool,
    pub token: SessionToken,
    pub expires_at: EpochMillis,
}

/// Response to `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub results: Vec<ContentItem>,
}

/// Response to `GET /api/post`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailResponse {
    pub success: bool,
    pub data: PostDetail,
}

/// Response to `POST /api/resolve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub success: bool,
    pub url: String,
}

/// Body of every JSON failure response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

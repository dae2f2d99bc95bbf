//! Shared vocabulary for Linkgate.
//!
//! Everything the other crates need to agree on lives here:
//!
//! - **Types** ([`SessionToken`], [`OpaqueId`], the request/response
//!   structs): what travels between browser and gateway.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how stored records become
//!   bytes for the key-value store.
//! - **Cipher** ([`TokenCipher`]): how encrypted request payloads are
//!   opened with the session token.
//! - **Clock** ([`Clock`], [`SystemClock`], [`ManualClock`]): where "now"
//!   comes from for every expiry check.
//!
//! # Architecture
//!
//! ```text
//! Store (bytes) → Protocol (records, wire types) → Session / Vault → Gateway
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod cipher;
mod clock;
mod codec;
mod error;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use cipher::{DEFAULT_SALT, TokenCipher};
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::{CipherError, ProtocolError};
pub use types::{
    AuthRequest, ContentItem, DetailResponse, DownloadLink, EncryptedRequest, EpochMillis,
    ErrorResponse, OpaqueId, PostDetail, ResolveRequest, ResolveResponse, SearchResponse,
    SessionResponse, SessionTier, SessionToken, random_hex_id,
};

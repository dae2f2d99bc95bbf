//! Codec trait and implementations for serializing stored records.
//!
//! The session store and the link vault persist typed records in a byte
//! oriented [`KvStore`](https://docs.rs/linkgate-store). They don't care
//! HOW those records become bytes; they only need something that implements
//! [`Codec`]. [`JsonCodec`] is the one we ship: it keeps stored values
//! readable when you inspect the store by hand.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// ## Trait bounds
///
/// - `Send + Sync` → the gateway actor holds one and runs on any Tokio
///   worker thread.
/// - `'static` → the codec owns everything it needs.
///
/// `DeserializeOwned` (vs plain `Deserialize`) means the decoded value does
/// not borrow from the input buffer, so the buffer can be dropped right
/// after decoding.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// This is behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use linkgate_protocol::{Codec, ContentItem, JsonCodec};
///
/// let codec = JsonCodec;
/// let item = ContentItem { id: "42".into(), title: "Example".into() };
/// let bytes = codec.encode(&item).unwrap();
/// let decoded: ContentItem = codec.decode(&bytes).unwrap();
/// assert_eq!(decoded, item);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

//! Session management for Linkgate.
//!
//! This crate decides who may use the gateway:
//!
//! 1. **Credential checks**: validating a pre-shared access key
//!    ([`Authenticator`] trait, [`StaticKeyAuthenticator`])
//! 2. **Session tracking**: issuing bearer tokens and answering "is this
//!    token still good?" ([`SessionStore`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Gateway (above)  ← validates a token before every protected operation
//!     ↕
//! Session Layer (this crate)  ← token → {expiry, tier, fingerprint}
//!     ↕
//! Store + Protocol (below)  ← KvStore, JsonCodec, Clock, SessionToken
//! ```

mod auth;
mod error;
mod session;
mod store;

pub use auth::{Authenticator, StaticKeyAuthenticator};
pub use error::SessionError;
pub use session::{Session, SessionConfig};
pub use store::{SESSIONS_KEY, SessionStore};

//! # Linkgate
//!
//! Session-gated content gateway with single-use opaque download links.
//!
//! Clients obtain a short-lived session (anonymous, or privileged with an
//! access key), search a content source with encrypted queries, and see
//! download links only as opaque IDs. Each ID redeems exactly once for a
//! delivery URL.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use linkgate::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load()?;
//! let gateway = Gateway::<StaticKeyAuthenticator, WordPressSource>::builder()
//!     .session_config(settings.session.clone())
//!     .vault_config(settings.vault.clone())
//!     .payload_salt(settings.payload.salt.clone())
//!     .build(
//!         MemoryStore::new(),
//!         StaticKeyAuthenticator::new(settings.access.keys.clone()),
//!         WordPressSource::new(&settings.content)?,
//!     )?;
//!
//! let listener = tokio::net::TcpListener::bind(settings.server.bind_addr()).await?;
//! serve(listener, std::sync::Arc::new(gateway)).await?;
//! # Ok(())
//! # }
//! ```

mod actor;
mod error;
pub mod gateway;
pub mod server;
pub mod settings;
pub mod telemetry;

pub use actor::GatewayHandle;
pub use error::GatewayError;
pub use gateway::{Gateway, GatewayBuilder, IssuedSession, Resolution};
pub use server::{router, serve};
pub use settings::Settings;

pub mod prelude {
    pub use crate::{Gateway, GatewayBuilder, GatewayError, GatewayHandle, IssuedSession, Resolution, Settings};
    pub use crate::{router, serve};
    pub use linkgate_content::{ContentConfig, ContentError, ContentSource, RawContent, WordPressSource};
    pub use linkgate_protocol::{
        Clock, ContentItem, DownloadLink, ManualClock, OpaqueId, PostDetail, SessionToken, SystemClock,
        TokenCipher,
    };
    pub use linkgate_session::{Authenticator, SessionConfig, StaticKeyAuthenticator};
    pub use linkgate_store::{KvStore, MemoryStore};
    pub use linkgate_vault::VaultConfig;
}

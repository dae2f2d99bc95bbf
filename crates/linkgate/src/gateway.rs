//! The gateway facade: every client-facing operation in one place.
//!
//! [`Gateway`] ties the layers together:
//!
//! ```text
//! Gateway ─→ Authenticator          (access keys, synchronous)
//!         ─→ TokenCipher            (opens encrypted search payloads)
//!         ─→ ContentSource          (search / fetch, outside the actor, with timeout)
//!         ─→ LinkExtractor          (trusted links in fetched bodies)
//!         ─→ GatewayHandle ─→ actor (sessions + links in the store)
//!         ─→ GatewayRouter          (labels and delivery URLs)
//! ```
//!
//! Only the actor touches the store. Slow upstream calls never run inside
//! it, so a hung content source cannot stall session checks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use linkgate_content::{ContentError, ContentSource};
use linkgate_protocol::{
    Clock, ContentItem, DEFAULT_SALT, DownloadLink, EpochMillis, OpaqueId, PostDetail,
    SessionToken, SystemClock, TokenCipher,
};
use linkgate_session::{Authenticator, Session, SessionConfig, SessionStore};
use linkgate_store::KvStore;
use linkgate_vault::{GatewayRouter, LinkExtractor, LinkVault, VaultConfig};

use crate::GatewayError;
use crate::actor::{GatewayHandle, spawn_gateway};

/// A freshly issued session, as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub token: SessionToken,
    pub expires_at: EpochMillis,
}

impl From<Session> for IssuedSession {
    fn from(session: Session) -> Self {
        Self {
            token: session.token,
            expires_at: session.expires_at,
        }
    }
}

/// The outcome of a successful link redemption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The real download URL the opaque ID stood for.
    pub target_url: String,
    /// Where the client should be sent to fetch it.
    pub delivery_url: String,
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for configuring and starting a [`Gateway`].
///
/// # Example
///
/// ```rust,ignore
/// let gateway = Gateway::builder()
///     .session_config(settings.session.clone())
///     .vault_config(settings.vault.clone())
///     .payload_salt(&settings.payload.salt)
///     .build(MemoryStore::new(), authenticator, content_source)?;
/// ```
pub struct GatewayBuilder {
    session_config: SessionConfig,
    vault_config: VaultConfig,
    payload_salt: String,
    upstream_timeout: Duration,
    channel_size: usize,
    clock: Arc<dyn Clock>,
}

impl GatewayBuilder {
    /// Creates a builder with default settings and the system clock.
    pub fn new() -> Self {
        Self {
            session_config: SessionConfig::default(),
            vault_config: VaultConfig::default(),
            payload_salt: DEFAULT_SALT.to_string(),
            upstream_timeout: Duration::from_secs(10),
            channel_size: 64,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    pub fn vault_config(mut self, config: VaultConfig) -> Self {
        self.vault_config = config;
        self
    }

    /// Salt mixed into the payload key derivation. Clients must use the
    /// same salt.
    pub fn payload_salt(mut self, salt: impl Into<String>) -> Self {
        self.payload_salt = salt.into();
        self
    }

    /// Upper bound on each content-source call.
    pub fn upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// Capacity of the actor's command queue.
    pub fn channel_size(mut self, size: usize) -> Self {
        self.channel_size = size;
        self
    }

    /// Replaces the wall clock, typically with a `ManualClock` in tests.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Spawns the actor over `store` and returns the gateway.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// [`GatewayError::Vault`] if the trusted domains do not form a valid
    /// extraction pattern.
    pub fn build<S, A, C>(self, store: S, auth: A, content: C) -> Result<Gateway<A, C>, GatewayError>
    where
        S: KvStore,
        A: Authenticator,
        C: ContentSource,
    {
        let extractor = LinkExtractor::new(&self.vault_config.trusted_domains)?;
        let router = GatewayRouter::new(
            self.vault_config.gateways.clone(),
            self.vault_config.default_gateway.clone(),
        );

        let sessions = SessionStore::new(self.session_config, Arc::clone(&self.clock));
        let vault = LinkVault::new(self.vault_config, self.clock);
        let handle = spawn_gateway(store, sessions, vault, self.channel_size);

        Ok(Gateway {
            handle,
            auth,
            content,
            cipher: TokenCipher::new(self.payload_salt),
            extractor,
            router,
            upstream_timeout: self.upstream_timeout,
        })
    }
}

impl Default for GatewayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// The session-gated content gateway.
///
/// Shared across request handlers behind an `Arc`. All methods take
/// `&self`; the only mutable state lives in the actor.
pub struct Gateway<A: Authenticator, C: ContentSource> {
    handle: GatewayHandle,
    auth: A,
    content: C,
    cipher: TokenCipher,
    extractor: LinkExtractor,
    router: GatewayRouter,
    upstream_timeout: Duration,
}

impl<A: Authenticator, C: ContentSource> Gateway<A, C> {
    /// Creates a new builder.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::new()
    }

    /// The actor handle, for callers that need raw session or link access.
    pub fn handle(&self) -> &GatewayHandle {
        &self.handle
    }

    /// The payload cipher. Clients encrypt search queries with the same
    /// algorithm and salt.
    pub fn cipher(&self) -> &TokenCipher {
        &self.cipher
    }

    /// Issues an anonymous public session for the requester identified by
    /// `fingerprint`.
    pub async fn init(&self, fingerprint: &str) -> Result<IssuedSession, GatewayError> {
        let session = self.handle.issue_public(fingerprint).await?;
        Ok(session.into())
    }

    /// Exchanges an access key for a privileged session.
    ///
    /// # Errors
    /// [`GatewayError::InvalidCredential`] if the key is not accepted. No
    /// session is created in that case.
    pub async fn authenticate(&self, key: &str) -> Result<IssuedSession, GatewayError> {
        if !self.auth.check_credential(key) {
            tracing::warn!("access key rejected");
            return Err(GatewayError::InvalidCredential);
        }
        let session = self.handle.issue_privileged().await?;
        Ok(session.into())
    }

    /// Searches the content source with an encrypted query.
    ///
    /// The payload is decrypted with a key derived from `token`. A payload
    /// that does not decrypt is reported as [`GatewayError::SessionInvalid`].
    /// If the content source fails or times out, the result is empty.
    pub async fn search(&self, token: &SessionToken, encrypted_query: &str) -> Result<Vec<ContentItem>, GatewayError> {
        self.require_session(token).await?;

        let query = match self.cipher.decrypt(token, encrypted_query) {
            Ok(query) => query,
            Err(e) => {
                let err = GatewayError::from(e);
                tracing::debug!(%token, error = %err, "search payload rejected");
                return Err(GatewayError::SessionInvalid);
            }
        };

        match self.upstream(self.content.search(&query)).await {
            Ok(results) => {
                tracing::debug!(%token, results = results.len(), "search served");
                Ok(results)
            }
            Err(e) => {
                tracing::warn!(error = %e, "search degraded to empty result");
                Ok(Vec::new())
            }
        }
    }

    /// Fetches one content item and replaces its download links with
    /// freshly minted opaque references.
    ///
    /// # Errors
    /// - [`GatewayError::SessionInvalid`]: the token is not live
    /// - [`GatewayError::ContentNotFound`]: the source has no such item, or
    ///   could not be reached
    pub async fn fetch_detail(&self, token: &SessionToken, content_id: &str) -> Result<PostDetail, GatewayError> {
        self.require_session(token).await?;

        let raw = match self.upstream(self.content.fetch(content_id)).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Err(GatewayError::ContentNotFound),
            Err(e) => {
                tracing::warn!(content_id, error = %e, "detail degraded to not found");
                return Err(GatewayError::ContentNotFound);
            }
        };

        let urls = self.extractor.extract(&raw.body);
        let minted = self.handle.mint(urls).await?;
        let links = minted
            .into_iter()
            .map(|mapping| DownloadLink {
                label: self.router.label(&mapping.target_url).to_string(),
                id: mapping.id,
            })
            .collect::<Vec<_>>();

        tracing::info!(content_id, links = links.len(), "detail served");
        Ok(PostDetail {
            title: raw.title,
            post_id: content_id.to_string(),
            links,
        })
    }

    /// Redeems an opaque link.
    ///
    /// Session validation and redemption happen in one actor command, so
    /// a link can only ever be resolved once.
    ///
    /// # Errors
    /// - [`GatewayError::SessionInvalid`]: the token is not live
    /// - [`GatewayError::LinkNotFoundOrUsed`]: unknown, expired or already
    ///   redeemed
    pub async fn resolve(&self, token: &SessionToken, opaque_id: &OpaqueId) -> Result<Resolution, GatewayError> {
        let target_url = self.handle.resolve(token, opaque_id).await?;
        let route = self.router.route(&target_url);
        tracing::info!(%opaque_id, gateway = %route.label, "link resolved");
        Ok(Resolution {
            target_url,
            delivery_url: route.delivery_url,
        })
    }

    async fn require_session(&self, token: &SessionToken) -> Result<(), GatewayError> {
        if self.handle.validate(token).await? {
            Ok(())
        } else {
            Err(GatewayError::SessionInvalid)
        }
    }

    /// Runs a content-source call under the upstream timeout.
    async fn upstream<T>(
        &self,
        call: impl Future<Output = Result<T, ContentError>>,
    ) -> Result<T, GatewayError> {
        match tokio::time::timeout(self.upstream_timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(GatewayError::UpstreamContentSourceUnavailable(e.to_string())),
            Err(_) => Err(GatewayError::UpstreamContentSourceUnavailable(format!(
                "timed out after {:?}",
                self.upstream_timeout
            ))),
        }
    }
}

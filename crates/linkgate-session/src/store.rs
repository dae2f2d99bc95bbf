//! The session store: issues tokens and checks them.
//!
//! All sessions live as one JSON array under [`SESSIONS_KEY`], oldest first.
//! Every issue rewrites that array, and every validate that notices an
//! expired entry rewrites it too. There is no background timer: expired
//! sessions are reclaimed whenever someone happens to look at the list.
//!
//! # Concurrency note
//!
//! `SessionStore` does a read-modify-write on a single key with no locking.
//! That is only correct when one task owns it, which is how the gateway
//! uses it: the gateway actor is the only caller, and it handles one
//! command at a time.

use std::sync::Arc;

use linkgate_protocol::{
    Clock, Codec, EpochMillis, JsonCodec, SessionTier, SessionToken,
};
use linkgate_store::KvStore;

use crate::{Session, SessionConfig, SessionError};

/// Store key holding the session list.
pub const SESSIONS_KEY: &str = "sessions";

/// Issues and validates sessions held in a [`KvStore`].
///
/// The store itself is passed into each call rather than owned, so the
/// gateway actor can share one store between sessions and links.
///
/// ## Lifecycle
///
/// ```text
/// issue_*() ──→ [Active] ──(now ≥ expires_at)──→ [Expired] ──(next scan)──→ removed
///                   │
///                   └──(more than max_sessions newer)──→ evicted
/// ```
#[derive(Debug)]
pub struct SessionStore {
    config: SessionConfig,
    codec: JsonCodec,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Creates a session store reading time from `clock`.
    pub fn new(config: SessionConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            codec: JsonCodec,
            clock,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Issues an anonymous public session.
    ///
    /// # Errors
    /// Fails only if the store cannot be read or written. An undecodable
    /// session list is discarded.
    pub async fn issue_public<S: KvStore>(
        &self,
        store: &S,
        fingerprint: impl Into<String>,
    ) -> Result<Session, SessionError> {
        self.issue(store, SessionTier::Public, Some(fingerprint.into()))
            .await
    }

    /// Issues a privileged session. The caller must already have checked
    /// the access key.
    ///
    /// # Errors
    /// Fails only if the session list cannot be read or written.
    pub async fn issue_privileged<S: KvStore>(&self, store: &S) -> Result<Session, SessionError> {
        self.issue(store, SessionTier::Privileged, None).await
    }

    async fn issue<S: KvStore>(
        &self,
        store: &S,
        tier: SessionTier,
        fingerprint: Option<String>,
    ) -> Result<Session, SessionError> {
        let now = self.clock.now_ms();
        let ttl_ms = u64::try_from(self.config.ttl_for(tier).as_millis()).unwrap_or(u64::MAX);

        let session = Session {
            token: SessionToken::generate(),
            // At least 1 ms so a zero TTL still yields an expiry strictly
            // in the future at creation time.
            expires_at: now.saturating_add(ttl_ms.max(1)),
            tier,
            fingerprint,
        };

        // An unreadable list is replaced rather than blocking every issue.
        let mut sessions = match self.load(store).await {
            Ok(sessions) => sessions,
            Err(SessionError::Codec(e)) => {
                tracing::warn!(error = %e, "dropping unreadable session list");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        sessions.retain(|s| s.is_active(now));
        sessions.push(session.clone());

        // Keep only the newest `max_sessions`. The list is oldest first, so
        // eviction drains from the front.
        let cap = self.config.max_sessions.max(1);
        if sessions.len() > cap {
            let evicted = sessions.len() - cap;
            sessions.drain(..evicted);
            tracing::debug!(evicted, "session cap reached, oldest sessions evicted");
        }

        self.save(store, &sessions).await?;

        tracing::info!(
            token = %session.token,
            %tier,
            expires_at = session.expires_at,
            "session issued"
        );
        Ok(session)
    }

    /// Returns `true` if `token` names a stored session that has not
    /// expired.
    ///
    /// Never fails toward the caller. A missing session, an expired one and
    /// an unreadable store all yield `false`. When the scan sees expired
    /// sessions it rewrites the list without them.
    pub async fn validate<S: KvStore>(&self, store: &S, token: &SessionToken) -> bool {
        let sessions = match self.load(store).await {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::warn!(error = %e, "session list unreadable, rejecting token");
                return false;
            }
        };

        let now = self.clock.now_ms();
        let valid = sessions
            .iter()
            .any(|s| s.token == *token && s.is_active(now));

        if sessions.iter().any(|s| !s.is_active(now)) {
            let live: Vec<Session> = sessions.into_iter().filter(|s| s.is_active(now)).collect();
            if let Err(e) = self.save(store, &live).await {
                // Cleanup is opportunistic; the answer stands either way.
                tracing::warn!(error = %e, "failed to drop expired sessions");
            } else {
                tracing::debug!(remaining = live.len(), "expired sessions dropped");
            }
        }

        if !valid {
            tracing::debug!(%token, "token rejected");
        }
        valid
    }

    /// Returns every stored session, expired ones included.
    ///
    /// # Errors
    /// Fails if the session list cannot be read or decoded.
    pub async fn list<S: KvStore>(&self, store: &S) -> Result<Vec<Session>, SessionError> {
        self.load(store).await
    }

    /// Current time according to the injected clock.
    pub fn now(&self) -> EpochMillis {
        self.clock.now_ms()
    }

    async fn load<S: KvStore>(&self, store: &S) -> Result<Vec<Session>, SessionError> {
        match store.get(SESSIONS_KEY).await? {
            Some(bytes) => Ok(self.codec.decode(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save<S: KvStore>(&self, store: &S, sessions: &[Session]) -> Result<(), SessionError> {
        let bytes = self.codec.encode(&sessions)?;
        store.put(SESSIONS_KEY, bytes).await?;
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `SessionStore`.
    //!
    //! Naming convention: `test_{function}_{scenario}_{expected}`.
    //!
    //! Time never really passes in these tests. Each store gets a
    //! `ManualClock`, and the test moves it forward explicitly to push
    //! sessions past their expiry.

    use std::time::Duration;

    use linkgate_protocol::ManualClock;
    use linkgate_store::{MemoryStore, StoreError};

    use super::*;

    // -- Helpers ----------------------------------------------------------

    const START: EpochMillis = 1_700_000_000_000;

    fn setup(config: SessionConfig) -> (SessionStore, MemoryStore, ManualClock) {
        let clock = ManualClock::new(START);
        let sessions = SessionStore::new(config, Arc::new(clock.clone()));
        (sessions, MemoryStore::new(), clock)
    }

    fn default_setup() -> (SessionStore, MemoryStore, ManualClock) {
        setup(SessionConfig::default())
    }

    /// A store whose reads always fail.
    struct BrokenStore;

    impl KvStore for BrokenStore {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
            Err(StoreError::ReadFailed {
                key: key.to_string(),
                reason: "disk on fire".into(),
            })
        }

        async fn put(&self, _key: &str, _value: Vec<u8>) -> Result<(), StoreError> {
            Ok(())
        }

        async fn delete(&self, _key: &str) -> Result<bool, StoreError> {
            Ok(false)
        }

        async fn list(&self, _prefix: &str) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }
    }

    // =====================================================================
    // issue_public() / issue_privileged()
    // =====================================================================

    #[tokio::test]
    async fn test_issue_public_expires_after_fifteen_minutes() {
        let (sessions, store, _clock) = default_setup();

        let session = sessions.issue_public(&store, "Mozilla/5.0").await.unwrap();

        assert_eq!(session.tier, SessionTier::Public);
        assert_eq!(session.expires_at, START + 15 * 60 * 1000);
        assert_eq!(session.fingerprint.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(session.token.as_str().len(), 32);
    }

    #[tokio::test]
    async fn test_issue_privileged_expires_after_one_hour() {
        let (sessions, store, _clock) = default_setup();

        let session = sessions.issue_privileged(&store).await.unwrap();

        assert_eq!(session.tier, SessionTier::Privileged);
        assert_eq!(session.expires_at, START + 60 * 60 * 1000);
        assert_eq!(session.fingerprint, None);
    }

    #[tokio::test]
    async fn test_issue_twice_gives_unique_tokens() {
        let (sessions, store, _clock) = default_setup();

        let a = sessions.issue_public(&store, "ua").await.unwrap();
        let b = sessions.issue_public(&store, "ua").await.unwrap();

        assert_ne!(a.token, b.token, "tokens must be unique per session");
        assert_eq!(sessions.list(&store).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_issue_drops_expired_sessions() {
        let (sessions, store, clock) = default_setup();
        sessions.issue_public(&store, "old").await.unwrap();

        clock.advance(Duration::from_secs(16 * 60));
        let fresh = sessions.issue_public(&store, "new").await.unwrap();

        let stored = sessions.list(&store).await.unwrap();
        assert_eq!(stored, vec![fresh]);
    }

    #[tokio::test]
    async fn test_issue_past_cap_evicts_oldest() {
        let (sessions, store, _clock) = setup(SessionConfig {
            max_sessions: 3,
            ..SessionConfig::default()
        });

        let first = sessions.issue_public(&store, "ua").await.unwrap();
        let mut rest = Vec::new();
        for _ in 0..3 {
            rest.push(sessions.issue_public(&store, "ua").await.unwrap());
        }

        assert!(!sessions.validate(&store, &first.token).await);
        for s in &rest {
            assert!(sessions.validate(&store, &s.token).await);
        }
        assert_eq!(sessions.list(&store).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_issue_with_default_cap_keeps_most_recent_hundred() {
        let (sessions, store, _clock) = default_setup();

        let first = sessions.issue_public(&store, "ua").await.unwrap();
        for _ in 0..100 {
            sessions.issue_public(&store, "ua").await.unwrap();
        }

        assert_eq!(sessions.list(&store).await.unwrap().len(), 100);
        assert!(!sessions.validate(&store, &first.token).await);
    }

    #[tokio::test]
    async fn test_issue_store_failure_returns_error() {
        let (sessions, _store, _clock) = default_setup();

        let result = sessions.issue_privileged(&BrokenStore).await;

        assert!(matches!(result, Err(SessionError::Store(_))));
    }

    // =====================================================================
    // validate()
    // =====================================================================

    #[tokio::test]
    async fn test_validate_fresh_token_returns_true() {
        let (sessions, store, _clock) = default_setup();
        let session = sessions.issue_public(&store, "ua").await.unwrap();

        assert!(sessions.validate(&store, &session.token).await);
    }

    #[tokio::test]
    async fn test_validate_unknown_token_returns_false() {
        let (sessions, store, _clock) = default_setup();
        sessions.issue_public(&store, "ua").await.unwrap();

        assert!(!sessions.validate(&store, &SessionToken::new("nope")).await);
    }

    #[tokio::test]
    async fn test_validate_is_case_sensitive() {
        let (sessions, store, _clock) = default_setup();
        let session = sessions.issue_public(&store, "ua").await.unwrap();
        let shouted = SessionToken::new(session.token.as_str().to_uppercase());

        // Hex tokens always contain at least one letter in practice; guard
        // the rare all-digit token so the assertion stays meaningful.
        if shouted != session.token {
            assert!(!sessions.validate(&store, &shouted).await);
        }
    }

    #[tokio::test]
    async fn test_validate_expired_token_returns_false_even_if_stored() {
        let (sessions, store, clock) = default_setup();
        let session = sessions.issue_public(&store, "ua").await.unwrap();

        clock.set(session.expires_at);

        assert!(!sessions.validate(&store, &session.token).await);
    }

    #[tokio::test]
    async fn test_validate_one_ms_before_expiry_returns_true() {
        let (sessions, store, clock) = default_setup();
        let session = sessions.issue_privileged(&store).await.unwrap();

        clock.set(session.expires_at - 1);

        assert!(sessions.validate(&store, &session.token).await);
    }

    #[tokio::test]
    async fn test_validate_rewrites_list_without_expired_sessions() {
        let (sessions, store, clock) = default_setup();
        let short = sessions.issue_public(&store, "ua").await.unwrap();
        let long = sessions.issue_privileged(&store).await.unwrap();

        clock.advance(Duration::from_secs(20 * 60));
        assert!(sessions.validate(&store, &long.token).await);

        let stored = sessions.list(&store).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].token, long.token);
        assert_ne!(stored[0].token, short.token);
    }

    #[tokio::test]
    async fn test_validate_store_failure_returns_false() {
        let (sessions, _store, _clock) = default_setup();

        assert!(!sessions.validate(&BrokenStore, &SessionToken::new("t")).await);
    }

    #[tokio::test]
    async fn test_validate_corrupt_list_returns_false() {
        let (sessions, store, _clock) = default_setup();
        store.put(SESSIONS_KEY, b"not json".to_vec()).await.unwrap();

        assert!(!sessions.validate(&store, &SessionToken::new("t")).await);
    }

    #[tokio::test]
    async fn test_issue_corrupt_list_replaces_it() {
        let (sessions, store, _clock) = default_setup();
        store.put(SESSIONS_KEY, b"not json".to_vec()).await.unwrap();

        let session = sessions.issue_public(&store, "ua").await.unwrap();

        let stored = sessions.list(&store).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].token, session.token);
        assert!(sessions.validate(&store, &session.token).await);
    }

    #[tokio::test]
    async fn test_issue_huge_ttl_saturates_expiry() {
        let (sessions, store, _clock) = setup(SessionConfig {
            privileged_ttl_secs: u64::MAX,
            ..SessionConfig::default()
        });

        let session = sessions.issue_privileged(&store).await.unwrap();

        assert_eq!(session.expires_at, u64::MAX);
    }
}

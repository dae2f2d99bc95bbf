//! Session types: the record the gateway keeps for each issued token.
//!
//! A "session" answers three questions:
//! - WHICH token identifies it (`SessionToken`)
//! - WHEN it stops being valid (`expires_at`, epoch milliseconds)
//! - WHAT it was issued for (`tier`, plus the requester fingerprint for
//!   public sessions)

use std::time::Duration;

use linkgate_protocol::{EpochMillis, SessionTier, SessionToken};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session lifetimes and retention.
///
/// Deserializable so the binary can load it straight from the `session`
/// section of its settings; every field falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Lifetime of an anonymous public session, in seconds.
    ///
    /// Default: 900 (15 minutes).
    pub public_ttl_secs: u64,

    /// Lifetime of a session issued after a valid access key, in seconds.
    ///
    /// Default: 3600 (1 hour).
    pub privileged_ttl_secs: u64,

    /// How many sessions are retained. Issuing past this limit evicts the
    /// oldest sessions, which then stop validating.
    ///
    /// Default: 100.
    pub max_sessions: usize,
}

impl SessionConfig {
    /// Lifetime for sessions of the given tier.
    pub fn ttl_for(&self, tier: SessionTier) -> Duration {
        match tier {
            SessionTier::Public => Duration::from_secs(self.public_ttl_secs),
            SessionTier::Privileged => Duration::from_secs(self.privileged_ttl_secs),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            public_ttl_secs: 15 * 60,
            privileged_ttl_secs: 60 * 60,
            max_sessions: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One issued session.
///
/// Sessions are never modified after creation. They stay in the store until
/// a later issue or validate notices they have expired and drops them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The bearer token the client presents.
    pub token: SessionToken,

    /// Expiry instant. The session is valid while `now < expires_at`.
    pub expires_at: EpochMillis,

    /// Public or privileged.
    pub tier: SessionTier,

    /// The requester's `User-Agent` at issue time. Only public sessions
    /// carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl Session {
    /// Returns `true` while the session has not yet expired at `now`.
    pub fn is_active(&self, now: EpochMillis) -> bool {
        now < self.expires_at
    }
}

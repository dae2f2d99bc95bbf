//! Access-key checks for privileged sessions.
//!
//! Linkgate has no user accounts. A client earns a privileged session by
//! presenting one of a small set of pre-shared keys. The [`Authenticator`]
//! trait is the seam: the gateway only asks "is this key acceptable?", and
//! the answer can come from a static list ([`StaticKeyAuthenticator`]), a
//! secrets service, or a test double.

/// Decides whether an access key grants a privileged session.
///
/// # Trait bounds
///
/// - `Send + Sync` → the gateway is shared across request handlers running
///   on any Tokio worker thread.
/// - `'static` → the authenticator lives as long as the server.
///
/// # Example
///
/// ```rust
/// use linkgate_session::Authenticator;
///
/// /// Accepts keys starting with "dev-". Never use this in production.
/// struct DevAuthenticator;
///
/// impl Authenticator for DevAuthenticator {
///     fn check_credential(&self, key: &str) -> bool {
///         key.trim().starts_with("dev-")
///     }
/// }
///
/// assert!(DevAuthenticator.check_credential(" dev-123 "));
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Returns `true` if `key` is an accepted access key.
    ///
    /// Must not create any state: on `false` the caller reports a uniform
    /// "access denied" and nothing is stored.
    fn check_credential(&self, key: &str) -> bool;
}

/// Accepts keys from a fixed allow-list.
///
/// The presented key is trimmed of surrounding whitespace, then compared
/// exactly and case-sensitively. Empty keys are always rejected.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyAuthenticator {
    keys: Vec<String>,
}

impl StaticKeyAuthenticator {
    /// Builds an authenticator from the configured keys. Keys are trimmed
    /// the same way presented keys are; blank entries are discarded so they
    /// can never match.
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: Vec<String> = keys
            .into_iter()
            .map(|k| Into::<String>::into(k).trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if keys.is_empty() {
            tracing::warn!("no access keys configured, privileged sessions are unavailable");
        }
        Self { keys }
    }

    /// Number of usable keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if no key can ever be accepted.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Authenticator for StaticKeyAuthenticator {
    fn check_credential(&self, key: &str) -> bool {
        let key = key.trim();
        !key.is_empty() && self.keys.iter().any(|k| k == key)
    }
}

//! Gateway actor: the single task that owns the key-value store.
//!
//! Sessions and link mappings are read-modify-write records. Instead of
//! guarding them with locks, one Tokio task owns the store and processes
//! commands from an mpsc channel one at a time. Anything that touches
//! persisted state goes through a [`GatewayHandle`].
//!
//! ```text
//! handler ─┐
//! handler ─┼─→ mpsc ─→ GatewayActor { store, sessions, vault }
//! handler ─┘              │
//!      ↑                  │
//!      └──── oneshot ─────┘
//! ```
//!
//! Because commands run strictly in arrival order, two redemptions of the
//! same link can never interleave: exactly one of them sees the mapping.

use linkgate_protocol::{OpaqueId, SessionToken};
use linkgate_session::{Session, SessionStore};
use linkgate_store::KvStore;
use linkgate_vault::{LinkMapping, LinkVault};
use tokio::sync::{mpsc, oneshot};

use crate::GatewayError;

/// Commands sent to the gateway actor.
///
/// Each variant carries a `oneshot::Sender` reply channel: the caller
/// sends the command and awaits the answer on the other end.
pub(crate) enum GatewayCommand {
    IssuePublic {
        fingerprint: String,
        reply: oneshot::Sender<Result<Session, GatewayError>>,
    },

    IssuePrivileged {
        reply: oneshot::Sender<Result<Session, GatewayError>>,
    },

    Validate {
        token: SessionToken,
        reply: oneshot::Sender<bool>,
    },

    Mint {
        urls: Vec<String>,
        reply: oneshot::Sender<Result<Vec<LinkMapping>, GatewayError>>,
    },

    /// Validate the session and redeem the link in one step, so no other
    /// command can run between the two.
    Resolve {
        token: SessionToken,
        id: OpaqueId,
        reply: oneshot::Sender<Result<String, GatewayError>>,
    },

    Shutdown,
}

/// Handle to a running gateway actor.
///
/// Cheap to clone: it is just an `mpsc::Sender`. Every method fails with
/// [`GatewayError::Unavailable`] once the actor has stopped.
#[derive(Clone, Debug)]
pub struct GatewayHandle {
    sender: mpsc::Sender<GatewayCommand>,
}

impl GatewayHandle {
    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> GatewayCommand,
    ) -> Result<T, GatewayError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(command(reply_tx))
            .await
            .map_err(|_| GatewayError::Unavailable)?;
        reply_rx.await.map_err(|_| GatewayError::Unavailable)
    }

    /// Issues a public session.
    pub async fn issue_public(&self, fingerprint: impl Into<String>) -> Result<Session, GatewayError> {
        let fingerprint = fingerprint.into();
        self.request(|reply| GatewayCommand::IssuePublic { fingerprint, reply })
            .await?
    }

    /// Issues a privileged session. The access key must already be checked.
    pub async fn issue_privileged(&self) -> Result<Session, GatewayError> {
        self.request(|reply| GatewayCommand::IssuePrivileged { reply })
            .await?
    }

    /// Returns `true` if `token` is a live session.
    pub async fn validate(&self, token: &SessionToken) -> Result<bool, GatewayError> {
        let token = token.clone();
        self.request(|reply| GatewayCommand::Validate { token, reply })
            .await
    }

    /// Mints one opaque link per distinct URL.
    pub async fn mint(&self, urls: Vec<String>) -> Result<Vec<LinkMapping>, GatewayError> {
        self.request(|reply| GatewayCommand::Mint { urls, reply })
            .await?
    }

    /// Validates `token`, then redeems `id` for its target URL.
    ///
    /// # Errors
    /// - [`GatewayError::SessionInvalid`]: the token is not live; the link
    ///   is left untouched
    /// - [`GatewayError::LinkNotFoundOrUsed`]: unknown, expired or already
    ///   redeemed
    pub async fn resolve(&self, token: &SessionToken, id: &OpaqueId) -> Result<String, GatewayError> {
        let token = token.clone();
        let id = id.clone();
        self.request(|reply| GatewayCommand::Resolve { token, id, reply })
            .await?
    }

    /// Tells the actor to stop after the commands already queued.
    pub async fn shutdown(&self) -> Result<(), GatewayError> {
        self.sender
            .send(GatewayCommand::Shutdown)
            .await
            .map_err(|_| GatewayError::Unavailable)
    }
}

/// The actor's state. Lives inside the spawned task.
struct GatewayActor<S: KvStore> {
    store: S,
    sessions: SessionStore,
    vault: LinkVault,
    receiver: mpsc::Receiver<GatewayCommand>,
}

impl<S: KvStore> GatewayActor<S> {
    /// Processes commands until shutdown or until every handle is dropped.
    async fn run(mut self) {
        tracing::info!("gateway actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                GatewayCommand::IssuePublic { fingerprint, reply } => {
                    let result = self
                        .sessions
                        .issue_public(&self.store, fingerprint)
                        .await
                        .map_err(GatewayError::from);
                    let _ = reply.send(result);
                }
                GatewayCommand::IssuePrivileged { reply } => {
                    let result = self
                        .sessions
                        .issue_privileged(&self.store)
                        .await
                        .map_err(GatewayError::from);
                    let _ = reply.send(result);
                }
                GatewayCommand::Validate { token, reply } => {
                    let valid = self.sessions.validate(&self.store, &token).await;
                    let _ = reply.send(valid);
                }
                GatewayCommand::Mint { urls, reply } => {
                    let result = self
                        .vault
                        .mint(&self.store, &urls[..])
                        .await
                        .map_err(GatewayError::from);
                    let _ = reply.send(result);
                }
                GatewayCommand::Resolve { token, id, reply } => {
                    let result = self.handle_resolve(&token, &id).await;
                    let _ = reply.send(result);
                }
                GatewayCommand::Shutdown => {
                    tracing::info!("gateway shutting down");
                    break;
                }
            }
        }

        tracing::info!("gateway actor stopped");
    }

    async fn handle_resolve(&self, token: &SessionToken, id: &OpaqueId) -> Result<String, GatewayError> {
        if !self.sessions.validate(&self.store, token).await {
            return Err(GatewayError::SessionInvalid);
        }
        self.vault
            .redeem(&self.store, id)
            .await?
            .ok_or(GatewayError::LinkNotFoundOrUsed)
    }
}

/// Spawns the gateway actor and returns a handle to it.
///
/// `channel_size` bounds the command queue; when it is full, callers wait.
/// Must be called from within a Tokio runtime.
pub(crate) fn spawn_gateway<S: KvStore>(
    store: S,
    sessions: SessionStore,
    vault: LinkVault,
    channel_size: usize,
) -> GatewayHandle {
    let (tx, rx) = mpsc::channel(channel_size.max(1));

    let actor = GatewayActor {
        store,
        sessions,
        vault,
        receiver: rx,
    };
    tokio::spawn(actor.run());

    GatewayHandle { sender: tx }
}

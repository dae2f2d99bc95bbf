//! The link vault: opaque IDs that resolve to a real URL exactly once.
//!
//! Each mapping is stored under its own key, `link_{id}`, so redemption is
//! a single delete. The vault deletes BEFORE it looks at the expiry: a
//! link is consumed by the first redemption attempt whether or not it was
//! still valid, and a second attempt can never see it.
//!
//! Like the session store, the vault takes the [`KvStore`] by reference on
//! every call and is meant to be driven by one task.

use std::collections::HashSet;
use std::sync::Arc;

use linkgate_protocol::{Clock, Codec, EpochMillis, JsonCodec, OpaqueId};
use linkgate_store::KvStore;
use serde::{Deserialize, Serialize};

use crate::{VaultConfig, VaultError};

/// Prefix of every link key in the store.
pub const LINK_KEY_PREFIX: &str = "link_";

fn link_key(id: &OpaqueId) -> String {
    format!("{LINK_KEY_PREFIX}{}", id.as_str())
}

/// A minted link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMapping {
    pub id: OpaqueId,
    pub target_url: String,
    pub expires_at: EpochMillis,
}

/// What is persisted under `link_{id}`. The id is the key, so it is not
/// repeated in the value.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLink {
    target_url: String,
    expires_at: EpochMillis,
}

impl StoredLink {
    /// A link is still redeemable at the exact `expires_at` instant.
    fn is_expired(&self, now: EpochMillis) -> bool {
        now > self.expires_at
    }
}

/// Mints and redeems single-use link mappings.
#[derive(Debug)]
pub struct LinkVault {
    config: VaultConfig,
    codec: JsonCodec,
    clock: Arc<dyn Clock>,
}

impl LinkVault {
    pub fn new(config: VaultConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            codec: JsonCodec,
            clock,
        }
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Mints one mapping per distinct URL in `target_urls`.
    ///
    /// Duplicates collapse onto their first occurrence, and the result keeps
    /// first-occurrence order. Every mapping gets a fresh random ID and
    /// expires `link_ttl` from now. When `sweep_on_mint` is set, expired
    /// mappings are deleted first.
    ///
    /// # Errors
    /// Fails if the store rejects a write. Mappings written before the
    /// failure stay in the store until they expire.
    pub async fn mint<S, U>(&self, store: &S, target_urls: &[U]) -> Result<Vec<LinkMapping>, VaultError>
    where
        S: KvStore,
        U: AsRef<str> + Sync,
    {
        if self.config.sweep_on_mint {
            // A failed sweep only delays cleanup; minting goes ahead.
            if let Err(e) = self.sweep(store).await {
                tracing::warn!(error = %e, "expired link sweep failed");
            }
        }

        let expires_at = self
            .clock
            .now_ms()
            .saturating_add(u64::try_from(self.config.link_ttl().as_millis()).unwrap_or(u64::MAX));

        let mut seen = HashSet::new();
        let mut minted = Vec::new();
        for url in target_urls {
            let url: &str = url.as_ref();
            if !seen.insert(url) {
                continue;
            }

            let id = OpaqueId::generate();
            let record = StoredLink {
                target_url: url.to_string(),
                expires_at,
            };
            store.put(&link_key(&id), self.codec.encode(&record)?).await?;

            minted.push(LinkMapping {
                id,
                target_url: record.target_url,
                expires_at,
            });
        }

        tracing::info!(count = minted.len(), expires_at, "links minted");
        Ok(minted)
    }

    /// Redeems `id`, returning its target URL if this is the first attempt
    /// and the link has not expired.
    ///
    /// The mapping is gone after this call in every case. Unknown IDs,
    /// already-redeemed IDs and expired IDs all return `Ok(None)`.
    ///
    /// # Errors
    /// Fails if the store cannot be read or the delete fails, or if the
    /// stored record is corrupt.
    pub async fn redeem<S: KvStore>(&self, store: &S, id: &OpaqueId) -> Result<Option<String>, VaultError> {
        if id.as_str().is_empty() {
            return Ok(None);
        }

        let key = link_key(id);
        let Some(bytes) = store.get(&key).await? else {
            tracing::debug!(%id, "link not found");
            return Ok(None);
        };

        // Consume first. If someone else deleted it between our read and
        // this delete, they won the redemption.
        if !store.delete(&key).await? {
            tracing::debug!(%id, "link already redeemed");
            return Ok(None);
        }

        let record: StoredLink = self.codec.decode(&bytes)?;
        if record.is_expired(self.clock.now_ms()) {
            tracing::info!(%id, "expired link consumed");
            return Ok(None);
        }

        tracing::info!(%id, "link redeemed");
        Ok(Some(record.target_url))
    }

    /// Deletes every mapping that has expired, along with any that cannot be
    /// decoded. Returns the number removed.
    ///
    /// # Errors
    /// Fails if the store cannot list, read or delete keys.
    pub async fn sweep<S: KvStore>(&self, store: &S) -> Result<usize, VaultError> {
        let now = self.clock.now_ms();
        let mut removed = 0;

        for key in store.list(LINK_KEY_PREFIX).await? {
            let Some(bytes) = store.get(&key).await? else {
                continue;
            };
            let expired = match self.codec.decode::<StoredLink>(&bytes) {
                Ok(record) => record.is_expired(now),
                Err(e) => {
                    tracing::warn!(%key, error = %e, "dropping unreadable link record");
                    true
                }
            };
            if expired && store.delete(&key).await? {
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::debug!(removed, "expired links swept");
        }
        Ok(removed)
    }
}

//! Storage abstraction layer for Linkgate.
//!
//! Provides the [`KvStore`] trait: the consistent key-value store that holds
//! the gateway's sessions and link mappings. The gateway never assumes more
//! than get/put/delete/list semantics, so any backend that offers those
//! (an embedded map, Redis, a durable object) can sit underneath it.
//!
//! # Feature Flags
//!
//! - `memory` (default) — in-process [`MemoryStore`] backed by a `BTreeMap`

mod error;
#[cfg(feature = "memory")]
mod memory;

pub use error::StoreError;
#[cfg(feature = "memory")]
pub use memory::MemoryStore;

use std::future::Future;
use std::sync::Arc;

/// A consistent key-value store with byte values.
///
/// Values are opaque to the store. Higher layers encode them with the
/// protocol crate's codec.
///
/// Methods return `impl Future + Send` rather than using `async fn` so that
/// generic callers can move the futures onto the Tokio runtime.
pub trait KvStore: Send + Sync + 'static {
    /// Reads the value stored under `key`, or `None` if there is none.
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StoreError>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn put(
        &self,
        key: &str,
        value: Vec<u8>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes `key`. Returns `true` if a value was present.
    fn delete(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Lists every key starting with `prefix`, in ascending order.
    fn list(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;
}

/// Sharing a store through an `Arc` lets tests keep a handle on the same
/// data the gateway actor owns.
impl<S: KvStore> KvStore for Arc<S> {
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StoreError>> + Send {
        S::get(self, key)
    }

    fn put(
        &self,
        key: &str,
        value: Vec<u8>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send {
        S::put(self, key, value)
    }

    fn delete(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send {
        S::delete(self, key)
    }

    fn list(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send {
        S::list(self, prefix)
    }
}

//! The content-source seam.

use std::future::Future;

use linkgate_protocol::ContentItem;

use crate::ContentError;

/// One content item as fetched, before its links are extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContent {
    pub id: String,
    /// Display title, already cleaned.
    pub title: String,
    /// Raw HTML body.
    pub body: String,
}

/// Somewhere to search for content and fetch item bodies.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → the gateway shares one source across every
///   request handler.
/// - The returned futures are `Send` so handlers can await them on any
///   Tokio worker thread.
pub trait ContentSource: Send + Sync + 'static {
    /// Searches for items matching `query`.
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<ContentItem>, ContentError>> + Send;

    /// Fetches one item. `Ok(None)` means the source has no such item.
    fn fetch(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<RawContent>, ContentError>> + Send;
}

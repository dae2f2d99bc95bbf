//! Error types for content sources.

/// Errors from talking to a content source.
///
/// The gateway never shows these to clients: a failed search becomes an
/// empty result list and a failed lookup becomes "not found".
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The request could not be sent or the body could not be read.
    #[error("content request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The source answered with a non-success status.
    #[error("content source returned status {0}")]
    Status(u16),

    /// The HTTP client could not be built from the configuration.
    #[error("content client misconfigured: {0}")]
    Config(String),
}

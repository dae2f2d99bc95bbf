/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading a value failed.
    #[error("read failed for key {key}: {reason}")]
    ReadFailed { key: String, reason: String },

    /// Writing a value failed.
    #[error("write failed for key {key}: {reason}")]
    WriteFailed { key: String, reason: String },

    /// Deleting a value failed.
    #[error("delete failed for key {key}: {reason}")]
    DeleteFailed { key: String, reason: String },

    /// The backing store is no longer reachable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

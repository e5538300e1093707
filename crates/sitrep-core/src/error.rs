use thiserror::Error;

pub type Result<T> = std::result::Result<T, SitrepError>;

#[derive(Debug, Error)]
pub enum SitrepError {
    /// The completion client errored, timed out, or returned an unusable
    /// response. Timeouts are deliberately not a distinguished case.
    #[error("Completion failed: {0}")]
    Completion(String),

    #[error("No completion API key configured")]
    MissingApiKey,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backing store error: {0}")]
    BackingStore(String),
}

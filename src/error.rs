use thiserror::Error;

/// Errors raised by store and model operations.
///
/// Malformed documents are never an error: they are normalized best-effort.
/// Only unparseable JSON text and poisoned locks surface here.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A lock guarding the graph, the document snapshot or a model was
    /// poisoned by a panicking holder.
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// The input was not valid JSON.
    #[error("document serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

use thiserror::Error;

use super::store::StoreError;

/// Errors from impersonation stack operations.
///
/// Malformed persisted state is deliberately not represented here: reads
/// treat it as an empty stack instead of failing, so callers only ever see
/// errors for invalid input or for writes that could not be completed.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Impersonation token cannot be empty")]
    EmptyToken,

    #[error("Unknown actor kind: '{0}'")]
    UnknownActorKind(String),

    #[error("Failed to encode impersonation stack: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Session store failure: {0}")]
    Store(#[from] StoreError),
}

//! Error types for the sync adapter.
//!
//! # Design
//! `SyncError` covers everything that goes wrong before a request reaches the
//! network (configuration errors) plus payload decoding on the caller side.
//! Network-level failures never surface here: the executor folds them into a
//! `TransportOutcome`, so a caller sees exactly one of the two per sync call.

use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors returned by `SyncClient` and the registry.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Neither the options, the model configuration, nor the model handle
    /// produced a URL. No request was sent.
    #[error("no base URL resolved for model `{model}`")]
    MissingUrl { model: String },

    /// The operation name does not map to an HTTP method.
    #[error("unmapped sync operation `{0}`")]
    UnmappedOperation(String),

    /// `sync_named` was called for a model that was never registered.
    #[error("model `{0}` is not registered")]
    UnknownModel(String),

    /// The request body could not be encoded for the wire.
    #[error("body encoding failed: {0}")]
    Encoding(String),

    /// The outcome carries no response text to decode.
    #[error("response has no text payload")]
    EmptyResponse,

    /// The response text could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl SyncError {
    /// Whether this is a configuration error raised before dispatch.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SyncError::MissingUrl { .. } | SyncError::UnmappedOperation(_) | SyncError::UnknownModel(_)
        )
    }
}

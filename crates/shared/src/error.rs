//! Protocol error types

use thiserror::Error;

/// Failures crossing the wire boundary.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Incoming frame was not a valid message
    #[error("Malformed message: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Outgoing message or its parameters could not be encoded
    #[error("Encode failed: {0}")]
    Encode(#[source] serde_json::Error),
}

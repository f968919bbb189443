use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error payload surfaced by the Call Service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("call service error (status {status:?}): {message}")]
pub struct ServiceError {
    /// HTTP-like status code, when the service supplies one
    pub status: Option<u16>,

    /// Human-readable message from the service
    pub message: String,
}

/// Lifecycle and audio events emitted by the Call Service.
///
/// Expected order is start, then any number of speech/volume events, then
/// end — but the controller tolerates out-of-order and duplicate delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum CallEvent {
    CallStart,
    CallEnd,
    SpeechStart,
    SpeechEnd,
    VolumeLevel(f32),
    Error(ServiceError),
}

/// Known signature of the "missing/invalid public key" rejection.
pub fn is_public_key_error(err: &ServiceError) -> bool {
    matches!(err.status, Some(401) | Some(403))
        || err.message.to_ascii_lowercase().contains("public key")
}

use super::events::{CallEvent, ServiceError};
use tokio::sync::mpsc;

/// Handle to a session the Call Service agreed to open.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    /// Opaque session identifier assigned by the service
    pub id: String,
}

/// Real-time call session provider.
///
/// The service owns audio transport and the conversation itself; this crate
/// only drives session lifecycle. Implementations are expected to be
/// process-wide singletons: one instance, constructed at startup and shared
/// by reference. Re-constructing the client would duplicate event
/// subscriptions and network sessions.
#[async_trait::async_trait]
pub trait CallService: Send + Sync {
    /// Request a new session with the given assistant configuration.
    async fn start(&self, assistant_id: &str) -> Result<SessionHandle, ServiceError>;

    /// Request termination of the current session.
    async fn stop(&self) -> Result<(), ServiceError>;

    /// Take the lifecycle event stream.
    ///
    /// Called once for the process lifetime; the controller owns the single
    /// subscription.
    async fn subscribe(&self) -> Result<mpsc::Receiver<CallEvent>, ServiceError>;
}

//! Host runtime seam - the primitives the phone-side firmware environment
//! exposes to the companion

use yaswf_proto::AppMessage;

/// Opaque acknowledgment the host runtime hands back for a delivered app
/// message. Nothing in it is meaningful to us beyond "it arrived".
#[derive(Debug, Clone, Copy, Default)]
pub struct Ack;

/// Reason the host runtime gave for refusing or losing an app message.
#[derive(Debug, thiserror::Error)]
#[error("app message not delivered: {reason}")]
pub struct SendError {
    pub reason: String,
}

impl SendError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

/// The three primitives the companion consumes from its host.
///
/// On a real device this is the firmware bridge; tests substitute a mock that
/// records calls. `send_app_message` resolves when the host acknowledges (or
/// rejects) the transmission - the two continuations of the native API are the
/// two arms of the returned `Result`, each taken at most once per send.
#[async_trait::async_trait]
pub trait HostRuntime: Send + Sync + 'static {
    /// Open an absolute URL in the phone-side browser. Fire-and-forget; the
    /// host reports nothing back.
    fn open_url(&self, url: &str);

    /// Queue one app message toward the watch and wait for the ack.
    async fn send_app_message(&self, message: AppMessage) -> Result<Ack, SendError>;
}

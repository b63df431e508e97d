//! yaswf Companion
//!
//! Phone-side companion for the yaswf watchface. It bridges the watch and the
//! remote configuration page: when the host runtime asks for configuration it
//! opens the page, and when the page's webview closes it decodes the returned
//! settings and forwards them to the watch over the app message channel.
//!
//! Handlers are registered against named lifecycle events, the same
//! subscribe-by-name shape the host runtime itself uses:
//!
//! ```ignore
//! use std::sync::Arc;
//! use yaswf_companion::{Companion, HostEvent, EVENT_WEBVIEW_CLOSED};
//!
//! #[tokio::main]
//! async fn main() {
//!     let companion = Companion::with_lifecycle_handlers(Arc::new(runtime));
//!     companion
//!         .dispatch(EVENT_WEBVIEW_CLOSED, HostEvent::with_response(raw))
//!         .await
//!         .unwrap();
//! }
//! ```

mod handlers;
mod runtime;

pub use handlers::{CONFIG_URL, EVENT_READY, EVENT_SHOW_CONFIGURATION, EVENT_WEBVIEW_CLOSED};
pub use runtime::{Ack, HostRuntime, SendError};
pub use yaswf_proto::{AppMessage, Configuration, DecodeError, KEY_VIBRATE, decode_response};

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

/// Event handler function type
pub type EventHandler<R> =
    Box<dyn Fn(Arc<R>, HostEvent) -> BoxFuture<'static, Result<(), CompanionError>> + Send + Sync>;

/// One lifecycle event as delivered by the host runtime's dispatch loop.
#[derive(Debug, Clone, Default)]
pub struct HostEvent {
    /// Percent-encoded payload carried by `webviewclosed`; absent on the
    /// other events.
    pub response: Option<String>,
}

impl HostEvent {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_response(raw: impl Into<String>) -> Self {
        Self { response: Some(raw.into()) }
    }
}

/// Faults that abort a handler. Transmission failures are not among them -
/// those end at a log line inside the handler.
#[derive(Debug, thiserror::Error)]
pub enum CompanionError {
    #[error("configuration response could not be decoded: {0}")]
    Decode(#[from] DecodeError),
    #[error("webviewclosed event carried no response")]
    MissingResponse,
}

/// The companion: handlers registered by event name against a host runtime.
///
/// Handlers are independent and stateless; nothing here pairs a
/// `showConfiguration` with the `webviewclosed` that answers it.
pub struct Companion<R: HostRuntime> {
    runtime: Arc<R>,
    handlers: HashMap<String, EventHandler<R>>,
}

impl<R: HostRuntime> Companion<R> {
    /// Companion with no handlers registered yet.
    pub fn new(runtime: Arc<R>) -> Self {
        Self { runtime, handlers: HashMap::new() }
    }

    /// Companion with the standard watchface lifecycle handlers registered.
    pub fn with_lifecycle_handlers(runtime: Arc<R>) -> Self {
        let mut companion = Self::new(runtime);
        handlers::register(&mut companion);
        companion
    }

    /// Register a handler for a named lifecycle event.
    pub fn on<F, Fut>(&mut self, event: &str, handler: F)
    where
        F: Fn(Arc<R>, HostEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), CompanionError>> + Send + 'static,
    {
        self.handlers.insert(
            event.to_string(),
            Box::new(move |runtime, event| -> BoxFuture<'static, Result<(), CompanionError>> {
                Box::pin(handler(runtime, event))
            }),
        );
    }

    /// Dispatch one event, running the matching handler to completion.
    ///
    /// Events nobody subscribed to are dropped, as the host runtime drops
    /// them for apps that never registered a listener.
    pub async fn dispatch(&self, event: &str, payload: HostEvent) -> Result<(), CompanionError> {
        match self.handlers.get(event) {
            Some(handler) => handler(self.runtime.clone(), payload).await,
            None => Ok(()),
        }
    }

    pub fn runtime(&self) -> &Arc<R> {
        &self.runtime
    }
}

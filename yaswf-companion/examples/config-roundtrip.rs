//! Config roundtrip - the full lifecycle against a simulated host runtime
//!
//! Walks the companion through ready -> showConfiguration -> webviewclosed
//! with the payload the goddess-gate.com page would return, and prints what
//! would reach the watch.
//!
//! Usage:
//!   cargo run --example config-roundtrip

use std::sync::Arc;

use yaswf_companion::{
    Ack, AppMessage, Companion, EVENT_READY, EVENT_SHOW_CONFIGURATION, EVENT_WEBVIEW_CLOSED,
    HostEvent, HostRuntime, SendError,
};

struct SimulatedHost;

#[async_trait::async_trait]
impl HostRuntime for SimulatedHost {
    fn open_url(&self, url: &str) {
        println!("[HOST] webview opens {}", url);
    }

    async fn send_app_message(&self, message: AppMessage) -> Result<Ack, SendError> {
        let json = serde_json::to_string(&message)
            .map_err(|e| SendError::new(format!("unserializable message: {}", e)))?;
        println!("[HOST] app message to watch: {}", json);
        Ok(Ack)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let companion = Companion::with_lifecycle_handlers(Arc::new(SimulatedHost));

    companion.dispatch(EVENT_READY, HostEvent::empty()).await?;
    companion
        .dispatch(EVENT_SHOW_CONFIGURATION, HostEvent::empty())
        .await?;

    // what the config page hands back when the user closes it
    let raw = "%7B%22vibrate%22%3Atrue%7D";
    companion
        .dispatch(EVENT_WEBVIEW_CLOSED, HostEvent::with_response(raw))
        .await?;

    Ok(())
}

//! Loop-back harness: drives the companion's lifecycle events from the
//! command line so the hand-off can be exercised without watch firmware.

use std::env;
use std::sync::Arc;

use yaswf_companion::{
    Ack, AppMessage, Companion, EVENT_READY, EVENT_SHOW_CONFIGURATION, EVENT_WEBVIEW_CLOSED,
    HostEvent, HostRuntime, SendError,
};

/// Prints every primitive call instead of talking to real firmware.
struct LoopbackRuntime;

#[async_trait::async_trait]
impl HostRuntime for LoopbackRuntime {
    fn open_url(&self, url: &str) {
        println!("open URL: {}", url);
    }

    async fn send_app_message(&self, message: AppMessage) -> Result<Ack, SendError> {
        let json = serde_json::to_string(&message)
            .map_err(|e| SendError::new(format!("unserializable message: {}", e)))?;
        println!("app message: {}", json);
        Ok(Ack)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let args: Vec<String> = env::args().collect();
    let companion = Companion::with_lifecycle_handlers(Arc::new(LoopbackRuntime));

    match args.get(1).map(|s| s.as_str()) {
        Some("ready") | None => {
            companion.dispatch(EVENT_READY, HostEvent::empty()).await?;
        }
        Some("configure") => {
            companion
                .dispatch(EVENT_SHOW_CONFIGURATION, HostEvent::empty())
                .await?;
        }
        Some("closed") => {
            let raw = args.get(2).ok_or("closed requires the raw response argument")?;
            companion
                .dispatch(EVENT_WEBVIEW_CLOSED, HostEvent::with_response(raw))
                .await?;
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            eprintln!("Usage: yaswf-companion [ready|configure|closed <raw-response>]");
            eprintln!("  raw-response: percent-encoded JSON, e.g. %7B%22vibrate%22%3Atrue%7D");
            std::process::exit(1);
        }
    }

    Ok(())
}

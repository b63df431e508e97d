//! Standard watchface lifecycle handlers

use std::sync::Arc;

use crate::{Companion, CompanionError, HostEvent, HostRuntime};
use yaswf_proto::decode_response;

/// Sole entry point of the remote configuration page.
pub const CONFIG_URL: &str = "https://goddess-gate.com/yaswf/index.html";

/// Event names as the host runtime dispatches them.
pub const EVENT_READY: &str = "ready";
pub const EVENT_SHOW_CONFIGURATION: &str = "showConfiguration";
pub const EVENT_WEBVIEW_CLOSED: &str = "webviewclosed";

pub(crate) fn register<R: HostRuntime>(companion: &mut Companion<R>) {
    companion.on(EVENT_READY, on_ready);
    companion.on(EVENT_SHOW_CONFIGURATION, on_show_configuration);
    companion.on(EVENT_WEBVIEW_CLOSED, on_webview_closed);
}

/// Stateless and safe to fire any number of times.
async fn on_ready<R: HostRuntime>(
    _runtime: Arc<R>,
    _event: HostEvent,
) -> Result<(), CompanionError> {
    tracing::info!("yaswf companion ready");
    Ok(())
}

/// Points the host at the configuration page and returns immediately; the
/// user's answer arrives later as a separate `webviewclosed` event.
async fn on_show_configuration<R: HostRuntime>(
    runtime: Arc<R>,
    _event: HostEvent,
) -> Result<(), CompanionError> {
    runtime.open_url(CONFIG_URL);
    Ok(())
}

/// Decodes the page's answer and forwards the vibrate setting to the watch.
///
/// A response that fails to decode aborts the handler before anything is
/// sent. A send the host rejects is only worth a log line - no retry, nobody
/// upstream to tell.
async fn on_webview_closed<R: HostRuntime>(
    runtime: Arc<R>,
    event: HostEvent,
) -> Result<(), CompanionError> {
    let raw = event.response.ok_or(CompanionError::MissingResponse)?;
    let configuration = decode_response(&raw)?;
    tracing::info!(?configuration, "configuration window returned");

    match runtime.send_app_message(configuration.to_app_message()).await {
        Ok(_ack) => tracing::info!("settings sent to watch"),
        Err(e) => tracing::warn!("settings send failed: {e}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{Ack, SendError};
    use yaswf_proto::{AppMessage, KEY_VIBRATE};

    /// Records every primitive call; optionally nacks sends.
    struct MockRuntime {
        opened: Mutex<Vec<String>>,
        sent: Mutex<Vec<AppMessage>>,
        fail_send: bool,
    }

    impl MockRuntime {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                opened: Mutex::new(Vec::new()),
                sent: Mutex::new(Vec::new()),
                fail_send: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                opened: Mutex::new(Vec::new()),
                sent: Mutex::new(Vec::new()),
                fail_send: true,
            })
        }

        fn sent(&self) -> Vec<AppMessage> {
            self.sent.lock().unwrap().clone()
        }

        fn opened(&self) -> Vec<String> {
            self.opened.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl HostRuntime for MockRuntime {
        fn open_url(&self, url: &str) {
            self.opened.lock().unwrap().push(url.to_string());
        }

        async fn send_app_message(&self, message: AppMessage) -> Result<Ack, SendError> {
            self.sent.lock().unwrap().push(message);
            if self.fail_send {
                Err(SendError::new("watch not reachable"))
            } else {
                Ok(Ack)
            }
        }
    }

    #[tokio::test]
    async fn ready_is_idempotent() {
        let runtime = MockRuntime::new();
        let companion = Companion::with_lifecycle_handlers(runtime.clone());

        companion.dispatch(EVENT_READY, HostEvent::empty()).await.unwrap();
        companion.dispatch(EVENT_READY, HostEvent::empty()).await.unwrap();

        assert!(runtime.opened().is_empty());
        assert!(runtime.sent().is_empty());
    }

    #[tokio::test]
    async fn show_configuration_opens_the_config_page_once() {
        let runtime = MockRuntime::new();
        let companion = Companion::with_lifecycle_handlers(runtime.clone());

        companion
            .dispatch(EVENT_SHOW_CONFIGURATION, HostEvent::empty())
            .await
            .unwrap();

        assert_eq!(runtime.opened(), vec![CONFIG_URL.to_string()]);
        assert!(runtime.sent().is_empty());
    }

    #[tokio::test]
    async fn webview_closed_forwards_each_boolean() {
        for (raw, vibrate) in [
            ("%7B%22vibrate%22%3Atrue%7D", true),
            ("%7B%22vibrate%22%3Afalse%7D", false),
        ] {
            let runtime = MockRuntime::new();
            let companion = Companion::with_lifecycle_handlers(runtime.clone());

            companion
                .dispatch(EVENT_WEBVIEW_CLOSED, HostEvent::with_response(raw))
                .await
                .unwrap();

            let sent = runtime.sent();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].len(), 1);
            assert_eq!(sent[0].get(KEY_VIBRATE), Some(&serde_json::json!(vibrate)));
        }
    }

    #[tokio::test]
    async fn webview_closed_without_vibrate_still_sends() {
        // Accepted lenient behavior: the key goes out as null and the
        // firmware decides what that means.
        let runtime = MockRuntime::new();
        let companion = Companion::with_lifecycle_handlers(runtime.clone());

        companion
            .dispatch(EVENT_WEBVIEW_CLOSED, HostEvent::with_response("%7B%7D"))
            .await
            .unwrap();

        let sent = runtime.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].get(KEY_VIBRATE), Some(&serde_json::Value::Null));
    }

    #[tokio::test]
    async fn malformed_response_faults_before_any_send() {
        let runtime = MockRuntime::new();
        let companion = Companion::with_lifecycle_handlers(runtime.clone());

        let result = companion
            .dispatch(EVENT_WEBVIEW_CLOSED, HostEvent::with_response("not-json"))
            .await;

        assert!(matches!(result, Err(CompanionError::Decode(_))));
        assert!(runtime.sent().is_empty());
    }

    #[tokio::test]
    async fn missing_response_faults_before_any_send() {
        let runtime = MockRuntime::new();
        let companion = Companion::with_lifecycle_handlers(runtime.clone());

        let result = companion
            .dispatch(EVENT_WEBVIEW_CLOSED, HostEvent::empty())
            .await;

        assert!(matches!(result, Err(CompanionError::MissingResponse)));
        assert!(runtime.sent().is_empty());
    }

    #[tokio::test]
    async fn rejected_send_is_swallowed_after_one_attempt() {
        let runtime = MockRuntime::failing();
        let companion = Companion::with_lifecycle_handlers(runtime.clone());

        companion
            .dispatch(
                EVENT_WEBVIEW_CLOSED,
                HostEvent::with_response("%7B%22vibrate%22%3Atrue%7D"),
            )
            .await
            .unwrap();

        // exactly one attempt, no retry, handler still succeeds
        assert_eq!(runtime.sent().len(), 1);
    }

    #[tokio::test]
    async fn end_to_end_wire_format() {
        let runtime = MockRuntime::new();
        let companion = Companion::with_lifecycle_handlers(runtime.clone());

        companion
            .dispatch(
                EVENT_WEBVIEW_CLOSED,
                HostEvent::with_response("%7B%22vibrate%22%3Atrue%7D"),
            )
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_string(&runtime.sent()[0]).unwrap(),
            r#"{"KEY_VIBRATE":true}"#
        );
    }
}

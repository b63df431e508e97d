//! yaswf wire types - configuration payload and the app message dictionary
//!
//! The configuration page at goddess-gate.com returns its result as a
//! percent-encoded JSON document in the `webviewclosed` event. This crate
//! decodes that document and translates it into the flat key/value dictionary
//! the watch side persists.

use std::collections::BTreeMap;

/// App message key the watch firmware reads the vibrate setting from
/// (KEY_VIBRATE = 0 in the watchface appinfo).
pub const KEY_VIBRATE: &str = "KEY_VIBRATE";

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("response is not valid percent-encoding: {0}")]
    Percent(#[from] std::string::FromUtf8Error),
    #[error("response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings collected by the remote configuration page.
///
/// The schema is unversioned. Unknown keys are dropped on decode, and a
/// missing `vibrate` stays `None` and goes over the wire as `null` - what the
/// firmware makes of that is its own business.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub vibrate: Option<bool>,
}

impl Configuration {
    /// Translate into the one-key message sent to the watch.
    pub fn to_app_message(&self) -> AppMessage {
        AppMessage::new().with(KEY_VIBRATE, self.vibrate)
    }
}

/// Decode the raw `webviewclosed` response: percent-decode, then parse JSON.
pub fn decode_response(raw: &str) -> Result<Configuration, DecodeError> {
    let json = urlencoding::decode(raw)?;
    Ok(serde_json::from_str(&json)?)
}

/// Flat key/value dictionary sent over the app message channel.
///
/// Serializes transparently as a JSON object, e.g. `{"KEY_VIBRATE":true}`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AppMessage(BTreeMap<String, serde_json::Value>);

impl AppMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entry, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

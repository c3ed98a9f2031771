//! Contracts with the native side: typed commands, subscribed events, the
//! save dialog and blocking alerts.

use crate::bounds::BoundsRect;
use crate::error::{BridgeError, BridgeResult};
use crate::recording::EditorWindow;
use crate::render_config::RenderConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Events pushed by the native side to the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelEvent {
    /// Panel shown again; refetch the list in place.
    ShowCapturesPanel,
    /// Tear everything down and start over.
    RefreshCapturesPanel,
}

#[async_trait]
pub trait NativeBridge: Send + Sync {
    async fn get_prev_recordings(&self) -> BridgeResult<Vec<String>>;

    /// Returns `(duration_seconds, size_megabytes)`.
    async fn get_video_metadata(&self, path: &str) -> BridgeResult<(f64, f64)>;

    async fn copy_rendered_video_to_clipboard(
        &self,
        path: &str,
        config: &RenderConfig,
    ) -> BridgeResult<()>;

    async fn get_rendered_video(&self, path: &str, config: &RenderConfig)
        -> BridgeResult<PathBuf>;

    async fn copy_file_to_path(&self, source: &Path, destination: &Path) -> BridgeResult<()>;

    async fn set_fake_window_bounds(&self, key: &str, bounds: BoundsRect) -> BridgeResult<()>;

    /// Must be a no-op on the native side when `key` is not registered.
    async fn remove_fake_window(&self, key: &str) -> BridgeResult<()>;

    async fn close_previous_recordings_window(&self) -> BridgeResult<()>;

    async fn open_editor(&self, window: &EditorWindow) -> BridgeResult<()>;

    fn subscribe(&self) -> broadcast::Receiver<PanelEvent>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self {
            name: "MP4 Video".to_string(),
            extensions: vec!["mp4".to_string()],
        }
    }
}

#[async_trait]
pub trait SaveDialog: Send + Sync {
    /// `None` when the user dismissed the dialog.
    async fn pick_destination(&self, filter: &FileFilter) -> Option<PathBuf>;
}

#[async_trait]
pub trait Alerts: Send + Sync {
    /// Blocking notification; resolves once the user dismissed it.
    async fn alert(&self, message: &str);
}

/// Everything outside the panel that it talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub bridge: Arc<dyn NativeBridge>,
    pub dialog: Arc<dyn SaveDialog>,
    pub alerts: Arc<dyn Alerts>,
}

/// Decodes a raw `{ "status": "ok" | "error", ... }` command result.
pub fn decode_response<T: DeserializeOwned>(raw: Value) -> BridgeResult<T> {
    let mut map = match raw {
        Value::Object(map) => map,
        other => {
            return Err(BridgeError::UnexpectedResponse(format!(
                "expected an object, got {other}"
            )))
        }
    };

    let status = map
        .get("status")
        .and_then(Value::as_str)
        .map(str::to_owned);
    match status.as_deref() {
        Some("ok") => {
            let data = map.remove("data").unwrap_or(Value::Null);
            serde_json::from_value(data)
                .map_err(|err| BridgeError::UnexpectedResponse(err.to_string()))
        }
        Some("error") => {
            let message = match map.remove("error") {
                Some(Value::String(message)) => message,
                Some(other) => other.to_string(),
                None => "unknown error".to_string(),
            };
            Err(BridgeError::Command(message))
        }
        other => Err(BridgeError::UnexpectedResponse(format!(
            "unknown status {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_ok_payload() {
        let paths: Vec<String> =
            decode_response(json!({ "status": "ok", "data": ["/a.cap", "/b.cap"] }))
                .expect("decode");
        assert_eq!(paths, vec!["/a.cap", "/b.cap"]);
    }

    #[test]
    fn decodes_metadata_tuple() {
        let (duration, size): (f64, f64) =
            decode_response(json!({ "status": "ok", "data": [75.5, 12.25] })).expect("decode");
        assert_eq!(duration, 75.5);
        assert_eq!(size, 12.25);
    }

    #[test]
    fn decodes_unit_ok_without_data() {
        let result: BridgeResult<()> = decode_response(json!({ "status": "ok" }));
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn error_status_becomes_command_error() {
        let result: BridgeResult<()> =
            decode_response(json!({ "status": "error", "error": "render failed" }));
        assert_eq!(result, Err(BridgeError::Command("render failed".to_string())));
    }

    #[test]
    fn unknown_shapes_are_failures() {
        let not_object: BridgeResult<()> = decode_response(json!("ok"));
        assert!(matches!(not_object, Err(BridgeError::UnexpectedResponse(_))));

        let bad_status: BridgeResult<()> = decode_response(json!({ "status": "maybe" }));
        assert!(matches!(bad_status, Err(BridgeError::UnexpectedResponse(_))));

        let wrong_data: BridgeResult<Vec<String>> =
            decode_response(json!({ "status": "ok", "data": 42 }));
        assert!(matches!(wrong_data, Err(BridgeError::UnexpectedResponse(_))));
    }

    #[test]
    fn events_use_native_names() {
        let event: PanelEvent = serde_json::from_value(json!("show-captures-panel")).expect("parse");
        assert_eq!(event, PanelEvent::ShowCapturesPanel);
    }
}

//! `NativeBridge` over a raw command channel that answers with
//! `{ "status", "data" | "error" }` envelopes.

use crate::bounds::BoundsRect;
use crate::bridge::{decode_response, NativeBridge, PanelEvent};
use crate::error::BridgeResult;
use crate::recording::EditorWindow;
use crate::render_config::RenderConfig;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;

/// Sends a named command with JSON arguments and hands back the raw reply.
#[async_trait]
pub trait InvokeTransport: Send + Sync {
    async fn invoke(&self, command: &str, args: Value) -> Value;

    fn subscribe(&self) -> broadcast::Receiver<PanelEvent>;
}

pub struct InvokeBridge<T> {
    transport: T,
}

impl<T: InvokeTransport> InvokeBridge<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    async fn call<R: DeserializeOwned>(&self, command: &str, args: Value) -> BridgeResult<R> {
        let raw = self.transport.invoke(command, args).await;
        decode_response(raw).inspect_err(|err| {
            tracing::debug!(command, "command failed: {err}");
        })
    }
}

#[async_trait]
impl<T: InvokeTransport> NativeBridge for InvokeBridge<T> {
    async fn get_prev_recordings(&self) -> BridgeResult<Vec<String>> {
        self.call("get_prev_recordings", json!({})).await
    }

    async fn get_video_metadata(&self, path: &str) -> BridgeResult<(f64, f64)> {
        self.call(
            "get_video_metadata",
            json!({ "videoId": path, "videoType": null }),
        )
        .await
    }

    async fn copy_rendered_video_to_clipboard(
        &self,
        path: &str,
        config: &RenderConfig,
    ) -> BridgeResult<()> {
        self.call(
            "copy_rendered_video_to_clipboard",
            json!({ "videoId": path, "project": config }),
        )
        .await
    }

    async fn get_rendered_video(
        &self,
        path: &str,
        config: &RenderConfig,
    ) -> BridgeResult<PathBuf> {
        self.call(
            "get_rendered_video",
            json!({ "videoId": path, "project": config }),
        )
        .await
    }

    async fn copy_file_to_path(&self, source: &Path, destination: &Path) -> BridgeResult<()> {
        self.call(
            "copy_file_to_path",
            json!({
                "src": source.to_string_lossy(),
                "dst": destination.to_string_lossy(),
            }),
        )
        .await
    }

    async fn set_fake_window_bounds(&self, key: &str, bounds: BoundsRect) -> BridgeResult<()> {
        self.call(
            "set_fake_window_bounds",
            json!({ "name": key, "bounds": bounds }),
        )
        .await
    }

    async fn remove_fake_window(&self, key: &str) -> BridgeResult<()> {
        self.call("remove_fake_window", json!({ "name": key })).await
    }

    async fn close_previous_recordings_window(&self) -> BridgeResult<()> {
        self.call("close_previous_recordings_window", json!({})).await
    }

    async fn open_editor(&self, window: &EditorWindow) -> BridgeResult<()> {
        self.call("open_editor", json!({ "window": window })).await
    }

    fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.transport.subscribe()
    }
}

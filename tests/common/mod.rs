#![allow(dead_code)]

use recordings_shelf::{
    Alerts, BoundsRect, BridgeError, BridgeResult, Collaborators, EditorWindow, FileFilter,
    NativeBridge, PanelEvent, RenderConfig, SaveDialog,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Notify};

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCall {
    GetPrevRecordings,
    GetMetadata(String),
    CopyToClipboard(String),
    GetRenderedVideo(String),
    CopyFile(PathBuf, PathBuf),
    SetBounds(String, BoundsRect),
    RemoveFakeWindow(String),
    CloseWindow,
    OpenEditor(String),
}

pub struct MockBridge {
    pub calls: Mutex<Vec<BridgeCall>>,
    pub recordings: Mutex<BridgeResult<Vec<String>>>,
    pub metadata: Mutex<HashMap<String, (f64, f64)>>,
    pub clipboard: Mutex<BridgeResult<()>>,
    pub rendered: Mutex<BridgeResult<PathBuf>>,
    pub copy_file: Mutex<BridgeResult<()>>,
    pub bounds: Mutex<BridgeResult<()>>,
    /// How long a fake-window removal takes to answer.
    pub remove_delay: Mutex<Option<Duration>>,
    /// When set, render commands wait for a permit before answering.
    pub render_gate: Mutex<Option<Arc<Notify>>>,
    pub events: broadcast::Sender<PanelEvent>,
}

impl Default for MockBridge {
    fn default() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            calls: Mutex::new(Vec::new()),
            recordings: Mutex::new(Ok(Vec::new())),
            metadata: Mutex::new(HashMap::new()),
            clipboard: Mutex::new(Ok(())),
            rendered: Mutex::new(Ok(PathBuf::from("/tmp/rendered/output.mp4"))),
            copy_file: Mutex::new(Ok(())),
            bounds: Mutex::new(Ok(())),
            remove_delay: Mutex::new(None),
            render_gate: Mutex::new(None),
            events,
        }
    }
}

impl MockBridge {
    pub fn with_recordings(paths: &[&str]) -> Self {
        let bridge = Self::default();
        *bridge.recordings.lock() = Ok(paths.iter().map(|p| p.to_string()).collect());
        bridge
    }

    pub fn gate_renders(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.render_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn slow_removals(&self, delay: Duration) {
        *self.remove_delay.lock() = Some(delay);
    }

    pub fn removals_of(&self, key: &str) -> usize {
        self.count(|c| *c == BridgeCall::RemoveFakeWindow(key.to_string()))
    }

    pub fn count(&self, pred: impl Fn(&BridgeCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: BridgeCall) {
        self.calls.lock().push(call);
    }

    async fn wait_gate(&self) {
        let gate = self.render_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl NativeBridge for MockBridge {
    async fn get_prev_recordings(&self) -> BridgeResult<Vec<String>> {
        self.record(BridgeCall::GetPrevRecordings);
        self.recordings.lock().clone()
    }

    async fn get_video_metadata(&self, path: &str) -> BridgeResult<(f64, f64)> {
        self.record(BridgeCall::GetMetadata(path.to_string()));
        self.metadata
            .lock()
            .get(path)
            .copied()
            .ok_or_else(|| BridgeError::Command("no metadata".to_string()))
    }

    async fn copy_rendered_video_to_clipboard(
        &self,
        path: &str,
        _config: &RenderConfig,
    ) -> BridgeResult<()> {
        self.record(BridgeCall::CopyToClipboard(path.to_string()));
        self.wait_gate().await;
        self.clipboard.lock().clone()
    }

    async fn get_rendered_video(
        &self,
        path: &str,
        _config: &RenderConfig,
    ) -> BridgeResult<PathBuf> {
        self.record(BridgeCall::GetRenderedVideo(path.to_string()));
        self.wait_gate().await;
        self.rendered.lock().clone()
    }

    async fn copy_file_to_path(&self, source: &Path, destination: &Path) -> BridgeResult<()> {
        self.record(BridgeCall::CopyFile(
            source.to_path_buf(),
            destination.to_path_buf(),
        ));
        self.copy_file.lock().clone()
    }

    async fn set_fake_window_bounds(&self, key: &str, bounds: BoundsRect) -> BridgeResult<()> {
        self.record(BridgeCall::SetBounds(key.to_string(), bounds));
        self.bounds.lock().clone()
    }

    async fn remove_fake_window(&self, key: &str) -> BridgeResult<()> {
        self.record(BridgeCall::RemoveFakeWindow(key.to_string()));
        let delay = *self.remove_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn close_previous_recordings_window(&self) -> BridgeResult<()> {
        self.record(BridgeCall::CloseWindow);
        Ok(())
    }

    async fn open_editor(&self, window: &EditorWindow) -> BridgeResult<()> {
        self.record(BridgeCall::OpenEditor(window.label.clone()));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<PanelEvent> {
        self.events.subscribe()
    }
}

#[derive(Default)]
pub struct MockDialog {
    pub destination: Mutex<Option<PathBuf>>,
    pub prompts: Mutex<usize>,
}

impl MockDialog {
    pub fn choosing(path: &str) -> Self {
        let dialog = Self::default();
        *dialog.destination.lock() = Some(PathBuf::from(path));
        dialog
    }
}

#[async_trait]
impl SaveDialog for MockDialog {
    async fn pick_destination(&self, _filter: &FileFilter) -> Option<PathBuf> {
        *self.prompts.lock() += 1;
        self.destination.lock().clone()
    }
}

#[derive(Default)]
pub struct MockAlerts {
    pub shown: Mutex<Vec<String>>,
}

#[async_trait]
impl Alerts for MockAlerts {
    async fn alert(&self, message: &str) {
        self.shown.lock().push(message.to_string());
    }
}

pub struct Harness {
    pub bridge: Arc<MockBridge>,
    pub dialog: Arc<MockDialog>,
    pub alerts: Arc<MockAlerts>,
}

impl Harness {
    pub fn new(bridge: MockBridge, dialog: MockDialog) -> Self {
        Self {
            bridge: Arc::new(bridge),
            dialog: Arc::new(dialog),
            alerts: Arc::new(MockAlerts::default()),
        }
    }

    pub fn host(&self) -> Collaborators {
        Collaborators {
            bridge: self.bridge.clone(),
            dialog: self.dialog.clone(),
            alerts: self.alerts.clone(),
        }
    }
}

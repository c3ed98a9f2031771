use crate::bounds::{BoundsRect, BoundsReporter};
use crate::bridge::Collaborators;
use crate::config::PanelConfig;
use crate::error::{BridgeResult, OperationError, TransitionError};
use crate::exit::{ExitAnimator, ThumbnailState};
use crate::metadata::{Metadata, MetadataFetcher};
use crate::operation::OperationState;
use crate::recording::{EditorWindow, Recording};
use crate::render::{FlowOutcome, RenderPipelineClient};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// One recording's lifecycle in the panel: metadata, fake-window bounds,
/// copy/save flows and the exit transition.
pub struct ThumbnailItem {
    recording: Recording,
    host: Collaborators,
    exit: Mutex<ExitAnimator>,
    metadata: watch::Sender<Metadata>,
    image_exists: AtomicBool,
    unmounted: AtomicBool,
    bounds: BoundsReporter,
    render: RenderPipelineClient,
}

impl ThumbnailItem {
    /// Creates the item and starts its one-shot metadata fetch.
    pub fn mount(recording: Recording, host: Collaborators, config: Arc<PanelConfig>) -> Arc<Self> {
        let (metadata, _) = watch::channel(Metadata::default());
        let item = Arc::new(Self {
            bounds: BoundsReporter::new(recording.key(), host.bridge.clone()),
            render: RenderPipelineClient::new(recording.clone(), host.clone(), config),
            recording,
            host,
            exit: Mutex::new(ExitAnimator::new()),
            metadata,
            image_exists: AtomicBool::new(true),
            unmounted: AtomicBool::new(false),
        });

        let fetcher = MetadataFetcher::new(item.host.bridge.clone());
        let recording = item.recording.clone();
        let weak = Arc::downgrade(&item);
        tokio::spawn(async move {
            let Some(metadata) = fetcher.fetch(&recording).await else {
                return;
            };
            match weak.upgrade() {
                Some(item) if !item.is_unmounted() => {
                    item.metadata.send_replace(metadata);
                }
                _ => tracing::debug!(recording = recording.path(), "dropping late metadata"),
            }
        });

        item
    }

    pub fn recording(&self) -> &Recording {
        &self.recording
    }

    pub fn key(&self) -> &str {
        self.recording.key()
    }

    pub fn state(&self) -> ThumbnailState {
        self.exit.lock().current_state()
    }

    pub fn is_present(&self) -> bool {
        self.exit.lock().is_present()
    }

    pub fn metadata(&self) -> Metadata {
        *self.metadata.borrow()
    }

    pub fn subscribe_metadata(&self) -> watch::Receiver<Metadata> {
        self.metadata.subscribe()
    }

    pub fn copy_state(&self) -> OperationState {
        self.render.copy_state().state()
    }

    pub fn save_state(&self) -> OperationState {
        self.render.save_state().state()
    }

    pub fn subscribe_copy(&self) -> watch::Receiver<OperationState> {
        self.render.copy_state().subscribe()
    }

    pub fn subscribe_save(&self) -> watch::Receiver<OperationState> {
        self.render.save_state().subscribe()
    }

    fn is_unmounted(&self) -> bool {
        self.unmounted.load(Ordering::SeqCst)
    }

    /// Mounted -> Exiting. The presentation layer starts the exit transition.
    pub fn close(&self) -> Result<(), TransitionError> {
        self.exit.lock().close()?;
        tracing::debug!(recording = self.key(), "thumbnail exiting");
        Ok(())
    }

    /// Exiting -> Removed, once the exit transition has ended. Deregisters
    /// the fake window.
    pub async fn finish_exit(&self) -> Result<(), TransitionError> {
        self.exit.lock().finish()?;
        tracing::debug!(recording = self.key(), "thumbnail removed");
        self.unmount().await;
        Ok(())
    }

    /// Drops the item from the native side. Safe to call more than once.
    pub async fn unmount(&self) {
        self.unmounted.store(true, Ordering::SeqCst);
        self.render.unmount();
        self.bounds.release().await;
    }

    /// Layout observer hook; forwards the measured rectangle while the
    /// thumbnail is still on screen.
    pub async fn on_layout(&self, rect: BoundsRect) -> bool {
        if self.is_unmounted() || !self.is_present() {
            return false;
        }
        self.bounds.report(rect).await
    }

    pub async fn copy_to_clipboard(&self) -> Result<FlowOutcome, OperationError> {
        self.render.copy_to_clipboard().await
    }

    pub async fn save_to_file(&self) -> Result<FlowOutcome, OperationError> {
        self.render.save_to_file().await
    }

    pub async fn edit(&self) -> BridgeResult<()> {
        let window = EditorWindow::for_recording(&self.recording);
        let result = self.host.bridge.open_editor(&window).await;
        if let Err(ref err) = result {
            tracing::error!(recording = self.key(), label = %window.label, "failed to open editor: {err}");
        }
        result
    }

    /// Preview screenshot could not be loaded; show the placeholder instead.
    pub fn image_failed(&self) {
        self.image_exists.store(false, Ordering::SeqCst);
    }

    pub fn view(&self, close_allowed: bool) -> ThumbnailView {
        ThumbnailView {
            key: self.key().to_string(),
            state: self.state(),
            screenshot: self
                .image_exists
                .load(Ordering::SeqCst)
                .then(|| self.recording.screenshot_path()),
            metadata: self.metadata(),
            copy: self.copy_state(),
            save: self.save_state(),
            close_allowed,
        }
    }
}

/// Snapshot of a thumbnail for the presentation layer. Everything else is
/// derived on read.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailView {
    pub key: String,
    pub state: ThumbnailState,
    /// `None` renders the placeholder.
    pub screenshot: Option<PathBuf>,
    pub metadata: Metadata,
    pub copy: OperationState,
    pub save: OperationState,
    close_allowed: bool,
}

impl ThumbnailView {
    pub fn is_loading(&self) -> bool {
        self.copy.is_loading() || self.save.is_loading()
    }

    pub fn duration_label(&self) -> String {
        self.metadata.duration_label()
    }

    pub fn size_label(&self) -> String {
        self.metadata.size_label()
    }

    pub fn close_enabled(&self) -> bool {
        self.close_allowed && self.state == ThumbnailState::Mounted
    }

    pub fn copy_enabled(&self) -> bool {
        !self.save.is_loading()
    }

    pub fn save_enabled(&self) -> bool {
        !self.copy.is_loading()
    }

    pub fn copy_tooltip(&self) -> &'static str {
        if self.copy.is_loading() {
            "Copying to Clipboard"
        } else {
            "Copy to Clipboard"
        }
    }

    pub fn save_label(&self) -> &'static str {
        if self.save.is_loading() {
            "Saving..."
        } else if self.save.is_success() {
            "Saved!"
        } else {
            "Save"
        }
    }
}

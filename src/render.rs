use crate::bridge::Collaborators;
use crate::config::PanelConfig;
use crate::error::{BridgeError, OperationError};
use crate::operation::{OperationKind, OperationLock, OperationSlot, OperationState};
use crate::recording::Recording;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// How a copy or save flow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Copied,
    Saved(PathBuf),
    /// The save dialog was dismissed.
    Cancelled,
    /// Alert shown, state reset.
    Failed(String),
    /// The thumbnail went away while the flow was in flight.
    Discarded,
}

/// Copy-to-clipboard and save-to-file flows for one recording.
pub struct RenderPipelineClient {
    recording: Recording,
    host: Collaborators,
    config: Arc<PanelConfig>,
    copy: Arc<OperationSlot>,
    save: Arc<OperationSlot>,
    lock: OperationLock,
    unmounted: AtomicBool,
}

impl RenderPipelineClient {
    pub fn new(recording: Recording, host: Collaborators, config: Arc<PanelConfig>) -> Self {
        Self {
            recording,
            host,
            config,
            copy: Arc::new(OperationSlot::new()),
            save: Arc::new(OperationSlot::new()),
            lock: OperationLock::default(),
            unmounted: AtomicBool::new(false),
        }
    }

    pub fn copy_state(&self) -> &OperationSlot {
        &self.copy
    }

    pub fn save_state(&self) -> &OperationSlot {
        &self.save
    }

    pub fn running(&self) -> Option<OperationKind> {
        self.lock.running()
    }

    /// Results arriving after this are dropped.
    pub fn unmount(&self) {
        self.unmounted.store(true, Ordering::SeqCst);
    }

    fn is_unmounted(&self) -> bool {
        self.unmounted.load(Ordering::SeqCst)
    }

    pub async fn copy_to_clipboard(&self) -> Result<FlowOutcome, OperationError> {
        if self.is_unmounted() {
            return Err(OperationError::Unmounted);
        }
        let permit = self.lock.try_acquire(OperationKind::Copy)?;
        self.copy.set(OperationState::Loading);

        let result = self
            .host
            .bridge
            .copy_rendered_video_to_clipboard(self.recording.path(), &self.config.render)
            .await;

        if self.is_unmounted() {
            tracing::debug!(recording = self.recording.path(), "dropping late copy result");
            return Ok(FlowOutcome::Discarded);
        }

        match result {
            Ok(()) => {
                tracing::info!(recording = self.recording.path(), "copied to clipboard");
                self.succeed(&self.copy);
                Ok(FlowOutcome::Copied)
            }
            Err(err) => {
                drop(permit);
                let message = self.config.copy_failed_message.clone();
                Ok(self.fail(&self.copy, message, err).await)
            }
        }
    }

    pub async fn save_to_file(&self) -> Result<FlowOutcome, OperationError> {
        if self.is_unmounted() {
            return Err(OperationError::Unmounted);
        }
        let permit = self.lock.try_acquire(OperationKind::Save)?;
        self.save.set(OperationState::Loading);

        let rendered = self
            .host
            .bridge
            .get_rendered_video(self.recording.path(), &self.config.render)
            .await;

        if self.is_unmounted() {
            tracing::debug!(recording = self.recording.path(), "dropping late render result");
            return Ok(FlowOutcome::Discarded);
        }

        let rendered = match rendered {
            Ok(path) => path,
            Err(err) => {
                drop(permit);
                let message = self.config.save_failed_message.clone();
                return Ok(self.fail(&self.save, message, err).await);
            }
        };

        let Some(destination) = self
            .host
            .dialog
            .pick_destination(&self.config.export_filter)
            .await
        else {
            tracing::debug!(recording = self.recording.path(), "save dialog dismissed");
            if !self.is_unmounted() {
                self.save.set(OperationState::Idle);
            }
            return Ok(FlowOutcome::Cancelled);
        };

        if self.is_unmounted() {
            return Ok(FlowOutcome::Discarded);
        }

        let copied = self
            .host
            .bridge
            .copy_file_to_path(&rendered, &destination)
            .await;

        if self.is_unmounted() {
            tracing::debug!(recording = self.recording.path(), "dropping late save result");
            return Ok(FlowOutcome::Discarded);
        }

        match copied {
            Ok(()) => {
                tracing::info!(
                    recording = self.recording.path(),
                    destination = %destination.display(),
                    "saved recording"
                );
                self.succeed(&self.save);
                Ok(FlowOutcome::Saved(destination))
            }
            Err(err) => {
                drop(permit);
                let message = self.config.save_failed_message.clone();
                Ok(self.fail(&self.save, message, err).await)
            }
        }
    }

    fn succeed(&self, slot: &Arc<OperationSlot>) {
        let generation = slot.set(OperationState::Success);
        let slot = Arc::downgrade(slot);
        let window = self.config.success_display();
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if let Some(slot) = slot.upgrade() {
                slot.reset_if_current(generation);
            }
        });
    }

    async fn fail(&self, slot: &OperationSlot, message: String, err: BridgeError) -> FlowOutcome {
        tracing::error!(recording = self.recording.path(), "{message}: {err}");
        let generation = slot.set(OperationState::Error(err.to_string()));
        self.host.alerts.alert(&message).await;
        slot.reset_if_current(generation);
        FlowOutcome::Failed(message)
    }
}

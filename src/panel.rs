use crate::bounds::BoundsRect;
use crate::bridge::{Collaborators, PanelEvent};
use crate::config::PanelConfig;
use crate::error::{BridgeResult, PanelError};
use crate::recording::{Recording, RecordingList};
use crate::render::FlowOutcome;
use crate::thumbnail::{ThumbnailItem, ThumbnailView};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

struct PanelState {
    session: Uuid,
    recordings: Option<RecordingList>,
    /// Display order. Removed items stay here, hidden.
    items: Vec<Arc<ThumbnailItem>>,
    removed: HashSet<String>,
    window_closed: bool,
    scrolled_to_top: bool,
}

impl PanelState {
    fn new() -> Self {
        Self {
            session: Uuid::new_v4(),
            recordings: None,
            items: Vec::new(),
            removed: HashSet::new(),
            window_closed: false,
            scrolled_to_top: true,
        }
    }

    fn item(&self, key: &str) -> Option<Arc<ThumbnailItem>> {
        self.items.iter().find(|item| item.key() == key).cloned()
    }

    /// Every listed recording has finished its exit.
    fn all_removed(&self) -> bool {
        match &self.recordings {
            Some(list) if !list.is_empty() => list.iter().all(|r| self.removed.contains(r.key())),
            _ => false,
        }
    }
}

/// Event listener task. Dropping `stop` ends it between events, never in the
/// middle of handling one.
struct Listener {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Owns the recording list, the removal bookkeeping and the one-time
/// host-window close.
pub struct PanelController {
    host: Collaborators,
    config: Arc<PanelConfig>,
    state: Mutex<PanelState>,
    subscription: Mutex<Option<Listener>>,
}

impl PanelController {
    pub fn new(host: Collaborators, config: PanelConfig) -> Arc<Self> {
        Arc::new(Self {
            host,
            config: Arc::new(config),
            state: Mutex::new(PanelState::new()),
            subscription: Mutex::new(None),
        })
    }

    /// Mounts the panel: subscribes to native events and loads the list.
    pub async fn open(host: Collaborators, config: PanelConfig) -> Arc<Self> {
        let panel = Self::new(host, config);
        panel.start();
        panel.load().await;
        panel
    }

    pub fn session_id(&self) -> Uuid {
        self.state.lock().session
    }

    /// Fetches the recording list and reconciles thumbnails against it.
    /// Existing thumbnails keep their state; vanished ones are unmounted.
    pub async fn load(&self) {
        let session = self.session_id();
        let paths = match self.host.bridge.get_prev_recordings().await {
            Ok(paths) => paths,
            Err(err) => {
                tracing::warn!(%session, "failed to load recordings: {err}");
                return;
            }
        };

        let list = RecordingList::from_discovery_order(paths);
        let vanished = {
            let mut state = self.state.lock();
            if state.session != session {
                tracing::debug!(%session, "dropping list fetched for an old session");
                return;
            }

            let mut previous = std::mem::take(&mut state.items);
            let mut items = Vec::with_capacity(list.len());
            let mut kept = HashSet::new();
            for recording in list.iter() {
                let existing = previous
                    .iter()
                    .position(|item| item.recording() == recording);
                let item = match existing {
                    Some(idx) => {
                        kept.insert(recording.key().to_string());
                        previous.swap_remove(idx)
                    }
                    None => self.mount(recording),
                };
                items.push(item);
            }
            // A recording that comes back is a fresh thumbnail.
            state.removed.retain(|key| kept.contains(key));

            tracing::info!(%session, count = list.len(), "recordings loaded");
            state.items = items;
            state.recordings = Some(list);
            previous
        };

        for item in vanished {
            item.unmount().await;
        }
    }

    fn mount(&self, recording: &Recording) -> Arc<ThumbnailItem> {
        ThumbnailItem::mount(recording.clone(), self.host.clone(), self.config.clone())
    }

    /// "Show panel" event: refetch in place.
    pub async fn on_external_refresh(&self) {
        self.load().await;
    }

    /// "Refresh panel" event: tear every thumbnail down and start a fresh
    /// session.
    pub async fn on_external_force_reload(&self) {
        let previous = {
            let mut state = self.state.lock();
            std::mem::replace(&mut *state, PanelState::new())
        };
        tracing::info!(old = %previous.session, "reloading panel");

        for item in previous.items {
            item.unmount().await;
        }
        self.load().await;
    }

    /// Subscribes to native panel events. Calling it again while subscribed
    /// does nothing.
    pub fn start(self: &Arc<Self>) {
        let mut subscription = self.subscription.lock();
        if subscription.is_some() {
            return;
        }

        let mut events = self.host.bridge.subscribe();
        let (stop, mut stopped) = oneshot::channel::<()>();
        let panel: Weak<Self> = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            loop {
                let received = tokio::select! {
                    biased;
                    _ = &mut stopped => break,
                    received = events.recv() => received,
                };
                let event = match received {
                    Ok(event) => event,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "panel event listener lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => break,
                };
                let Some(panel) = panel.upgrade() else {
                    break;
                };
                tracing::debug!(?event, "panel event");
                match event {
                    PanelEvent::ShowCapturesPanel => panel.on_external_refresh().await,
                    PanelEvent::RefreshCapturesPanel => panel.on_external_force_reload().await,
                }
            }
        });
        *subscription = Some(Listener { stop, handle });
    }

    /// Stops listening. An event already being handled runs to completion.
    pub fn stop(&self) {
        self.subscription.lock().take();
    }

    pub fn is_listening(&self) -> bool {
        self.subscription
            .lock()
            .as_ref()
            .is_some_and(|listener| !listener.stop.is_closed() && !listener.handle.is_finished())
    }

    /// Unmounts the panel: waits for the listener to wind down, then
    /// deregisters every fake window.
    pub async fn shutdown(&self) {
        let listener = self.subscription.lock().take();
        if let Some(Listener { stop, handle }) = listener {
            drop(stop);
            if let Err(err) = handle.await {
                tracing::warn!("panel event listener ended abnormally: {err}");
            }
        }

        let items = std::mem::take(&mut self.state.lock().items);
        for item in items {
            item.unmount().await;
        }
    }

    pub fn item(&self, key: &str) -> Result<Arc<ThumbnailItem>, PanelError> {
        self.state
            .lock()
            .item(key)
            .ok_or_else(|| PanelError::UnknownRecording(key.to_string()))
    }

    pub fn recordings(&self) -> Option<RecordingList> {
        self.state.lock().recordings.clone()
    }

    /// Thumbnails still present, in display order.
    pub fn visible(&self) -> Vec<ThumbnailView> {
        let state = self.state.lock();
        let close_allowed = !state.window_closed;
        state
            .items
            .iter()
            .filter(|item| item.is_present())
            .map(|item| item.view(close_allowed))
            .collect()
    }

    pub fn removed_count(&self) -> usize {
        self.state.lock().removed.len()
    }

    pub fn window_closed(&self) -> bool {
        self.state.lock().window_closed
    }

    pub fn on_scroll(&self, scroll_top: f64) {
        self.state.lock().scrolled_to_top = scroll_top == 0.0;
    }

    pub fn is_scrolled_to_top(&self) -> bool {
        self.state.lock().scrolled_to_top
    }

    /// Close action on a thumbnail.
    pub fn close(&self, key: &str) -> Result<(), PanelError> {
        let item = {
            let state = self.state.lock();
            if state.window_closed {
                return Err(PanelError::CloseDisabled);
            }
            state.item(key)
        };
        let item = item.ok_or_else(|| PanelError::UnknownRecording(key.to_string()))?;
        item.close()?;
        Ok(())
    }

    /// The exit transition of `key` has ended. Returns whether this removal
    /// closed the host window.
    pub async fn exit_finished(&self, key: &str) -> Result<bool, PanelError> {
        let item = self.item(key)?;
        item.finish_exit().await?;
        Ok(self.count_removal(key, Some(&item)).await)
    }

    /// Counts a removal and closes the host window once every listed
    /// recording is accounted for. Repeated calls for one key count once.
    pub async fn on_item_removed(&self, key: &str) -> bool {
        self.count_removal(key, None).await
    }

    /// `finished` is the thumbnail whose exit ended; the removal is dropped
    /// if the panel no longer shows that exact thumbnail (reload, refresh).
    async fn count_removal(&self, key: &str, finished: Option<&Arc<ThumbnailItem>>) -> bool {
        let close = {
            let mut state = self.state.lock();
            if let Some(finished) = finished {
                let current = state.item(key);
                if !current.is_some_and(|item| Arc::ptr_eq(&item, finished)) {
                    tracing::debug!(recording = key, "dropping removal from a stale thumbnail");
                    return false;
                }
            }
            if !state.removed.insert(key.to_string()) {
                return false;
            }
            let close = !state.window_closed && state.all_removed();
            if close {
                state.window_closed = true;
            }
            tracing::debug!(
                session = %state.session,
                removed = state.removed.len(),
                close,
                "thumbnail removed"
            );
            close
        };

        if close {
            tracing::info!("all recordings dismissed, closing window");
            if let Err(err) = self.host.bridge.close_previous_recordings_window().await {
                tracing::error!("failed to close previous recordings window: {err}");
            }
        }
        close
    }

    pub async fn layout_changed(&self, key: &str, rect: BoundsRect) -> Result<bool, PanelError> {
        Ok(self.item(key)?.on_layout(rect).await)
    }

    pub async fn copy_to_clipboard(&self, key: &str) -> Result<FlowOutcome, PanelError> {
        Ok(self.item(key)?.copy_to_clipboard().await?)
    }

    pub async fn save_to_file(&self, key: &str) -> Result<FlowOutcome, PanelError> {
        Ok(self.item(key)?.save_to_file().await?)
    }

    pub async fn edit(&self, key: &str) -> Result<BridgeResult<()>, PanelError> {
        Ok(self.item(key)?.edit().await)
    }
}

impl Drop for PanelController {
    fn drop(&mut self) {
        self.subscription.get_mut().take();

        let items = std::mem::take(&mut self.state.get_mut().items);
        if items.is_empty() {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    for item in items {
                        item.unmount().await;
                    }
                });
            }
            Err(_) => tracing::warn!(
                count = items.len(),
                "panel dropped outside a runtime, fake windows left registered"
            ),
        }
    }
}

use crate::bridge::NativeBridge;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// On-screen rectangle relative to the host window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundsRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundsRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Default)]
struct ReporterState {
    last: Option<BoundsRect>,
    released: bool,
}

/// Mirrors a thumbnail's rectangle into a native fake window so the overlay
/// only intercepts clicks over live thumbnails.
///
/// Calls are serialized per reporter: a deregistration never overtakes a
/// bounds update that is still in flight.
pub struct BoundsReporter {
    key: String,
    bridge: Arc<dyn NativeBridge>,
    state: Mutex<ReporterState>,
}

impl BoundsReporter {
    pub fn new(key: impl Into<String>, bridge: Arc<dyn NativeBridge>) -> Self {
        Self {
            key: key.into(),
            bridge,
            state: Mutex::new(ReporterState::default()),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Pushes `rect` to the native side. Returns `false` when nothing was
    /// accepted (unchanged rectangle, already released, or the call failed).
    /// A rejected rectangle is sent again on the next report.
    pub async fn report(&self, rect: BoundsRect) -> bool {
        let mut state = self.state.lock().await;
        if state.released || state.last == Some(rect) {
            return false;
        }

        match self.bridge.set_fake_window_bounds(&self.key, rect).await {
            Ok(()) => {
                state.last = Some(rect);
                true
            }
            Err(err) => {
                tracing::warn!(key = %self.key, "failed to set fake window bounds: {err}");
                false
            }
        }
    }

    /// Removes the fake window. Only the first completed call reaches the
    /// native side; a release cancelled mid-call is retried by the next one.
    pub async fn release(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.released {
            return false;
        }

        if let Err(err) = self.bridge.remove_fake_window(&self.key).await {
            tracing::warn!(key = %self.key, "failed to remove fake window: {err}");
        }
        state.released = true;
        true
    }

    pub async fn is_released(&self) -> bool {
        self.state.lock().await.released
    }
}

//! Recordings shelf: the overlay panel that lists recent recordings as
//! thumbnails and keeps the native click-through regions in sync with them.

pub mod bounds;
pub mod bridge;
pub mod config;
pub mod error;
pub mod exit;
pub mod invoke;
pub mod logging;
pub mod metadata;
pub mod operation;
pub mod panel;
pub mod recording;
pub mod render;
pub mod render_config;
pub mod thumbnail;

pub use bounds::{BoundsRect, BoundsReporter};
pub use bridge::{decode_response, Alerts, Collaborators, FileFilter, NativeBridge, PanelEvent, SaveDialog};
pub use config::PanelConfig;
pub use error::{BridgeError, BridgeResult, OperationError, PanelError, TransitionError};
pub use exit::{ExitAnimator, ThumbnailState};
pub use invoke::{InvokeBridge, InvokeTransport};
pub use metadata::{Metadata, MetadataFetcher};
pub use operation::{OperationKind, OperationState};
pub use panel::PanelController;
pub use recording::{EditorWindow, Recording, RecordingList};
pub use render::{FlowOutcome, RenderPipelineClient};
pub use render_config::RenderConfig;
pub use thumbnail::{ThumbnailItem, ThumbnailView};

/// Loads the on-disk config, sets up logging and opens the panel.
pub async fn run(host: Collaborators) -> std::sync::Arc<PanelController> {
    logging::init();
    let config = config::load();
    PanelController::open(host, config).await
}

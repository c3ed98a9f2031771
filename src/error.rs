use crate::exit::{ExitAction, ThumbnailState};
use crate::operation::OperationKind;
use thiserror::Error;

/// Failure of a single native-bridge command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The native side answered with an explicit error result.
    #[error("native command failed: {0}")]
    Command(String),
    /// The answer could not be understood as a success/failure result.
    #[error("unexpected native response: {0}")]
    UnexpectedResponse(String),
}

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {action:?} a thumbnail that is {from:?}")]
    InvalidTransition {
        from: ThumbnailState,
        action: ExitAction,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("{0:?} is already running for this recording")]
    Busy(OperationKind),
    #[error("thumbnail is no longer mounted")]
    Unmounted,
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    #[error("no thumbnail for {0}")]
    UnknownRecording(String),
    #[error("panel is already closing")]
    CloseDisabled,
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Operation(#[from] OperationError),
}

use crate::error::TransitionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailState {
    Mounted,
    Exiting,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitAction {
    Close,
    FinishExit,
}

/// Gates removal of a thumbnail behind its exit transition.
///
/// The presentation layer plays the fade/slide and reports completion via
/// [`ExitAnimator::finish`]; until then the thumbnail stays present.
#[derive(Debug)]
pub struct ExitAnimator {
    state: ThumbnailState,
}

impl ExitAnimator {
    pub fn new() -> Self {
        Self {
            state: ThumbnailState::Mounted,
        }
    }

    pub fn current_state(&self) -> ThumbnailState {
        self.state
    }

    /// Still part of the rendered collection (and of the click-through mask).
    pub fn is_present(&self) -> bool {
        self.state != ThumbnailState::Removed
    }

    fn transition(
        &mut self,
        allowed: &[ThumbnailState],
        to: ThumbnailState,
        action: ExitAction,
    ) -> Result<(), TransitionError> {
        if allowed.contains(&self.state) {
            self.state = to;
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }

    pub fn close(&mut self) -> Result<(), TransitionError> {
        self.transition(
            &[ThumbnailState::Mounted],
            ThumbnailState::Exiting,
            ExitAction::Close,
        )
    }

    pub fn finish(&mut self) -> Result<(), TransitionError> {
        self.transition(
            &[ThumbnailState::Exiting],
            ThumbnailState::Removed,
            ExitAction::FinishExit,
        )
    }
}

impl Default for ExitAnimator {
    fn default() -> Self {
        Self::new()
    }
}

use crate::error::OperationError;
use parking_lot::Mutex;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationState {
    Idle,
    Loading,
    Success,
    Error(String),
}

impl OperationState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Copy,
    Save,
}

/// Observable state of one user-triggered operation.
///
/// Every write bumps a generation so a delayed reset only lands if nothing
/// else happened to the slot in the meantime.
pub struct OperationSlot {
    tx: watch::Sender<OperationState>,
    generation: Mutex<u64>,
}

impl OperationSlot {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(OperationState::Idle);
        Self {
            tx,
            generation: Mutex::new(0),
        }
    }

    pub fn state(&self) -> OperationState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationState> {
        self.tx.subscribe()
    }

    /// Returns the generation of the write.
    pub fn set(&self, state: OperationState) -> u64 {
        let mut generation = self.generation.lock();
        *generation += 1;
        self.tx.send_replace(state);
        *generation
    }

    /// Back to `Idle`, but only if `generation` is still the latest write.
    pub fn reset_if_current(&self, generation: u64) -> bool {
        let mut current = self.generation.lock();
        if *current != generation {
            return false;
        }
        *current += 1;
        self.tx.send_replace(OperationState::Idle);
        true
    }
}

impl Default for OperationSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-thumbnail exclusivity between copy and save.
#[derive(Debug, Default)]
pub struct OperationLock {
    running: Mutex<Option<OperationKind>>,
}

impl OperationLock {
    pub fn try_acquire(&self, kind: OperationKind) -> Result<OperationPermit<'_>, OperationError> {
        let mut running = self.running.lock();
        if let Some(current) = *running {
            return Err(OperationError::Busy(current));
        }
        *running = Some(kind);
        Ok(OperationPermit { lock: self })
    }

    pub fn running(&self) -> Option<OperationKind> {
        *self.running.lock()
    }
}

/// Held for the duration of a flow; releases the lock on drop.
pub struct OperationPermit<'a> {
    lock: &'a OperationLock,
}

impl Drop for OperationPermit<'_> {
    fn drop(&mut self) {
        *self.lock.running.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_rejects_second_operation() {
        let lock = OperationLock::default();
        let permit = lock.try_acquire(OperationKind::Copy).expect("acquire copy");

        assert_eq!(
            lock.try_acquire(OperationKind::Save).err(),
            Some(OperationError::Busy(OperationKind::Copy))
        );
        assert_eq!(lock.running(), Some(OperationKind::Copy));

        drop(permit);
        assert_eq!(lock.running(), None);
        assert!(lock.try_acquire(OperationKind::Save).is_ok());
    }

    #[test]
    fn stale_reset_is_ignored() {
        let slot = OperationSlot::new();
        let success = slot.set(OperationState::Success);
        slot.set(OperationState::Loading);

        assert!(!slot.reset_if_current(success));
        assert_eq!(slot.state(), OperationState::Loading);
    }

    #[test]
    fn current_reset_returns_to_idle() {
        let slot = OperationSlot::new();
        let mut rx = slot.subscribe();
        let success = slot.set(OperationState::Success);

        assert!(slot.reset_if_current(success));
        assert_eq!(slot.state(), OperationState::Idle);
        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(*rx.borrow_and_update(), OperationState::Idle);
    }
}

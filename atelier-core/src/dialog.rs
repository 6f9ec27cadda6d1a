//! Dialog lifecycle controller
//!
//! Manages the open/closed state of a create-or-edit dialog and the entity
//! being edited. Closing can defer the clearing of the selection so an exit
//! animation can still read it, but a re-open always cancels the pending
//! clear: the UI can never observe a dialog bound to stale entity data.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default delay before a deferred close clears the selection
pub const DEFAULT_CLEAR_DELAY: Duration = Duration::from_millis(200);

/// How a dialog close treats the selected entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseMode {
    /// Close and clear the selection synchronously
    Immediate,
    /// Close now, clear the selection after the clear delay so the exit
    /// animation can still read it
    Deferred,
}

/// Observable dialog state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState<T> {
    ClosedEmpty,
    OpenCreate,
    OpenEdit(T),
    /// Closed, but the selection is still readable during the clear delay
    Closing(T),
}

struct DialogInner<T> {
    open: bool,
    selected: Option<T>,
    /// Bumped on every transition; a deferred-clear timer only acts if its
    /// captured epoch is still current
    epoch: u64,
    pending_clear: Option<JoinHandle<()>>,
}

impl<T> DialogInner<T> {
    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending_clear.take() {
            handle.abort();
        }
    }
}

impl<T> Drop for DialogInner<T> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Create-or-edit dialog state controller
///
/// Clones share state, so a view and its child components can hold the same
/// controller. All transitions are synchronous; only the deferred clear runs
/// on a timer, and at most one such timer exists at any time.
pub struct DialogController<T> {
    inner: Arc<Mutex<DialogInner<T>>>,
    clear_delay: Duration,
}

impl<T> Clone for DialogController<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            clear_delay: self.clear_delay,
        }
    }
}

impl<T> Default for DialogController<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DialogController<T> {
    pub fn new() -> Self {
        Self::with_clear_delay(DEFAULT_CLEAR_DELAY)
    }

    pub fn with_clear_delay(clear_delay: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(DialogInner {
                open: false,
                selected: None,
                epoch: 0,
                pending_clear: None,
            })),
            clear_delay,
        }
    }

    /// Open the dialog with no selected entity (create flow)
    pub fn open_for_create(&self) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        inner.cancel_pending();
        inner.selected = None;
        inner.open = true;
    }

    /// Open the dialog bound to an entity (edit flow)
    pub fn open_for_edit(&self, entity: T) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        inner.cancel_pending();
        inner.selected = Some(entity);
        inner.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock().open
    }

    /// Cancel any pending deferred clear and drop the selection.
    ///
    /// Must run when the owning view is torn down, so a timer can never fire
    /// into a dead view. Dropping the last controller clone has the same
    /// effect.
    pub fn cleanup(&self) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        inner.cancel_pending();
        inner.selected = None;
        inner.open = false;
    }
}

impl<T: Clone> DialogController<T> {
    pub fn selected(&self) -> Option<T> {
        self.inner.lock().selected.clone()
    }

    /// Current state of the dialog state machine
    pub fn state(&self) -> DialogState<T> {
        let inner = self.inner.lock();
        match (inner.open, &inner.selected) {
            (true, Some(e)) => DialogState::OpenEdit(e.clone()),
            (true, None) => DialogState::OpenCreate,
            (false, Some(e)) => DialogState::Closing(e.clone()),
            (false, None) => DialogState::ClosedEmpty,
        }
    }
}

impl<T: Send + 'static> DialogController<T> {
    /// Close the dialog.
    ///
    /// Both modes cancel any previously scheduled clear first, so at most one
    /// deferred-clear timer exists at any time.
    pub fn close(&self, mode: CloseMode) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        inner.cancel_pending();
        inner.open = false;

        match mode {
            CloseMode::Immediate => {
                inner.selected = None;
            }
            CloseMode::Deferred => {
                let epoch = inner.epoch;
                let weak: Weak<Mutex<DialogInner<T>>> = Arc::downgrade(&self.inner);
                let delay = self.clear_delay;
                inner.pending_clear = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    // The controller may be gone by now; a dead Weak makes
                    // the timer a no-op instead of a dangling callback.
                    let Some(inner) = weak.upgrade() else { return };
                    let mut inner = inner.lock();
                    if inner.epoch == epoch {
                        inner.selected = None;
                        inner.pending_clear = None;
                    }
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn settle(duration: Duration) {
        // Let a just-spawned clear task register its timer before time moves
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        tokio::time::advance(duration).await;
        // Then let the fired timer's continuation run
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_close_immediate() {
        let dialog: DialogController<String> = DialogController::new();
        assert_eq!(dialog.state(), DialogState::ClosedEmpty);

        dialog.open_for_edit("A".to_string());
        assert_eq!(dialog.state(), DialogState::OpenEdit("A".to_string()));

        dialog.close(CloseMode::Immediate);
        assert_eq!(dialog.state(), DialogState::ClosedEmpty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_close_keeps_entity_during_delay() {
        let dialog = DialogController::with_clear_delay(Duration::from_millis(200));
        dialog.open_for_edit("A".to_string());
        dialog.close(CloseMode::Deferred);

        // Closing: not open, but the entity is still readable
        assert_eq!(dialog.state(), DialogState::Closing("A".to_string()));

        settle(Duration::from_millis(250)).await;
        assert_eq!(dialog.state(), DialogState::ClosedEmpty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reopen_cancels_pending_clear() {
        let dialog = DialogController::with_clear_delay(Duration::from_millis(200));
        dialog.open_for_edit("A".to_string());
        dialog.close(CloseMode::Deferred);

        // Re-open for B inside the deferred window
        dialog.open_for_edit("B".to_string());
        settle(Duration::from_millis(500)).await;

        // A's timer must not have cleared B
        assert_eq!(dialog.state(), DialogState::OpenEdit("B".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_for_create_clears_previous_selection() {
        let dialog = DialogController::with_clear_delay(Duration::from_millis(200));
        dialog.open_for_edit("A".to_string());
        dialog.close(CloseMode::Deferred);
        dialog.open_for_create();

        settle(Duration::from_millis(500)).await;
        assert_eq!(dialog.state(), DialogState::OpenCreate);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_to_edit_never_clears_via_stale_timer() {
        let dialog = DialogController::with_clear_delay(Duration::from_millis(200));
        dialog.open_for_edit("A".to_string());
        dialog.open_for_edit("B".to_string());

        settle(Duration::from_millis(500)).await;
        assert_eq!(dialog.state(), DialogState::OpenEdit("B".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_close_cancels_deferred_clear() {
        let dialog = DialogController::with_clear_delay(Duration::from_millis(200));
        dialog.open_for_edit("A".to_string());
        dialog.close(CloseMode::Deferred);
        // Rapid re-open and safe close inside the deferred window
        dialog.open_for_edit("B".to_string());
        dialog.close(CloseMode::Immediate);

        assert_eq!(dialog.state(), DialogState::ClosedEmpty);
        settle(Duration::from_millis(500)).await;
        // Nothing fires later, no double clear
        assert_eq!(dialog.state(), DialogState::ClosedEmpty);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_cancels_timer() {
        let dialog = DialogController::with_clear_delay(Duration::from_millis(200));
        dialog.open_for_edit("A".to_string());
        dialog.close(CloseMode::Deferred);
        dialog.cleanup();

        assert_eq!(dialog.state(), DialogState::ClosedEmpty);
        settle(Duration::from_millis(500)).await;
        assert_eq!(dialog.state(), DialogState::ClosedEmpty);
    }
}

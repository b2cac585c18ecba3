//=========================================================================
// Transition Callbacks
//=========================================================================
//
// Observer hooks notified as a transition moves through its stages.
// Every hook is optional. Replacing the set is allowed and takes effect
// at the next notification.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::state::TransitionStage;
use crate::core::error::TransitionError;
use crate::core::scene::SceneKey;

//=== Callback Types ======================================================

pub type StartCallback<K> = Box<dyn FnMut(Option<K>, K) + Send>;
pub type ProgressCallback = Box<dyn FnMut(f32, TransitionStage) + Send>;
pub type CompleteCallback<K> = Box<dyn FnMut(K) + Send>;
pub type ErrorCallback = Box<dyn FnMut(&TransitionError) + Send>;
pub type CancelCallback<K> = Box<dyn FnMut(Option<K>, K) + Send>;

//=== TransitionCallbacks =================================================

/// Observer set registered through `set_callbacks`.
///
/// Observers run synchronously inside `transition_to`, `update` and
/// `cancel`. For the process-wide system that means the scene system
/// lock is held, so an observer must not call
/// [`lock_scene_system`](crate::core::globals::lock_scene_system) or
/// otherwise re-enter the system; doing so deadlocks. Hand work off, for
/// example over a channel, instead.
///
/// # Example
///
/// ```rust
/// # use portfolio_scenes::prelude::*;
/// let callbacks = TransitionCallbacks::<Section>::new()
///     .on_start(|from, to| println!("{:?} -> {}", from, to))
///     .on_progress(|progress, _stage| println!("{:.0}%", progress * 100.0));
/// ```
pub struct TransitionCallbacks<K: SceneKey> {
    start: Option<StartCallback<K>>,
    progress: Option<ProgressCallback>,
    complete: Option<CompleteCallback<K>>,
    error: Option<ErrorCallback>,
    cancel: Option<CancelCallback<K>>,
}

impl<K: SceneKey> TransitionCallbacks<K> {
    pub fn new() -> Self {
        Self {
            start: None,
            progress: None,
            complete: None,
            error: None,
            cancel: None,
        }
    }

    //--- Builders ---------------------------------------------------------

    /// Called once per transition with `(from, to)`.
    pub fn on_start(mut self, f: impl FnMut(Option<K>, K) + Send + 'static) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    /// Called each animation frame with the eased progress.
    pub fn on_progress(mut self, f: impl FnMut(f32, TransitionStage) + Send + 'static) -> Self {
        self.progress = Some(Box::new(f));
        self
    }

    /// Called once the destination is the active scene.
    pub fn on_complete(mut self, f: impl FnMut(K) + Send + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }

    /// Called once when a transition fails.
    pub fn on_error(mut self, f: impl FnMut(&TransitionError) + Send + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    /// Called when an in-flight transition is cancelled.
    pub fn on_cancel(mut self, f: impl FnMut(Option<K>, K) + Send + 'static) -> Self {
        self.cancel = Some(Box::new(f));
        self
    }

    //--- Emitters ---------------------------------------------------------

    pub(crate) fn emit_start(&mut self, from: Option<K>, to: K) {
        if let Some(f) = self.start.as_mut() {
            f(from, to);
        }
    }

    pub(crate) fn emit_progress(&mut self, progress: f32, stage: TransitionStage) {
        if let Some(f) = self.progress.as_mut() {
            f(progress, stage);
        }
    }

    pub(crate) fn emit_complete(&mut self, to: K) {
        if let Some(f) = self.complete.as_mut() {
            f(to);
        }
    }

    pub(crate) fn emit_error(&mut self, error: &TransitionError) {
        if let Some(f) = self.error.as_mut() {
            f(error);
        }
    }

    pub(crate) fn emit_cancel(&mut self, from: Option<K>, to: K) {
        if let Some(f) = self.cancel.as_mut() {
            f(from, to);
        }
    }
}

impl<K: SceneKey> Default for TransitionCallbacks<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: SceneKey> std::fmt::Debug for TransitionCallbacks<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionCallbacks")
            .field("on_start", &self.start.is_some())
            .field("on_progress", &self.progress.is_some())
            .field("on_complete", &self.complete.is_some())
            .field("on_error", &self.error.is_some())
            .field("on_cancel", &self.cancel.is_some())
            .finish()
    }
}

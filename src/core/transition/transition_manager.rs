//=========================================================================
// Scene Transition Manager
//=========================================================================
//
// Drives one timed, eased handoff between two scenes at a time.
//
// Architecture:
//   transition_to(target) ──validate──> Preparing   (on_start)
//   update(delta), once per frame:
//     Preparing      → begin asset load
//     LoadingAssets  → poll the loader channel (suspends while pending)
//     Initializing   → warm up the target (activate hook, not yet Active)
//     Transitioning  → advance the eased clock, move the camera
//                      (suspends until progress reaches 1)
//     commit         → SceneManager::set_active_scene(target)
//                      Complete (on_complete) → Idle
//
//   Any failure → Error (on_error) → rollback → Idle
//   cancel()    → rollback (on_cancel) → Idle
//
// Rollback undoes the target's warm-up, aborts a pending load and puts
// the camera back where it was. The source scene is never deactivated
// before the commit, so it stays Active on every failure path.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Display;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::callbacks::TransitionCallbacks;
use super::easing::{Easing, EasingFamily};
use super::state::{LoadingState, TransitionStage, TransitionState};
use crate::core::error::{TransitionError, TransitionResult};
use crate::core::render::Viewpoint;
use crate::core::scene::{AssetLoad, SceneKey, SceneManager};

/// Transition length used when no options are given.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(1000);

//=== TransitionOptions ===================================================

/// How a single transition animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionOptions {
    /// Length of the animated stage. Zero completes on the first update.
    pub duration: Duration,
    pub easing: Easing,
    /// Cancel an in-flight transition instead of being rejected by it.
    pub interrupt: bool,
}

impl TransitionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Looks the easing up by name; unknown names become linear.
    pub fn with_easing_name(self, name: &str) -> Self {
        self.with_easing(Easing::from_name(name))
    }

    pub fn interrupting(mut self) -> Self {
        self.interrupt = true;
        self
    }
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_TRANSITION_DURATION,
            easing: Easing::ease_in_out(EasingFamily::Cubic),
            interrupt: false,
        }
    }
}

//=== TransitionHandle ====================================================

/// Outcome of a transition request.
///
/// Resolves to `Ok(destination)` once the destination is active and to
/// `Err(..)` on failure or cancellation.
#[derive(Debug)]
pub struct TransitionHandle<K: SceneKey> {
    receiver: Receiver<TransitionResult<K>>,
}

impl<K: SceneKey> TransitionHandle<K> {
    fn pair() -> (Sender<TransitionResult<K>>, Self) {
        let (sender, receiver) = bounded(1);
        (sender, Self { receiver })
    }

    fn resolved(result: TransitionResult<K>) -> Self {
        let (sender, handle) = Self::pair();
        let _ = sender.send(result);
        handle
    }

    /// Returns the outcome if the transition has finished.
    ///
    /// The outcome is handed out once; later calls report the manager as
    /// gone.
    pub fn try_result(&self) -> Option<TransitionResult<K>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(Self::orphaned())),
        }
    }

    /// Blocks until the transition finishes.
    ///
    /// Only useful when another thread drives `update`; waiting on the
    /// frame thread itself never returns.
    pub fn wait(self) -> TransitionResult<K> {
        self.receiver.recv().unwrap_or_else(|_| Err(Self::orphaned()))
    }

    fn orphaned() -> TransitionError {
        TransitionError::InvalidState("transition dropped without an outcome".into())
    }
}

//=== In-Flight Transition ================================================

enum Phase {
    Preparing,
    LoadingAssets(Receiver<Result<(), String>>),
    Initializing,
    Transitioning { elapsed: f32 },
}

enum Step {
    Suspend,
    Commit,
    Fail(TransitionError),
}

struct InFlight<K: SceneKey> {
    from: Option<K>,
    to: K,
    to_name: String,
    options: TransitionOptions,
    phase: Phase,
    from_view: Viewpoint,
    to_view: Viewpoint,
    warmed: bool,
    reply: Sender<TransitionResult<K>>,
}

impl<K: SceneKey> InFlight<K> {
    /// Advances through as many stages as possible this frame.
    fn advance(
        &mut self,
        manager: &mut SceneManager<K>,
        state: &mut TransitionState<K>,
        callbacks: &mut TransitionCallbacks<K>,
        delta: f32,
    ) -> Step {
        loop {
            match &mut self.phase {
                Phase::Preparing => {
                    enter(state, TransitionStage::LoadingAssets, format!("Loading {} assets", self.to_name));
                    match manager.begin_load(self.to) {
                        Ok(None) => self.phase = Phase::Initializing,
                        Ok(Some(AssetLoad::Ready)) => {
                            if let Err(e) = manager.finish_load(self.to) {
                                return Step::Fail(e);
                            }
                            self.phase = Phase::Initializing;
                        }
                        Ok(Some(AssetLoad::Pending(receiver))) => {
                            self.phase = Phase::LoadingAssets(receiver);
                        }
                        Err(e) => return Step::Fail(e),
                    }
                }

                Phase::LoadingAssets(receiver) => match receiver.try_recv() {
                    Ok(Ok(())) => {
                        if let Err(e) = manager.finish_load(self.to) {
                            return Step::Fail(e);
                        }
                        self.phase = Phase::Initializing;
                    }
                    Ok(Err(reason)) => return Step::Fail(manager.fail_load(self.to, &reason)),
                    Err(TryRecvError::Disconnected) => {
                        return Step::Fail(manager.fail_load(self.to, "asset loader disconnected"));
                    }
                    Err(TryRecvError::Empty) => return Step::Suspend,
                },

                Phase::Initializing => {
                    enter(state, TransitionStage::Initializing, format!("Initializing {}", self.to_name));
                    if let Err(e) = manager.warm_up(self.to) {
                        return Step::Fail(e);
                    }
                    self.warmed = true;

                    enter(state, TransitionStage::Transitioning, format!("Entering {}", self.to_name));
                    self.phase = Phase::Transitioning { elapsed: 0.0 };

                    // The clock starts on the next frame unless there is
                    // nothing to animate.
                    if !self.options.duration.is_zero() {
                        return Step::Suspend;
                    }
                    return self.animate(manager, state, callbacks, 0.0);
                }

                Phase::Transitioning { .. } => {
                    return self.animate(manager, state, callbacks, delta);
                }
            }
        }
    }

    fn animate(
        &mut self,
        manager: &mut SceneManager<K>,
        state: &mut TransitionState<K>,
        callbacks: &mut TransitionCallbacks<K>,
        delta: f32,
    ) -> Step {
        let Phase::Transitioning { elapsed } = &mut self.phase else {
            return Step::Suspend;
        };
        *elapsed += delta;

        let duration = self.options.duration.as_secs_f32();
        let linear = if duration > 0.0 {
            (*elapsed / duration).min(1.0)
        } else {
            1.0
        };
        let eased = self.options.easing.apply(linear);
        manager.interpolate_camera(&self.from_view, &self.to_view, eased);

        // Reported progress never decreases, even for overshooting curves.
        let reported = if linear >= 1.0 {
            1.0
        } else {
            eased.clamp(0.0, 1.0).max(state.progress)
        };
        if reported > state.progress {
            state.progress = reported;
            trace!("Transition progress {:.3}", reported);
            callbacks.emit_progress(reported, TransitionStage::Transitioning);
        }

        if linear >= 1.0 {
            Step::Commit
        } else {
            Step::Suspend
        }
    }

    /// Leaves the source scene exactly as it was before the request.
    fn rollback(&mut self, manager: &mut SceneManager<K>) {
        if self.warmed {
            manager.cancel_warm_up(self.to);
            self.warmed = false;
        }
        if matches!(self.phase, Phase::LoadingAssets(_)) {
            manager.abort_load(self.to);
        }
        manager.set_camera_viewpoint(self.from_view);
    }

    fn resolve(&self, result: TransitionResult<K>) {
        // The caller may have dropped the handle.
        let _ = self.reply.send(result);
    }
}

fn enter<K: SceneKey>(state: &mut TransitionState<K>, stage: TransitionStage, message: String) {
    debug!("Transition stage {} ({})", stage, message);
    state.stage = stage;
    state.message = message;
}

fn label<K: Display>(key: Option<K>) -> String {
    key.map(|k| k.to_string()).unwrap_or_else(|| "none".to_string())
}

//=== SceneTransitionManager ==============================================

/// Orchestrates handoff between scenes registered in a [`SceneManager`].
///
/// The manager never owns scenes. Every operation borrows the scene
/// manager, and the actual swap is delegated to
/// [`SceneManager::set_active_scene`].
pub struct SceneTransitionManager<K: SceneKey> {
    state: TransitionState<K>,
    callbacks: TransitionCallbacks<K>,
    in_flight: Option<InFlight<K>>,
}

impl<K: SceneKey> SceneTransitionManager<K> {
    pub fn new() -> Self {
        Self {
            state: TransitionState::idle(),
            callbacks: TransitionCallbacks::new(),
            in_flight: None,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> &TransitionState<K> {
        &self.state
    }

    pub fn loading_state(&self) -> LoadingState {
        self.state.loading_state()
    }

    pub fn is_transitioning(&self) -> bool {
        self.in_flight.is_some()
    }

    //--- Observers --------------------------------------------------------

    /// Replaces every observer. The last registration wins.
    pub fn set_callbacks(&mut self, callbacks: TransitionCallbacks<K>) {
        self.callbacks = callbacks;
    }

    //--- Requests ---------------------------------------------------------

    /// Starts a transition from the active section to `target`.
    ///
    /// Rejected synchronously when `target` is unregistered, the scene
    /// manager is not initialized, or another transition is in flight and
    /// `options.interrupt` is not set. Requesting the already active
    /// section while idle completes at once without running any hook.
    pub fn transition_to(
        &mut self,
        manager: &mut SceneManager<K>,
        target: K,
        options: TransitionOptions,
    ) -> TransitionResult<TransitionHandle<K>> {
        if let Some(current) = self.in_flight.as_ref() {
            if !options.interrupt {
                warn!(
                    "Rejected transition to {}: {} -> {} in flight",
                    target,
                    label(current.from),
                    current.to
                );
                return Err(TransitionError::Concurrent {
                    from: label(current.from),
                    to: current.to.to_string(),
                });
            }
        }

        let Some(entry) = manager.get_scene(target) else {
            warn!("Rejected transition to unregistered section {}", target);
            return Err(TransitionError::Registration(target.to_string()));
        };
        let to_name = entry.name().to_string();
        let to_view = entry.scene().camera_config().viewpoint();

        if manager.camera().is_none() {
            return Err(TransitionError::InvalidState(
                "scene manager is not initialized".into(),
            ));
        }

        // Only an accepted request may interrupt. Rollback restores the
        // camera, so the start viewpoint is read afterwards.
        self.cancel(manager);
        let Some(from_view) = manager.camera().map(|camera| camera.viewpoint()) else {
            return Err(TransitionError::InvalidState(
                "scene manager is not initialized".into(),
            ));
        };

        let from = manager.active_section();
        if from == Some(target) {
            debug!("Section {} is already active", target);
            self.callbacks.emit_start(from, target);
            self.callbacks.emit_complete(target);
            return Ok(TransitionHandle::resolved(Ok(target)));
        }

        let (reply, handle) = TransitionHandle::pair();
        self.state = TransitionState {
            from,
            to: Some(target),
            progress: 0.0,
            stage: TransitionStage::Idle,
            message: String::new(),
        };
        enter(&mut self.state, TransitionStage::Preparing, format!("Preparing {}", to_name));
        self.in_flight = Some(InFlight {
            from,
            to: target,
            to_name,
            options,
            phase: Phase::Preparing,
            from_view,
            to_view,
            warmed: false,
            reply,
        });

        info!(
            "Transition {} -> {} started ({} ms, {})",
            label(from),
            target,
            options.duration.as_millis(),
            options.easing
        );
        self.callbacks.emit_start(from, target);
        Ok(handle)
    }

    //--- Frame Driver -----------------------------------------------------

    /// Advances the in-flight transition by one frame.
    ///
    /// `delta` is in seconds; negative or non-finite values count as zero.
    pub fn update(&mut self, manager: &mut SceneManager<K>, delta: f32) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let Some(mut flight) = self.in_flight.take() else {
            return;
        };

        match flight.advance(manager, &mut self.state, &mut self.callbacks, delta) {
            Step::Suspend => self.in_flight = Some(flight),
            Step::Commit => self.commit(manager, flight),
            Step::Fail(error) => self.fail(manager, flight, error),
        }
    }

    fn commit(&mut self, manager: &mut SceneManager<K>, mut flight: InFlight<K>) {
        if let Err(e) = manager.set_active_scene(flight.to) {
            self.fail(manager, flight, e);
            return;
        }
        flight.warmed = false;

        self.state.progress = 1.0;
        enter(&mut self.state, TransitionStage::Complete, "Complete".to_string());
        info!("Transition {} -> {} complete", label(flight.from), flight.to);

        self.callbacks.emit_complete(flight.to);
        flight.resolve(Ok(flight.to));
        self.state = TransitionState::idle();
    }

    fn fail(&mut self, manager: &mut SceneManager<K>, mut flight: InFlight<K>, error: TransitionError) {
        enter(&mut self.state, TransitionStage::Error, error.to_string());
        error!("Transition {} -> {} failed: {}", label(flight.from), flight.to, error);

        flight.rollback(manager);
        self.callbacks.emit_error(&error);
        flight.resolve(Err(error));
        self.state = TransitionState::idle();
    }

    //--- Cancellation -----------------------------------------------------

    /// Cancels the in-flight transition, if any.
    ///
    /// The previously active scene stays Active. Returns `false` when
    /// there was nothing to cancel.
    pub fn cancel(&mut self, manager: &mut SceneManager<K>) -> bool {
        let Some(mut flight) = self.in_flight.take() else {
            return false;
        };

        info!("Transition {} -> {} cancelled", label(flight.from), flight.to);
        flight.rollback(manager);
        self.callbacks.emit_cancel(flight.from, flight.to);
        flight.resolve(Err(TransitionError::Cancelled {
            to: flight.to.to_string(),
        }));
        self.state = TransitionState::idle();
        true
    }

    /// Cancels any in-flight transition and drops every observer.
    pub fn dispose(&mut self, manager: &mut SceneManager<K>) {
        self.cancel(manager);
        self.callbacks = TransitionCallbacks::new();
        self.state = TransitionState::idle();
        debug!("Transition manager disposed");
    }
}

impl<K: SceneKey> Default for SceneTransitionManager<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

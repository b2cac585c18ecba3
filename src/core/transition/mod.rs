//=========================================================================
// Transition System
//=========================================================================
//
// Timed, eased handoff of "active" status from one scene to another.
//
// Architecture:
//   SceneTransitionManager
//     ├─ state:     TransitionState   (read by loading indicators)
//     ├─ callbacks: TransitionCallbacks
//     └─ in-flight: stage machine advanced by update(delta)
//
//   SceneTransitionManager ──borrows──> SceneManager
//     (the actual swap is SceneManager::set_active_scene)
//
//=========================================================================

//=== Module Declarations =================================================

pub mod callbacks;
pub mod easing;
pub mod state;
mod transition_manager;

//=== Public API ==========================================================

pub use callbacks::TransitionCallbacks;
pub use easing::{Easing, EasingFamily, EasingMode};
pub use state::{LoadingState, TransitionStage, TransitionState};
pub use transition_manager::{
    SceneTransitionManager, TransitionHandle, TransitionOptions, DEFAULT_TRANSITION_DURATION,
};

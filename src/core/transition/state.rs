//=========================================================================
// Transition State
//=========================================================================
//
// Observable snapshot of the transition pipeline.
//
// Stages:
//   Idle → Preparing → LoadingAssets → Initializing → Transitioning
//        → Complete → Idle
//   (any non-idle stage) → Error → Idle
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneKey;

//=== TransitionStage =====================================================

/// Phase of the transition pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransitionStage {
    #[default]
    Idle,
    Preparing,
    LoadingAssets,
    Initializing,
    Transitioning,
    Complete,
    Error,
}

impl TransitionStage {
    /// `true` for every stage between `Idle` and the terminal stages.
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            Self::Preparing | Self::LoadingAssets | Self::Initializing | Self::Transitioning
        )
    }

    /// `true` while a loading indicator should be shown.
    pub fn is_loading(self) -> bool {
        self != Self::Idle
    }
}

impl fmt::Display for TransitionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Preparing => "preparing",
            Self::LoadingAssets => "loading_assets",
            Self::Initializing => "initializing",
            Self::Transitioning => "transitioning",
            Self::Complete => "complete",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

//=== TransitionState =====================================================

/// Current transition as seen by observers.
///
/// Only the transition manager mutates this. It is reset to the idle
/// shape after completion, failure or cancellation.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionState<K: SceneKey> {
    pub from: Option<K>,
    pub to: Option<K>,
    /// Eased progress, always within `[0, 1]`.
    pub progress: f32,
    pub stage: TransitionStage,
    pub message: String,
}

impl<K: SceneKey> TransitionState<K> {
    pub fn idle() -> Self {
        Self {
            from: None,
            to: None,
            progress: 0.0,
            stage: TransitionStage::Idle,
            message: String::new(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.stage == TransitionStage::Idle
    }

    /// Projection used by progress UI.
    pub fn loading_state(&self) -> LoadingState {
        LoadingState {
            is_loading: self.stage.is_loading(),
            progress: self.progress,
            stage: self.stage,
            message: self.message.clone(),
        }
    }
}

impl<K: SceneKey> Default for TransitionState<K> {
    fn default() -> Self {
        Self::idle()
    }
}

//=== LoadingState ========================================================

/// The loading-relevant subset of [`TransitionState`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadingState {
    pub is_loading: bool,
    pub progress: f32,
    pub stage: TransitionStage,
    pub message: String,
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::section::Section;

    #[test]
    fn idle_state_is_empty() {
        let state = TransitionState::<Section>::idle();
        assert!(state.is_idle());
        assert_eq!(state.from, None);
        assert_eq!(state.to, None);
        assert_eq!(state.progress, 0.0);
        assert!(state.message.is_empty());
    }

    #[test]
    fn loading_state_mirrors_transition_state() {
        let state = TransitionState {
            from: Some(Section::Home),
            to: Some(Section::Resume),
            progress: 0.4,
            stage: TransitionStage::Transitioning,
            message: "Entering Resume".to_string(),
        };
        let loading = state.loading_state();
        assert!(loading.is_loading);
        assert_eq!(loading.progress, 0.4);
        assert_eq!(loading.stage, TransitionStage::Transitioning);
        assert_eq!(loading.message, "Entering Resume");

        assert!(!TransitionState::<Section>::idle().loading_state().is_loading);
    }

    #[test]
    fn only_pipeline_stages_are_in_flight() {
        assert!(!TransitionStage::Idle.is_in_flight());
        assert!(TransitionStage::LoadingAssets.is_in_flight());
        assert!(TransitionStage::Transitioning.is_in_flight());
        assert!(!TransitionStage::Complete.is_in_flight());
        assert!(!TransitionStage::Error.is_in_flight());
    }
}

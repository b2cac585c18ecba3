//=========================================================================
// Errors
//=========================================================================
//
// Error taxonomy for the scene and transition core.
//
// Layers:
//   SceneError       ← raised by a single scene's lifecycle
//   TransitionError  ← surfaced to callers and observers
//   ConfigError      ← configuration loading/saving
//
// Scene errors never escape into the host frame loop. They are caught at
// the SceneManager / SceneTransitionManager boundary, logged, and wrapped
// into TransitionError::Lifecycle.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::scene::SceneState;

//=== Lifecycle Hook ======================================================

/// Identifies which scene hook produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleHook {
    LoadAssets,
    Initialize,
    Activate,
    Deactivate,
    Cleanup,
}

impl std::fmt::Display for LifecycleHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::LoadAssets => "load_assets",
            Self::Initialize => "initialize",
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
            Self::Cleanup => "cleanup",
        };
        f.write_str(name)
    }
}

//=== SceneError ==========================================================

/// Failure raised by one scene's lifecycle.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A lifecycle hook reported a failure.
    #[error("scene '{section}' failed in {hook}: {reason}")]
    Lifecycle {
        section: String,
        hook: LifecycleHook,
        reason: String,
    },

    /// The operation is not permitted from the scene's current state.
    #[error("scene '{section}' cannot {operation} while {state:?}")]
    InvalidState {
        section: String,
        operation: &'static str,
        state: SceneState,
    },

    /// An asset load rejected or its loader went away.
    #[error("scene '{section}' asset load failed: {reason}")]
    AssetLoad { section: String, reason: String },
}

impl SceneError {
    /// Builds a hook failure for the given section.
    pub fn hook(section: impl Into<String>, hook: LifecycleHook, reason: impl Into<String>) -> Self {
        Self::Lifecycle {
            section: section.into(),
            hook,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error was produced by a lifecycle state check.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }
}

//=== TransitionError =====================================================

/// Failure surfaced by the scene manager or the transition pipeline.
///
/// Registration and concurrency errors are returned synchronously from the
/// rejected call. Lifecycle errors are delivered through the transition
/// handle and the `on_error` observer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    /// The requested section has no registered scene.
    #[error("section '{0}' is not registered")]
    Registration(String),

    /// A scene for this section is already registered.
    #[error("section '{0}' is already registered")]
    DuplicateScene(String),

    /// A transition is already in flight.
    #[error("transition {from} -> {to} is already in flight")]
    Concurrent { from: String, to: String },

    /// A scene hook failed.
    #[error(transparent)]
    Lifecycle(#[from] SceneError),

    /// The operation is not allowed in the current manager state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The transition was cancelled before it committed.
    #[error("transition to '{to}' was cancelled")]
    Cancelled { to: String },
}

//=== ConfigError =========================================================

/// Configuration loading and saving errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// A value parsed but is out of range
    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

//=== Result Aliases ======================================================

pub type SceneResult<T = ()> = Result<T, SceneError>;
pub type TransitionResult<T = ()> = Result<T, TransitionError>;

//=========================================================================
// Tests
//=========================================================================

//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use portfolio_scenes::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// App
pub use crate::app::{App, AppBuilder};

// Global scene system
pub use crate::core::globals::{install, lock_scene_system, scene_system, SceneSystem, SystemGuard};

// Scene system
pub use crate::core::scene::{AssetLoad, Scene, SceneContext, SceneKey, SceneManager, SceneState};
pub use crate::core::section::Section;

// Transitions
pub use crate::core::transition::{
    Easing, EasingFamily, EasingMode, LoadingState, SceneTransitionManager, TransitionCallbacks,
    TransitionHandle, TransitionOptions, TransitionStage, TransitionState,
};

// Rendering
pub use crate::core::render::camera::{Camera, CameraConfig, Projection, Viewpoint};
pub use crate::core::render::{
    HeadlessRenderer, LightKind, Renderer, ResourceDesc, ResourceHandle, ResourceSet, Viewport,
};

// Quality and capabilities
pub use crate::core::quality::{Capabilities, QualityLevel, QualitySettings};

// Configuration and errors
pub use crate::core::config::SceneSystemConfig;
pub use crate::core::error::{
    ConfigError, LifecycleHook, SceneError, SceneResult, TransitionError, TransitionResult,
};

// Navigation
pub use crate::core::navigation::NavigationCommand;

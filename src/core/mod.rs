//=========================================================================
// Core
//
// Platform-independent scene lifecycle and transition machinery.
//
// Layout:
//   scene       → Scene trait, lifecycle state machine, SceneManager
//   transition  → staged transitions, easing, observer callbacks
//   globals     → the process-wide SceneSystem and its installer
//   render      → Renderer seam, camera, GPU resource ownership
//   quality     → quality tiers and host capabilities
//   section     → the portfolio's navigation targets
//   navigation  → user navigation intents
//   config      → TOML-backed tunables
//   error       → error taxonomy
//
// Notes:
// Nothing in here touches winit. The orchestrator is the only piece
// that talks to the platform layer, and only through its channel.
//
//=========================================================================

pub mod config;
pub mod error;
pub mod globals;
pub mod navigation;
pub(crate) mod orchestrator;
pub mod quality;
pub mod render;
pub mod scene;
pub mod section;
pub mod transition;

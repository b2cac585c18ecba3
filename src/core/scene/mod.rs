//=========================================================================
// Scene System
//=========================================================================
//
// Manages scene lifecycle and the single active scene.
//
// Architecture:
//   SceneManager
//     ├─ scenes: HashMap<S, SceneEntry<S>>
//     │            └─ Box<dyn Scene<S>> + SceneState
//     ├─ active: Option<S>
//     └─ surface: Renderer + Camera + Viewport
//
// Flow:
//   tick() → before_render() → update() → render() → after_render()
//            (active scene only)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::{Debug, Display};
use std::hash::Hash;

use crossbeam_channel::Receiver;

//=== Internal Dependencies ===============================================

use crate::core::error::SceneResult;
use crate::core::quality::{Capabilities, QualityLevel};
use crate::core::render::camera::{Camera, CameraConfig};
use crate::core::render::{Renderer, Viewport};

//=== Module Declarations =================================================

mod lifecycle;
mod scene_manager;

#[cfg(test)]
pub(crate) mod testing;

//=== Public API ==========================================================

pub use lifecycle::{SceneEntry, SceneState};
pub use scene_manager::{SceneManager, DEFAULT_MAX_FRAME_DELTA};

//=== Scene Key Trait =====================================================

/// Marker trait for scene identifiers.
///
/// Scene keys uniquely identify scenes in the SceneManager's HashMap.
/// The core treats them as opaque; `Display` is used for logs, errors
/// and status messages.
pub trait SceneKey: Clone + Copy + Eq + Hash + Debug + Display + Send + 'static {}

//=== Asset Loading =======================================================

/// Outcome of starting a scene's asset load.
///
/// Long-running loads run elsewhere (a loader thread, a fetch) and report
/// through the channel. The transition pipeline polls the receiver once
/// per frame and never blocks on it.
#[derive(Debug)]
pub enum AssetLoad {
    /// Assets are available; initialization may proceed immediately.
    Ready,

    /// Completion is signalled through the channel. A dropped sender
    /// counts as a failed load.
    Pending(Receiver<Result<(), String>>),
}

//=== SceneContext ========================================================

/// Shared-surface access handed to scenes while they build resources.
pub struct SceneContext<'a> {
    pub renderer: &'a mut dyn Renderer,
    pub viewport: Viewport,
    /// Tier already resolved against the scene's supported levels.
    pub quality: QualityLevel,
}

//=== Scene Trait =========================================================

/// One section's 3D content and its response to lifecycle events.
///
/// Scenes are registered once in the [`SceneManager`] and stay resident
/// after deactivation, so revisiting a section does not rebuild it. The
/// lifecycle state machine is enforced by [`SceneEntry`]; implementors
/// only supply the behaviour.
///
/// # Minimal Implementation
///
/// ```rust
/// # use portfolio_scenes::prelude::*;
/// struct Blank { resources: ResourceSet }
///
/// impl Scene<Section> for Blank {
///     fn section(&self) -> Section { Section::Home }
///     fn name(&self) -> &str { "Blank" }
///     fn initialize(&mut self, _ctx: &mut SceneContext<'_>) -> SceneResult { Ok(()) }
///     fn update(&mut self, _delta: f32, _camera: &mut Camera) {}
///     fn render(&self, renderer: &mut dyn Renderer, camera: &Camera) {
///         renderer.render(camera, self.resources.handles());
///     }
///     fn cleanup(&mut self, renderer: &mut dyn Renderer) -> SceneResult {
///         self.resources.release_all(renderer);
///         Ok(())
///     }
/// }
/// ```
pub trait Scene<S: SceneKey>: Send {
    //--- Identity ---------------------------------------------------------

    /// Section this scene is bound to. Used as the registry key.
    fn section(&self) -> S;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Camera setup used when this scene becomes current.
    fn camera_config(&self) -> CameraConfig {
        CameraConfig::default()
    }

    /// Quality tiers this scene can run at, ascending.
    fn supported_quality_levels(&self) -> &[QualityLevel] {
        &QualityLevel::ALL
    }

    fn default_quality_level(&self) -> QualityLevel {
        QualityLevel::High
    }

    /// Host features needed for this scene to register at all.
    fn required_capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    //--- Lifecycle --------------------------------------------------------

    /// Starts loading assets. Called before `initialize` each time the
    /// scene leaves `Uninitialized`, so a load that was interrupted is
    /// requested again on the next attempt.
    fn load_assets(&mut self) -> AssetLoad {
        AssetLoad::Ready
    }

    /// One-time resource construction.
    fn initialize(&mut self, ctx: &mut SceneContext<'_>) -> SceneResult;

    /// Scene-specific startup, e.g. resuming animation.
    fn activate(&mut self) -> SceneResult {
        Ok(())
    }

    /// Pauses the scene. Must not release resources.
    fn deactivate(&mut self) -> SceneResult {
        Ok(())
    }

    /// Releases every GPU resource the scene owns.
    fn cleanup(&mut self, renderer: &mut dyn Renderer) -> SceneResult;

    //--- Frame ------------------------------------------------------------

    /// Advances the scene by `delta` seconds. The camera transform may be
    /// changed here; the camera itself must not be replaced.
    fn update(&mut self, delta: f32, camera: &mut Camera);

    fn before_render(&mut self, _camera: &Camera) {}

    /// Issues this frame's draw.
    fn render(&self, renderer: &mut dyn Renderer, camera: &Camera);

    fn after_render(&mut self) {}

    //--- Environment ------------------------------------------------------

    fn resize(&mut self, _viewport: Viewport) {}

    /// Adjusts internal detail (particle counts, shadows, LOD) without
    /// rebuilding the scene. `renderer` is `None` before the scene has
    /// been initialized.
    fn on_quality_change(&mut self, _level: QualityLevel, _renderer: Option<&mut dyn Renderer>) {}
}

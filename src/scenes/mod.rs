//=========================================================================
// Portfolio Scenes
//=========================================================================
//
// One scene per section. Scenes only animate their own content; the
// shared camera belongs to the transition pipeline.
//
//=========================================================================

//=== Module Declarations =================================================

mod code_visualizer;
mod home;
mod math_gallery;
mod resume;
mod shader_playground;
mod wasm_demos;

//=== Public API ==========================================================

pub use code_visualizer::{CodeVisualizerScene, ModuleGraph};
pub use home::HomeScene;
pub use math_gallery::{MathGalleryScene, Surface};
pub use resume::{Milestone, ResumeScene};
pub use shader_playground::{ShaderPlaygroundScene, ShaderPreset, Uniforms};
pub use wasm_demos::WasmDemosScene;

//=== Internal Dependencies ===============================================

use crate::core::error::TransitionResult;
use crate::core::quality::Capabilities;
use crate::core::scene::SceneManager;
use crate::core::section::Section;

//=== Registration ========================================================

/// Registers every portfolio scene the host can run.
///
/// Returns how many scenes were registered.
pub fn register_all(manager: &mut SceneManager<Section>, host: Capabilities) -> TransitionResult<usize> {
    let registered = [
        manager.register_if_supported(HomeScene::new(), host)?,
        manager.register_if_supported(ResumeScene::new(), host)?,
        manager.register_if_supported(MathGalleryScene::new(), host)?,
        manager.register_if_supported(CodeVisualizerScene::new(), host)?,
        manager.register_if_supported(WasmDemosScene::new(), host)?,
        manager.register_if_supported(ShaderPlaygroundScene::new(), host)?,
    ];
    Ok(registered.iter().filter(|&&r| r).count())
}

//=========================================================================
// Tests
//=========================================================================

//=========================================================================
// Scene System
//=========================================================================
//
// Pairs the scene manager with the transition manager and drives both
// from a single per-frame call.
//
// Frame order:
//   frame(delta) → transitions.update()   (may commit a swap)
//                → scene_manager.tick()   (active scene only)
//
//=========================================================================

//=== External Dependencies ===============================================

use log::info;

//=== Internal Dependencies ===============================================

use crate::core::config::SceneSystemConfig;
use crate::core::error::TransitionResult;
use crate::core::quality::QualityLevel;
use crate::core::render::camera::Camera;
use crate::core::render::Renderer;
use crate::core::scene::{SceneKey, SceneManager};
use crate::core::transition::{
    LoadingState, SceneTransitionManager, TransitionCallbacks, TransitionHandle, TransitionOptions,
    TransitionState,
};

//=== SceneSystem =========================================================

/// Scene registry, transition controller and their frame driver.
///
/// # Available Systems
///
/// - `scene_manager`: registration, the active scene and the shared surface
/// - `transitions`: staged, eased handoff between scenes
pub struct SceneSystem<K: SceneKey> {
    pub scene_manager: SceneManager<K>,
    pub transitions: SceneTransitionManager<K>,
    default_options: TransitionOptions,
}

impl<K: SceneKey> SceneSystem<K> {
    pub fn new() -> Self {
        Self {
            scene_manager: SceneManager::new(),
            transitions: SceneTransitionManager::new(),
            default_options: TransitionOptions::default(),
        }
    }

    /// Applies frame-delta ceiling and default transition options.
    ///
    /// # Panics
    ///
    /// Panics if `config.max_frame_delta <= 0.0`; validated configs never do.
    pub fn configure(&mut self, config: &SceneSystemConfig) {
        self.scene_manager.set_max_frame_delta(config.max_frame_delta);
        self.default_options = config.transition_options();
    }

    pub fn default_options(&self) -> TransitionOptions {
        self.default_options
    }

    pub fn set_default_options(&mut self, options: TransitionOptions) {
        self.default_options = options;
    }

    //--- Setup ------------------------------------------------------------

    /// Binds the rendering surface. See [`SceneManager::initialize`].
    pub fn initialize(
        &mut self,
        renderer: Box<dyn Renderer>,
        camera: Camera,
        quality: QualityLevel,
    ) -> TransitionResult {
        self.scene_manager.initialize(renderer, camera, quality)
    }

    pub fn is_initialized(&self) -> bool {
        self.scene_manager.is_initialized()
    }

    //--- Navigation -------------------------------------------------------

    /// Starts a transition with the default options.
    pub fn transition_to(&mut self, target: K) -> TransitionResult<TransitionHandle<K>> {
        let options = self.default_options;
        self.transition_with(target, options)
    }

    pub fn transition_with(
        &mut self,
        target: K,
        options: TransitionOptions,
    ) -> TransitionResult<TransitionHandle<K>> {
        self.transitions
            .transition_to(&mut self.scene_manager, target, options)
    }

    pub fn cancel_transition(&mut self) -> bool {
        self.transitions.cancel(&mut self.scene_manager)
    }

    pub fn set_callbacks(&mut self, callbacks: TransitionCallbacks<K>) {
        self.transitions.set_callbacks(callbacks);
    }

    /// Section the user is on or heading to.
    pub fn current_target(&self) -> Option<K> {
        self.transitions
            .state()
            .to
            .or_else(|| self.scene_manager.active_section())
    }

    pub fn transition_state(&self) -> &TransitionState<K> {
        self.transitions.state()
    }

    pub fn loading_state(&self) -> LoadingState {
        self.transitions.loading_state()
    }

    //--- Frame Driver -----------------------------------------------------

    /// Advances any transition, then ticks the active scene.
    ///
    /// Returns `true` if a scene was rendered.
    pub fn frame(&mut self, delta: f32) -> bool {
        self.transitions.update(&mut self.scene_manager, delta);
        self.scene_manager.tick(delta)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene_manager.resize(width, height);
    }

    pub fn set_quality_level(&mut self, level: QualityLevel) {
        self.scene_manager.set_quality_level(level);
    }

    //--- Teardown ---------------------------------------------------------

    /// Cancels any transition, drops observers and disposes every scene.
    pub fn dispose(&mut self) {
        self.transitions.dispose(&mut self.scene_manager);
        self.scene_manager.dispose();
        info!("Scene system disposed");
    }
}

impl<K: SceneKey> Default for SceneSystem<K> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::HeadlessRenderer;
    use crate::core::scene::testing::RecordingScene;
    use crate::core::scene::SceneState;
    use crate::core::section::Section;
    use crate::core::transition::Easing;
    use std::time::Duration;

    fn system() -> (SceneSystem<Section>, HeadlessRenderer) {
        let renderer = HeadlessRenderer::new();
        let mut system = SceneSystem::new();
        system
            .initialize(Box::new(renderer.clone()), Camera::default(), QualityLevel::Medium)
            .unwrap();
        system.scene_manager.register_scene(RecordingScene::new(Section::Home)).unwrap();
        system.scene_manager.register_scene(RecordingScene::new(Section::Resume)).unwrap();
        system.scene_manager.set_active_scene(Section::Home).unwrap();
        (system, renderer)
    }

    #[test]
    fn configure_applies_defaults() {
        let mut system = SceneSystem::<Section>::new();
        let config = SceneSystemConfig {
            max_frame_delta: 0.05,
            default_duration_ms: 200,
            default_easing: "linear".into(),
            ..Default::default()
        };
        system.configure(&config);

        assert_eq!(system.scene_manager.max_frame_delta(), 0.05);
        assert_eq!(system.default_options().duration, Duration::from_millis(200));
        assert_eq!(system.default_options().easing, Easing::Linear);
    }

    #[test]
    fn frame_advances_transition_then_renders() {
        let (mut system, renderer) = system();
        system.set_default_options(TransitionOptions::new().with_duration(Duration::ZERO));

        let handle = system.transition_to(Section::Resume).unwrap();
        assert!(system.frame(0.016));

        assert_eq!(handle.try_result(), Some(Ok(Section::Resume)));
        assert_eq!(system.scene_manager.active_section(), Some(Section::Resume));
        assert_eq!(renderer.frames_rendered(), 1);
    }

    #[test]
    fn current_target_prefers_in_flight_destination() {
        let (mut system, _renderer) = system();
        assert_eq!(system.current_target(), Some(Section::Home));

        system.transition_to(Section::Resume).unwrap();
        assert_eq!(system.current_target(), Some(Section::Resume));

        assert!(system.cancel_transition());
        assert_eq!(system.current_target(), Some(Section::Home));
    }

    #[test]
    fn dispose_cancels_and_releases_everything() {
        let (mut system, renderer) = system();
        system.transition_to(Section::Resume).unwrap();
        system.frame(0.016);

        system.dispose();

        assert!(!system.transitions.is_transitioning());
        assert!(!system.is_initialized());
        assert_eq!(renderer.live_resources(), 0);
        assert_eq!(system.scene_manager.scene_state(Section::Home), None);
    }

    #[test]
    fn loading_state_tracks_pipeline() {
        let (mut system, _renderer) = system();
        assert!(!system.loading_state().is_loading);

        system.transition_to(Section::Resume).unwrap();
        assert!(system.loading_state().is_loading);
        assert_eq!(system.transition_state().to, Some(Section::Resume));

        while system.transitions.is_transitioning() {
            system.frame(0.1);
        }
        assert!(!system.loading_state().is_loading);
        assert_eq!(
            system.scene_manager.scene_state(Section::Resume),
            Some(SceneState::Active)
        );
    }
}

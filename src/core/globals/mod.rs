//=========================================================================
// Global Scene System
//=========================================================================
//
// One SceneSystem for the whole process, reachable through a single
// accessor.
//
// Lifecycle:
//   scene_system()  → same Mutex<SceneSystem<Section>> every call
//   install(..)     → configure + initialize + register scenes
//                     returns SystemGuard
//   drop(guard)     → dispose (the system may be installed again)
//
// The guard is held by the application owner. Nothing is stashed on a
// global for teardown.
//
//=========================================================================

//=== Module Declarations =================================================

mod scene_system;

//=== External Dependencies ===============================================

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use log::{info, warn};

//=== Internal Dependencies ===============================================

use crate::core::config::SceneSystemConfig;
use crate::core::error::{TransitionError, TransitionResult};
use crate::core::render::camera::Camera;
use crate::core::render::Renderer;
use crate::core::scene::SceneManager;
use crate::core::section::Section;

//=== Public API ==========================================================

pub use scene_system::SceneSystem;

//=== Process-Wide Accessor ===============================================

static SCENE_SYSTEM: OnceLock<Mutex<SceneSystem<Section>>> = OnceLock::new();

/// The process-wide scene system, created on first access.
pub fn scene_system() -> &'static Mutex<SceneSystem<Section>> {
    SCENE_SYSTEM.get_or_init(|| Mutex::new(SceneSystem::new()))
}

/// Locks the process-wide scene system.
///
/// A panic while the lock was held does not make the system unusable;
/// the poisoned guard is recovered. Not reentrant: transition observers
/// run under this lock and must not call it.
pub fn lock_scene_system() -> MutexGuard<'static, SceneSystem<Section>> {
    scene_system().lock().unwrap_or_else(PoisonError::into_inner)
}

/// Serializes tests that touch the process-wide system.
#[cfg(test)]
pub(crate) static GLOBAL_TEST_LOCK: Mutex<()> = Mutex::new(());

//=== Installation ========================================================

/// Configures and initializes the process-wide system, then lets
/// `register` add scenes.
///
/// Fails if `config` does not validate or the system is already
/// installed. On a failed `register` the partially built system is
/// disposed again.
pub fn install<F>(
    config: &SceneSystemConfig,
    renderer: Box<dyn Renderer>,
    camera: Camera,
    register: F,
) -> TransitionResult<SystemGuard>
where
    F: FnOnce(&mut SceneManager<Section>) -> TransitionResult,
{
    config
        .validate()
        .map_err(|e| TransitionError::InvalidState(e.to_string()))?;

    let mut system = lock_scene_system();
    if system.is_initialized() {
        warn!("Scene system is already installed");
        return Err(TransitionError::InvalidState(
            "scene system is already installed".into(),
        ));
    }

    system.configure(config);
    system.initialize(renderer, camera, config.initial_quality)?;
    if let Err(e) = register(&mut system.scene_manager) {
        system.dispose();
        return Err(e);
    }

    info!(
        "Scene system installed with {} scenes",
        system.scene_manager.len()
    );
    Ok(SystemGuard { _private: () })
}

//=== SystemGuard =========================================================

/// Disposer returned by [`install`]. Dropping it disposes the system.
#[derive(Debug)]
pub struct SystemGuard {
    _private: (),
}

impl SystemGuard {
    /// Disposes now instead of at scope end.
    pub fn dispose(self) {}
}

impl Drop for SystemGuard {
    fn drop(&mut self) {
        lock_scene_system().dispose();
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

    fn register_home(manager: &mut SceneManager<Section>) -> TransitionResult {
        manager.register_scene(RecordingScene::new(Section::Home))?;
        manager.set_active_scene(Section::Home)
    }

    #[test]
    fn accessor_returns_same_instance() {
        assert!(std::ptr::eq(scene_system(), scene_system()));
    }

    #[test]
    fn install_dispose_and_reinstall() {
        let _serial = GLOBAL_TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let renderer = HeadlessRenderer::new();

        let guard = install(
            &SceneSystemConfig::default(),
            Box::new(renderer.clone()),
            Camera::default(),
            register_home,
        )
        .unwrap();
        assert!(lock_scene_system().frame(0.016));

        let second = install(
            &SceneSystemConfig::default(),
            Box::new(HeadlessRenderer::new()),
            Camera::default(),
            register_home,
        );
        assert!(matches!(second, Err(TransitionError::InvalidState(_))));

        guard.dispose();
        assert!(!lock_scene_system().is_initialized());
        assert!(renderer.is_disposed());
        assert_eq!(renderer.live_resources(), 0);

        let guard = install(
            &SceneSystemConfig::default(),
            Box::new(HeadlessRenderer::new()),
            Camera::default(),
            register_home,
        )
        .unwrap();
        drop(guard);
    }

    #[test]
    fn failed_registration_leaves_system_uninstalled() {
        let _serial = GLOBAL_TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);

        let result = install(
            &SceneSystemConfig::default(),
            Box::new(HeadlessRenderer::new()),
            Camera::default(),
            |manager| manager.set_active_scene(Section::Resume),
        );

        assert!(matches!(result, Err(TransitionError::Registration(_))));
        assert!(!lock_scene_system().is_initialized());
    }

    #[test]
    fn invalid_config_is_rejected_before_touching_the_system() {
        let _serial = GLOBAL_TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let config = SceneSystemConfig {
            max_frame_delta: 0.0,
            ..Default::default()
        };

        let result = install(
            &config,
            Box::new(HeadlessRenderer::new()),
            Camera::default(),
            register_home,
        );

        assert!(matches!(result, Err(TransitionError::InvalidState(_))));
        assert!(!lock_scene_system().is_initialized());
    }
}

//=========================================================================
// Scene Lifecycle
//=========================================================================
//
// Wraps a boxed Scene with the lifecycle state machine shared by every
// scene variant.
//
// States:
//   Uninitialized → Initializing → Initialized → Active ⇄ Inactive
//                                                      ↘
//                 (any non-disposed state) ──cleanup()──→ Disposed
//
// Warm-up:
//   A transition runs the target's activate hook before it becomes
//   current. The entry records this as `warmed` while its state stays
//   Initialized/Inactive, so only one scene is ever observed Active.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::RecvError;
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::{AssetLoad, Scene, SceneContext, SceneKey};
use crate::core::error::{LifecycleHook, SceneError, SceneResult};
use crate::core::quality::QualityLevel;
use crate::core::render::camera::Camera;
use crate::core::render::{Renderer, Viewport};

//=== SceneState ==========================================================

/// Lifecycle state of a registered scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneState {
    Uninitialized,
    Initializing,
    Initialized,
    Active,
    Inactive,
    Disposed,
}

impl SceneState {
    /// Returns `true` once `initialize` has completed and before disposal.
    pub fn is_initialized(self) -> bool {
        matches!(self, Self::Initialized | Self::Active | Self::Inactive)
    }
}

//=== SceneEntry ==========================================================

/// A registered scene together with its lifecycle bookkeeping.
pub struct SceneEntry<S: SceneKey> {
    scene: Box<dyn Scene<S>>,
    state: SceneState,
    warmed: bool,
    quality: QualityLevel,
}

impl<S: SceneKey> SceneEntry<S> {
    //--- Construction -----------------------------------------------------

    pub fn new(scene: Box<dyn Scene<S>>) -> Self {
        let quality = scene.default_quality_level();
        Self {
            scene,
            state: SceneState::Uninitialized,
            warmed: false,
            quality,
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn section(&self) -> S {
        self.scene.section()
    }

    pub fn name(&self) -> &str {
        self.scene.name()
    }

    /// Tier the scene currently runs at.
    pub fn quality(&self) -> QualityLevel {
        self.quality
    }

    /// `true` while the activate hook has run ahead of a pending swap.
    pub fn is_warmed(&self) -> bool {
        self.warmed
    }

    pub fn scene(&self) -> &dyn Scene<S> {
        self.scene.as_ref()
    }

    //--- Initialization ---------------------------------------------------

    /// Starts initialization by kicking off the asset load.
    ///
    /// Returns `Ok(None)` if the scene is already initialized, which makes
    /// a repeated call a no-op.
    pub fn begin_initialize(&mut self) -> SceneResult<Option<AssetLoad>> {
        match self.state {
            SceneState::Uninitialized => {
                debug!("Scene {} loading assets", self.section());
                self.state = SceneState::Initializing;
                Ok(Some(self.scene.load_assets()))
            }
            SceneState::Initialized | SceneState::Active | SceneState::Inactive => Ok(None),
            SceneState::Initializing | SceneState::Disposed => Err(self.invalid("initialize")),
        }
    }

    /// Runs the initialize hook once assets are available.
    pub fn finish_initialize(
        &mut self,
        renderer: &mut dyn Renderer,
        viewport: Viewport,
        global_quality: QualityLevel,
    ) -> SceneResult {
        if self.state != SceneState::Initializing {
            return Err(self.invalid("finish initialization"));
        }

        self.quality = global_quality.resolve(self.scene.supported_quality_levels());
        let mut ctx = SceneContext {
            renderer,
            viewport,
            quality: self.quality,
        };

        match self.scene.initialize(&mut ctx) {
            Ok(()) => {
                debug!("Scene {} initialized at {} quality", self.section(), self.quality);
                self.state = SceneState::Initialized;
                Ok(())
            }
            Err(e) => {
                self.state = SceneState::Uninitialized;
                Err(self.wrap(LifecycleHook::Initialize, e))
            }
        }
    }

    /// Returns an interrupted initialization to `Uninitialized`.
    pub fn abort_initialize(&mut self) {
        if self.state == SceneState::Initializing {
            debug!("Scene {} initialization aborted", self.section());
            self.state = SceneState::Uninitialized;
        }
    }

    /// Records a failed asset load and returns the entry to `Uninitialized`.
    pub fn fail_initialize(&mut self, reason: impl Into<String>) -> SceneError {
        self.abort_initialize();
        SceneError::AssetLoad {
            section: self.section().to_string(),
            reason: reason.into(),
        }
    }

    /// Initializes synchronously, waiting on a pending asset load.
    ///
    /// This is the startup path used outside transitions. It blocks the
    /// calling thread until the loader reports.
    pub fn initialize_blocking(
        &mut self,
        renderer: &mut dyn Renderer,
        viewport: Viewport,
        global_quality: QualityLevel,
    ) -> SceneResult {
        match self.begin_initialize()? {
            None => Ok(()),
            Some(AssetLoad::Ready) => self.finish_initialize(renderer, viewport, global_quality),
            Some(AssetLoad::Pending(receiver)) => match receiver.recv() {
                Ok(Ok(())) => self.finish_initialize(renderer, viewport, global_quality),
                Ok(Err(reason)) => Err(self.fail_initialize(reason)),
                Err(RecvError) => Err(self.fail_initialize("asset loader disconnected")),
            },
        }
    }

    //--- Activation -------------------------------------------------------

    /// Runs the activate hook ahead of the swap without becoming Active.
    pub fn warm_up(&mut self) -> SceneResult {
        match self.state {
            SceneState::Initialized | SceneState::Inactive if !self.warmed => {
                self.scene
                    .activate()
                    .map_err(|e| self.wrap(LifecycleHook::Activate, e))?;
                self.warmed = true;
                Ok(())
            }
            SceneState::Initialized | SceneState::Inactive => Ok(()),
            _ => Err(self.invalid("warm up")),
        }
    }

    /// Undoes a warm-up that will not be committed.
    pub fn cancel_warm_up(&mut self) {
        if !self.warmed {
            return;
        }
        self.warmed = false;
        if let Err(e) = self.scene.deactivate() {
            warn!("Scene {} failed to undo warm-up: {}", self.section(), e);
        }
    }

    /// Marks the scene Active, running the activate hook unless a warm-up
    /// already did.
    pub fn activate(&mut self) -> SceneResult {
        match self.state {
            SceneState::Initialized | SceneState::Inactive => {
                if !self.warmed {
                    self.scene
                        .activate()
                        .map_err(|e| self.wrap(LifecycleHook::Activate, e))?;
                }
                self.warmed = false;
                self.state = SceneState::Active;
                Ok(())
            }
            _ => Err(self.invalid("activate")),
        }
    }

    /// Moves an Active scene to Inactive.
    ///
    /// The state changes even if the hook fails; the hook error is still
    /// returned so the caller can log it.
    pub fn deactivate(&mut self) -> SceneResult {
        if self.state != SceneState::Active {
            return Err(self.invalid("deactivate"));
        }
        self.state = SceneState::Inactive;
        self.scene
            .deactivate()
            .map_err(|e| self.wrap(LifecycleHook::Deactivate, e))
    }

    /// Releases all resources. Subsequent calls are no-ops.
    pub fn cleanup(&mut self, renderer: &mut dyn Renderer) -> SceneResult {
        if self.state == SceneState::Disposed {
            return Ok(());
        }
        self.cancel_warm_up();
        self.state = SceneState::Disposed;
        self.scene
            .cleanup(renderer)
            .map_err(|e| self.wrap(LifecycleHook::Cleanup, e))
    }

    //--- Frame ------------------------------------------------------------

    /// Runs one frame: before_render → update → render → after_render.
    ///
    /// Returns `false` without touching the scene unless it is Active.
    pub fn frame(&mut self, delta: f32, renderer: &mut dyn Renderer, camera: &mut Camera) -> bool {
        if self.state != SceneState::Active {
            return false;
        }
        self.scene.before_render(camera);
        self.scene.update(delta, camera);
        self.scene.render(renderer, camera);
        self.scene.after_render();
        true
    }

    //--- Environment ------------------------------------------------------

    pub fn resize(&mut self, viewport: Viewport) {
        if self.state != SceneState::Disposed {
            self.scene.resize(viewport);
        }
    }

    /// Forwards a global tier change, resolved against supported tiers.
    pub fn set_quality(&mut self, global: QualityLevel, renderer: Option<&mut dyn Renderer>) {
        if self.state == SceneState::Disposed {
            return;
        }
        self.quality = global.resolve(self.scene.supported_quality_levels());
        let renderer = if self.state.is_initialized() { renderer } else { None };
        self.scene.on_quality_change(self.quality, renderer);
    }

    //--- Internal Helpers -------------------------------------------------

    fn invalid(&self, operation: &'static str) -> SceneError {
        SceneError::InvalidState {
            section: self.section().to_string(),
            operation,
            state: self.state,
        }
    }

    fn wrap(&self, hook: LifecycleHook, error: SceneError) -> SceneError {
        match error {
            SceneError::Lifecycle { .. } | SceneError::AssetLoad { .. } => error,
            other => SceneError::hook(self.section().to_string(), hook, other.to_string()),
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::HeadlessRenderer;
    use crate::core::scene::testing::{Failures, RecordingScene};
    use crate::core::section::Section;

    fn entry(scene: RecordingScene) -> SceneEntry<Section> {
        SceneEntry::new(Box::new(scene))
    }

    fn ready(entry: &mut SceneEntry<Section>, renderer: &mut HeadlessRenderer) {
        entry
            .initialize_blocking(renderer, Viewport::default(), QualityLevel::High)
            .unwrap();
    }

    #[test]
    fn new_entry_is_uninitialized() {
        let e = entry(RecordingScene::new(Section::Home));
        assert_eq!(e.state(), SceneState::Uninitialized);
        assert!(!e.state().is_initialized());
    }

    #[test]
    fn initialize_runs_once() {
        let scene = RecordingScene::new(Section::Home);
        let log = scene.log();
        let mut renderer = HeadlessRenderer::new();
        let mut e = entry(scene);

        ready(&mut e, &mut renderer);
        ready(&mut e, &mut renderer);

        assert_eq!(e.state(), SceneState::Initialized);
        assert_eq!(log.count("initialize"), 1);
    }

    #[test]
    fn initialize_while_initializing_is_rejected() {
        let mut e = entry(RecordingScene::new(Section::Home));
        assert!(e.begin_initialize().unwrap().is_some());
        let err = e.begin_initialize().unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[test]
    fn failed_initialize_returns_to_uninitialized() {
        let scene = RecordingScene::new(Section::Home).failing(Failures::INITIALIZE);
        let mut renderer = HeadlessRenderer::new();
        let mut e = entry(scene);

        let err = e
            .initialize_blocking(&mut renderer, Viewport::default(), QualityLevel::High)
            .unwrap_err();
        assert!(matches!(err, SceneError::Lifecycle { hook: LifecycleHook::Initialize, .. }));
        assert_eq!(e.state(), SceneState::Uninitialized);
    }

    #[test]
    fn activate_twice_is_rejected() {
        let mut renderer = HeadlessRenderer::new();
        let mut e = entry(RecordingScene::new(Section::Home));
        ready(&mut e, &mut renderer);

        e.activate().unwrap();
        assert_eq!(e.state(), SceneState::Active);
        assert!(e.activate().unwrap_err().is_invalid_state());
    }

    #[test]
    fn deactivate_requires_active() {
        let mut renderer = HeadlessRenderer::new();
        let mut e = entry(RecordingScene::new(Section::Home));
        ready(&mut e, &mut renderer);

        assert!(e.deactivate().unwrap_err().is_invalid_state());
        e.activate().unwrap();
        e.deactivate().unwrap();
        assert_eq!(e.state(), SceneState::Inactive);
        e.activate().unwrap();
        assert_eq!(e.state(), SceneState::Active);
    }

    #[test]
    fn activate_before_initialize_is_rejected() {
        let mut e = entry(RecordingScene::new(Section::Home));
        assert!(e.activate().unwrap_err().is_invalid_state());
    }

    #[test]
    fn warm_up_runs_hook_but_stays_inactive() {
        let scene = RecordingScene::new(Section::Resume);
        let log = scene.log();
        let mut renderer = HeadlessRenderer::new();
        let mut e = entry(scene);
        ready(&mut e, &mut renderer);

        e.warm_up().unwrap();
        assert_eq!(e.state(), SceneState::Initialized);
        assert!(e.is_warmed());

        e.activate().unwrap();
        assert_eq!(e.state(), SceneState::Active);
        assert!(!e.is_warmed());
        assert_eq!(log.count("activate"), 1);
    }

    #[test]
    fn cancel_warm_up_runs_deactivate_hook() {
        let scene = RecordingScene::new(Section::Resume);
        let log = scene.log();
        let mut renderer = HeadlessRenderer::new();
        let mut e = entry(scene);
        ready(&mut e, &mut renderer);

        e.warm_up().unwrap();
        e.cancel_warm_up();
        assert!(!e.is_warmed());
        assert_eq!(e.state(), SceneState::Initialized);
        assert_eq!(log.count("deactivate"), 1);

        // Nothing to undo the second time.
        e.cancel_warm_up();
        assert_eq!(log.count("deactivate"), 1);
    }

    #[test]
    fn failed_warm_up_is_not_recorded() {
        let scene = RecordingScene::new(Section::Resume).failing(Failures::ACTIVATE);
        let mut renderer = HeadlessRenderer::new();
        let mut e = entry(scene);
        ready(&mut e, &mut renderer);

        let err = e.warm_up().unwrap_err();
        assert!(matches!(err, SceneError::Lifecycle { hook: LifecycleHook::Activate, .. }));
        assert!(!e.is_warmed());
        assert_eq!(e.state(), SceneState::Initialized);
    }

    #[test]
    fn cleanup_is_idempotent() {
        let scene = RecordingScene::new(Section::Home);
        let log = scene.log();
        let mut renderer = HeadlessRenderer::new();
        let mut e = entry(scene);
        ready(&mut e, &mut renderer);
        assert!(renderer.live_resources() > 0);

        e.cleanup(&mut renderer).unwrap();
        e.cleanup(&mut renderer).unwrap();

        assert_eq!(e.state(), SceneState::Disposed);
        assert_eq!(log.count("cleanup"), 1);
        assert_eq!(renderer.live_resources(), 0);
    }

    #[test]
    fn disposed_scene_rejects_lifecycle_calls() {
        let mut renderer = HeadlessRenderer::new();
        let mut e = entry(RecordingScene::new(Section::Home));
        e.cleanup(&mut renderer).unwrap();

        assert!(e.begin_initialize().unwrap_err().is_invalid_state());
        assert!(e.activate().unwrap_err().is_invalid_state());
    }

    #[test]
    fn frame_only_runs_when_active() {
        let scene = RecordingScene::new(Section::Home);
        let log = scene.log();
        let mut renderer = HeadlessRenderer::new();
        let mut camera = Camera::default();
        let mut e = entry(scene);
        ready(&mut e, &mut renderer);

        assert!(!e.frame(0.016, &mut renderer, &mut camera));
        e.activate().unwrap();
        assert!(e.frame(0.016, &mut renderer, &mut camera));

        assert_eq!(
            log.events_after("activate"),
            vec!["before_render", "update", "render", "after_render"]
        );
        assert_eq!(renderer.frames_rendered(), 1);
    }

    #[test]
    fn quality_change_resolves_against_supported_levels() {
        let scene = RecordingScene::new(Section::Home)
            .with_levels(vec![QualityLevel::Low, QualityLevel::Medium]);
        let log = scene.log();
        let mut e = entry(scene);

        e.set_quality(QualityLevel::Ultra, None);
        assert_eq!(e.quality(), QualityLevel::Medium);
        assert_eq!(log.count("quality:medium"), 1);
    }

    #[test]
    fn pending_asset_load_completes_through_channel() {
        let (scene, loader) = RecordingScene::new(Section::Home).with_pending_load();
        let mut renderer = HeadlessRenderer::new();
        let mut e = entry(scene);

        loader.send(Ok(())).unwrap();
        ready(&mut e, &mut renderer);
        assert_eq!(e.state(), SceneState::Initialized);
    }

    #[test]
    fn dropped_loader_fails_initialization() {
        let (scene, loader) = RecordingScene::new(Section::Home).with_pending_load();
        let mut renderer = HeadlessRenderer::new();
        let mut e = entry(scene);
        drop(loader);

        let err = e
            .initialize_blocking(&mut renderer, Viewport::default(), QualityLevel::High)
            .unwrap_err();
        assert!(matches!(err, SceneError::AssetLoad { .. }));
        assert_eq!(e.state(), SceneState::Uninitialized);
    }
}

//=========================================================================
// Scene Manager
//=========================================================================
//
// Manages scene registration, the single active scene, and the shared
// rendering surface.
//
// Scenes are stored in a HashMap by key. Exactly one key may be marked
// active; set_active_scene() is the only place that pointer changes.
// Scenes keep their state between activations and are only disposed
// when the manager itself is disposed.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::{AssetLoad, Scene, SceneEntry, SceneKey, SceneState};
use crate::core::error::{SceneError, TransitionError, TransitionResult};
use crate::core::quality::{Capabilities, QualityLevel};
use crate::core::render::camera::{Camera, CameraConfig, Viewpoint};
use crate::core::render::{Renderer, Viewport};

/// Default ceiling for a single frame's delta, in seconds.
pub const DEFAULT_MAX_FRAME_DELTA: f32 = 0.1;

//=== Surface =============================================================

/// Renderer and camera bound by `initialize`.
struct Surface {
    renderer: Box<dyn Renderer>,
    camera: Camera,
}

//=== Scene Manager =======================================================

/// Registry of scenes and owner of the shared renderer and camera.
///
/// Render ticks reach the active scene only. Quality and resize events
/// reach every registered scene so inactive ones are ready when revisited.
pub struct SceneManager<S: SceneKey> {
    scenes: HashMap<S, SceneEntry<S>>,
    active: Option<S>,
    surface: Option<Surface>,
    quality: QualityLevel,
    viewport: Viewport,
    max_frame_delta: f32,
}

impl<S: SceneKey> SceneManager<S> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty manager with no surface bound.
    pub fn new() -> Self {
        Self {
            scenes: HashMap::new(),
            active: None,
            surface: None,
            quality: QualityLevel::default(),
            viewport: Viewport::default(),
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
        }
    }

    /// Sets the ceiling applied to `tick` deltas.
    ///
    /// # Panics
    ///
    /// Panics if `seconds <= 0.0`.
    pub fn with_max_frame_delta(mut self, seconds: f32) -> Self {
        self.set_max_frame_delta(seconds);
        self
    }

    /// # Panics
    ///
    /// Panics if `seconds <= 0.0`.
    pub fn set_max_frame_delta(&mut self, seconds: f32) {
        assert!(seconds > 0.0, "Max frame delta must be positive, got {}", seconds);
        self.max_frame_delta = seconds;
    }

    pub fn max_frame_delta(&self) -> f32 {
        self.max_frame_delta
    }

    /// Binds the renderer and camera.
    ///
    /// Fails if the manager is already initialized; call [`dispose`](Self::dispose)
    /// first to rebind.
    pub fn initialize(
        &mut self,
        renderer: Box<dyn Renderer>,
        camera: Camera,
        quality: QualityLevel,
    ) -> TransitionResult {
        if self.surface.is_some() {
            warn!("Scene manager initialize called twice");
            return Err(TransitionError::InvalidState(
                "scene manager is already initialized".into(),
            ));
        }

        let mut surface = Surface { renderer, camera };
        surface.renderer.set_viewport(self.viewport);
        surface.camera.set_viewport_size(self.viewport.width, self.viewport.height);
        self.surface = Some(surface);

        info!("Scene manager initialized ({} quality)", quality);
        self.set_quality_level(quality);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.surface.is_some()
    }

    //--- Registration -----------------------------------------------------

    /// Registers a scene under its own section key.
    ///
    /// Registration does not initialize or activate the scene. A second
    /// scene for the same section is rejected and the first one is kept.
    pub fn register_scene<T>(&mut self, scene: T) -> TransitionResult
    where
        T: Scene<S> + 'static,
    {
        self.register_boxed(Box::new(scene))
    }

    /// Registers an already boxed scene.
    pub fn register_boxed(&mut self, scene: Box<dyn Scene<S>>) -> TransitionResult {
        let key = scene.section();
        if self.scenes.contains_key(&key) {
            warn!("Scene {} is already registered, rejecting duplicate", key);
            return Err(TransitionError::DuplicateScene(key.to_string()));
        }

        debug!("Registered scene {} ({})", key, scene.name());
        self.scenes.insert(key, SceneEntry::new(scene));
        Ok(())
    }

    /// Registers a scene only if the host provides what it requires.
    ///
    /// Returns `Ok(false)` when the scene was skipped.
    pub fn register_if_supported<T>(&mut self, scene: T, host: Capabilities) -> TransitionResult<bool>
    where
        T: Scene<S> + 'static,
    {
        if !host.satisfies(scene.required_capabilities()) {
            info!(
                "Skipping scene {}: host lacks {:?}",
                scene.section(),
                scene.required_capabilities()
            );
            return Ok(false);
        }
        self.register_scene(scene).map(|()| true)
    }

    //--- Queries ----------------------------------------------------------

    pub fn get_scene(&self, key: S) -> Option<&SceneEntry<S>> {
        self.scenes.get(&key)
    }

    pub fn scene_state(&self, key: S) -> Option<SceneState> {
        self.scenes.get(&key).map(SceneEntry::state)
    }

    pub fn contains(&self, key: S) -> bool {
        self.scenes.contains_key(&key)
    }

    pub fn sections(&self) -> impl Iterator<Item = S> + '_ {
        self.scenes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn active_section(&self) -> Option<S> {
        self.active
    }

    pub fn active_scene(&self) -> Option<&SceneEntry<S>> {
        self.active.and_then(|key| self.scenes.get(&key))
    }

    pub fn quality_level(&self) -> QualityLevel {
        self.quality
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.surface.as_ref().map(|s| &s.camera)
    }

    pub fn camera_config(&self, key: S) -> Option<CameraConfig> {
        self.scenes.get(&key).map(|entry| entry.scene().camera_config())
    }

    //--- Activation -------------------------------------------------------

    /// Makes `key` the active scene.
    ///
    /// Initializes the target first if needed, then deactivates the current
    /// scene and activates the target. If the target's activation fails the
    /// previous scene is reactivated, so a failed call never leaves the
    /// manager without its former active scene.
    pub fn set_active_scene(&mut self, key: S) -> TransitionResult {
        let Some(surface) = self.surface.as_mut() else {
            return Err(TransitionError::InvalidState(
                "scene manager is not initialized".into(),
            ));
        };
        let Some(target) = self.scenes.get_mut(&key) else {
            warn!("Attempted to activate unregistered scene {}", key);
            return Err(TransitionError::Registration(key.to_string()));
        };

        if self.active == Some(key) && target.state() == SceneState::Active {
            debug!("Scene {} is already active", key);
            return Ok(());
        }

        target
            .initialize_blocking(surface.renderer.as_mut(), self.viewport, self.quality)
            .map_err(Self::lifecycle_failure)?;

        let previous = self.active.take();
        if let Some(prev) = previous {
            if let Some(entry) = self.scenes.get_mut(&prev) {
                if let Err(e) = entry.deactivate() {
                    error!("Scene {} failed to deactivate: {}", prev, e);
                }
            }
        }

        let target = self
            .scenes
            .get_mut(&key)
            .ok_or_else(|| TransitionError::Registration(key.to_string()))?;

        if let Err(e) = target.activate() {
            if let Some(prev) = previous {
                if let Some(entry) = self.scenes.get_mut(&prev) {
                    match entry.activate() {
                        Ok(()) => self.active = Some(prev),
                        Err(re) => error!("Scene {} failed to reactivate: {}", prev, re),
                    }
                }
            }
            return Err(Self::lifecycle_failure(e));
        }

        let config = target.scene().camera_config();
        surface.camera.apply(&config);
        self.active = Some(key);

        match previous {
            Some(prev) => info!("Active scene {} -> {}", prev, key),
            None => info!("Active scene -> {}", key),
        }
        Ok(())
    }

    //--- Transition Pipeline Support --------------------------------------

    /// Starts initialization of `key` if it has never been initialized.
    ///
    /// Returns `Ok(None)` when the scene is already initialized.
    pub fn begin_load(&mut self, key: S) -> TransitionResult<Option<AssetLoad>> {
        self.entry_mut(key)?
            .begin_initialize()
            .map_err(Self::lifecycle_failure)
    }

    /// Completes initialization once assets have arrived.
    pub fn finish_load(&mut self, key: S) -> TransitionResult {
        let Some(surface) = self.surface.as_mut() else {
            return Err(TransitionError::InvalidState(
                "scene manager is not initialized".into(),
            ));
        };
        let entry = self
            .scenes
            .get_mut(&key)
            .ok_or_else(|| TransitionError::Registration(key.to_string()))?;
        entry
            .finish_initialize(surface.renderer.as_mut(), self.viewport, self.quality)
            .map_err(Self::lifecycle_failure)
    }

    /// Records a failed asset load for `key`.
    pub fn fail_load(&mut self, key: S, reason: &str) -> TransitionError {
        match self.scenes.get_mut(&key) {
            Some(entry) => Self::lifecycle_failure(entry.fail_initialize(reason)),
            None => TransitionError::Registration(key.to_string()),
        }
    }

    /// Returns a scene whose load was interrupted to `Uninitialized`.
    pub fn abort_load(&mut self, key: S) {
        if let Some(entry) = self.scenes.get_mut(&key) {
            entry.abort_initialize();
        }
    }

    /// Runs the target's activate hook ahead of the swap.
    pub fn warm_up(&mut self, key: S) -> TransitionResult {
        self.entry_mut(key)?.warm_up().map_err(Self::lifecycle_failure)
    }

    pub fn cancel_warm_up(&mut self, key: S) {
        if let Some(entry) = self.scenes.get_mut(&key) {
            entry.cancel_warm_up();
        }
    }

    /// Moves the shared camera along the path between two viewpoints.
    ///
    /// `t` is not clamped so overshooting easings carry through.
    pub fn interpolate_camera(&mut self, from: &Viewpoint, to: &Viewpoint, t: f32) {
        self.set_camera_viewpoint(from.lerp(to, t));
    }

    /// Places the shared camera without touching its projection.
    pub fn set_camera_viewpoint(&mut self, viewpoint: Viewpoint) {
        if let Some(surface) = self.surface.as_mut() {
            surface.camera.set_viewpoint(viewpoint);
        }
    }

    //--- Environment ------------------------------------------------------

    /// Stores the global tier and forwards it to the renderer and to
    /// every registered scene.
    pub fn set_quality_level(&mut self, level: QualityLevel) {
        self.quality = level;
        debug!("Quality level set to {}", level);

        if let Some(surface) = self.surface.as_mut() {
            surface.renderer.set_quality(level.settings());
        }
        for entry in self.scenes.values_mut() {
            match self.surface.as_mut() {
                Some(surface) => entry.set_quality(level, Some(surface.renderer.as_mut())),
                None => entry.set_quality(level, None),
            }
        }
    }

    /// Updates the shared viewport and forwards it to every scene.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            trace!("Ignoring degenerate resize {}x{}", width, height);
            return;
        }
        self.viewport = Viewport::new(width, height);

        if let Some(surface) = self.surface.as_mut() {
            surface.camera.set_viewport_size(width, height);
            surface.renderer.set_viewport(self.viewport);
        }
        for entry in self.scenes.values_mut() {
            entry.resize(self.viewport);
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Runs one frame on the active scene.
    ///
    /// `delta` is in seconds; negative or non-finite values become zero
    /// and large values are clamped. Returns `true` if a scene was ticked.
    pub fn tick(&mut self, delta: f32) -> bool {
        let delta = self.clamp_delta(delta);
        let (Some(key), Some(surface)) = (self.active, self.surface.as_mut()) else {
            return false;
        };
        let Some(entry) = self.scenes.get_mut(&key) else {
            return false;
        };

        entry.frame(delta, surface.renderer.as_mut(), &mut surface.camera)
    }

    fn clamp_delta(&self, delta: f32) -> f32 {
        if !delta.is_finite() || delta < 0.0 {
            return 0.0;
        }
        if delta > self.max_frame_delta {
            trace!("Clamping frame delta {:.3}s to {:.3}s", delta, self.max_frame_delta);
            return self.max_frame_delta;
        }
        delta
    }

    //--- Teardown ---------------------------------------------------------

    /// Cleans up every scene, clears the registry and releases the surface.
    ///
    /// The manager may be initialized again afterwards.
    pub fn dispose(&mut self) {
        info!("Disposing scene manager ({} scenes)", self.scenes.len());

        match self.surface.as_mut() {
            Some(surface) => {
                for (key, entry) in self.scenes.iter_mut() {
                    if let Err(e) = entry.cleanup(surface.renderer.as_mut()) {
                        error!("Scene {} failed to clean up: {}", key, e);
                    }
                }
                surface.renderer.dispose();
            }
            None => {
                if self.scenes.values().any(|e| e.state().is_initialized()) {
                    warn!("Disposing initialized scenes without a renderer");
                }
            }
        }

        self.scenes.clear();
        self.active = None;
        self.surface = None;
    }

    //--- Internal Helpers -------------------------------------------------

    fn entry_mut(&mut self, key: S) -> TransitionResult<&mut SceneEntry<S>> {
        self.scenes
            .get_mut(&key)
            .ok_or_else(|| TransitionError::Registration(key.to_string()))
    }

    fn lifecycle_failure(error: SceneError) -> TransitionError {
        error!("{}", error);
        TransitionError::Lifecycle(error)
    }
}

impl<S: SceneKey> Default for SceneManager<S> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Tests ===============================================================

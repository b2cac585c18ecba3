//=========================================================================
// Test Scene
//=========================================================================
//
// Scene double that records every hook call and can be told to fail.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::{Arc, Mutex};

use crossbeam_channel::{bounded, Receiver, Sender};

//=== Internal Dependencies ===============================================

use super::{AssetLoad, Scene, SceneContext};
use crate::core::error::{LifecycleHook, SceneError, SceneResult};
use crate::core::quality::{Capabilities, QualityLevel};
use crate::core::render::camera::{Camera, CameraConfig};
use crate::core::render::{Renderer, ResourceDesc, ResourceSet, Viewport};
use crate::core::section::Section;

//=== EventLog ============================================================

/// Shared, cloneable record of hook calls.
#[derive(Clone, Default)]
pub(crate) struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, event: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == event).count()
    }

    /// Events recorded after the last occurrence of `marker`.
    pub(crate) fn events_after(&self, marker: &str) -> Vec<String> {
        let events = self.events();
        match events.iter().rposition(|e| e == marker) {
            Some(pos) => events[pos + 1..].to_vec(),
            None => Vec::new(),
        }
    }
}

//=== Failures ============================================================

/// Hooks a [`RecordingScene`] should fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Failures(u8);

impl Failures {
    pub(crate) const INITIALIZE: Failures = Failures(1);
    pub(crate) const ACTIVATE: Failures = Failures(1 << 1);
    pub(crate) const DEACTIVATE: Failures = Failures(1 << 2);
    pub(crate) const CLEANUP: Failures = Failures(1 << 3);

    fn contains(self, other: Failures) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Failures {
    type Output = Failures;

    fn bitor(self, rhs: Failures) -> Failures {
        Failures(self.0 | rhs.0)
    }
}

//=== RecordingScene ======================================================

pub(crate) struct RecordingScene {
    section: Section,
    log: EventLog,
    failures: Failures,
    levels: Vec<QualityLevel>,
    requires: Capabilities,
    camera: CameraConfig,
    pending: Option<Receiver<Result<(), String>>>,
    resources: ResourceSet,
}

impl RecordingScene {
    pub(crate) fn new(section: Section) -> Self {
        Self {
            section,
            log: EventLog::default(),
            failures: Failures::default(),
            levels: QualityLevel::ALL.to_vec(),
            requires: Capabilities::default(),
            camera: CameraConfig::default(),
            pending: None,
            resources: ResourceSet::new(),
        }
    }

    pub(crate) fn log(&self) -> EventLog {
        self.log.clone()
    }

    pub(crate) fn failing(mut self, failures: Failures) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn with_levels(mut self, levels: Vec<QualityLevel>) -> Self {
        self.levels = levels;
        self
    }

    pub(crate) fn requiring(mut self, requires: Capabilities) -> Self {
        self.requires = requires;
        self
    }

    pub(crate) fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    /// Makes the asset load pending until the returned sender reports.
    pub(crate) fn with_pending_load(mut self) -> (Self, Sender<Result<(), String>>) {
        let (tx, rx) = bounded(1);
        self.pending = Some(rx);
        (self, tx)
    }

    fn hook(&self, hook: LifecycleHook, failure: Failures) -> SceneResult {
        self.log.push(hook.to_string());
        if self.failures.contains(failure) {
            Err(SceneError::hook(self.section.to_string(), hook, "injected failure"))
        } else {
            Ok(())
        }
    }
}

impl Scene<Section> for RecordingScene {
    fn section(&self) -> Section {
        self.section
    }

    fn name(&self) -> &str {
        self.section.title()
    }

    fn camera_config(&self) -> CameraConfig {
        self.camera
    }

    fn supported_quality_levels(&self) -> &[QualityLevel] {
        &self.levels
    }

    fn required_capabilities(&self) -> Capabilities {
        self.requires
    }

    fn load_assets(&mut self) -> AssetLoad {
        self.log.push("load_assets");
        match &self.pending {
            Some(receiver) => AssetLoad::Pending(receiver.clone()),
            None => AssetLoad::Ready,
        }
    }

    fn initialize(&mut self, ctx: &mut SceneContext<'_>) -> SceneResult {
        self.hook(LifecycleHook::Initialize, Failures::INITIALIZE)?;
        self.pending = None;
        self.resources.allocate(ctx.renderer, ResourceDesc::Geometry { label: "test", vertices: 3 });
        self.resources.allocate(ctx.renderer, ResourceDesc::Material { label: "test" });
        Ok(())
    }

    fn activate(&mut self) -> SceneResult {
        self.hook(LifecycleHook::Activate, Failures::ACTIVATE)
    }

    fn deactivate(&mut self) -> SceneResult {
        self.hook(LifecycleHook::Deactivate, Failures::DEACTIVATE)
    }

    fn cleanup(&mut self, renderer: &mut dyn Renderer) -> SceneResult {
        self.resources.release_all(renderer);
        self.hook(LifecycleHook::Cleanup, Failures::CLEANUP)
    }

    fn update(&mut self, _delta: f32, _camera: &mut Camera) {
        self.log.push("update");
    }

    fn before_render(&mut self, _camera: &Camera) {
        self.log.push("before_render");
    }

    fn render(&self, renderer: &mut dyn Renderer, camera: &Camera) {
        self.log.push("render");
        renderer.render(camera, self.resources.handles());
    }

    fn after_render(&mut self) {
        self.log.push("after_render");
    }

    fn resize(&mut self, viewport: Viewport) {
        self.log.push(format!("resize:{}x{}", viewport.width, viewport.height));
    }

    fn on_quality_change(&mut self, level: QualityLevel, _renderer: Option<&mut dyn Renderer>) {
        self.log.push(format!("quality:{}", level));
    }
}

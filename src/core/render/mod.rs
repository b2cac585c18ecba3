//=========================================================================
// Render Surface
//=========================================================================
//
// The shared rendering surface owned by the SceneManager.
//
// Architecture:
//   SceneManager
//     ├─ renderer: Box<dyn Renderer>   (allocate/release, viewport, draw)
//     └─ camera:   Camera
//
//   Scene ──allocate()──> ResourceHandle ──stored in──> ResourceSet
//   Scene::cleanup() ──ResourceSet::release_all()──> Renderer::release()
//
// GPU resources are created through the renderer so that their lifetime
// can be accounted for. The headless renderer keeps a live count that
// tests use to verify cleanup releases everything.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod camera;

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::quality::QualitySettings;
use camera::Camera;

//=== Public API ==========================================================

pub use camera::{CameraConfig, Projection, Viewpoint};

//=== Viewport ============================================================

/// Size of the drawing surface in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

//=== GPU Resources =======================================================

/// Opaque handle to a renderer-owned GPU resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceHandle(u64);

impl ResourceHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Kind of light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    Ambient,
    Directional,
    Point,
}

/// Description of a GPU resource to allocate.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceDesc {
    Geometry { label: &'static str, vertices: u32 },
    Material { label: &'static str },
    Light { kind: LightKind, casts_shadow: bool },
    Texture { label: &'static str, size: u32 },
}

//=== Renderer Trait ======================================================

/// The rendering backend bound to the canvas.
///
/// Implemented by the host. The core only needs allocation, viewport and
/// quality control, and a draw call per frame.
pub trait Renderer: Send {
    /// Creates a GPU resource and returns its handle.
    fn allocate(&mut self, desc: ResourceDesc) -> ResourceHandle;

    /// Releases a GPU resource. Unknown handles are ignored.
    fn release(&mut self, handle: ResourceHandle);

    /// Resizes the drawing buffer.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Applies tier-derived settings (pixel ratio, shadows, antialiasing).
    fn set_quality(&mut self, settings: QualitySettings);

    /// Draws the given resources from the camera's point of view.
    fn render(&mut self, camera: &Camera, visible: &[ResourceHandle]);

    /// Tears down the backend. Called once by `SceneManager::dispose`.
    fn dispose(&mut self) {}
}

//=== ResourceSet =========================================================

/// GPU resources exclusively owned by one scene.
#[derive(Debug, Default)]
pub struct ResourceSet {
    handles: Vec<ResourceHandle>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a resource and records ownership of it.
    pub fn allocate(&mut self, renderer: &mut dyn Renderer, desc: ResourceDesc) -> ResourceHandle {
        let handle = renderer.allocate(desc);
        self.handles.push(handle);
        handle
    }

    /// Releases a single owned resource.
    pub fn release(&mut self, renderer: &mut dyn Renderer, handle: ResourceHandle) {
        if let Some(pos) = self.handles.iter().position(|&h| h == handle) {
            self.handles.swap_remove(pos);
            renderer.release(handle);
        }
    }

    /// Releases every owned resource.
    pub fn release_all(&mut self, renderer: &mut dyn Renderer) {
        for handle in self.handles.drain(..) {
            renderer.release(handle);
        }
    }

    pub fn handles(&self) -> &[ResourceHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

//=== HeadlessRenderer ====================================================

#[derive(Debug, Default)]
struct HeadlessState {
    next_id: u64,
    live: HashSet<ResourceHandle>,
    viewport: Viewport,
    settings: Option<QualitySettings>,
    frames_rendered: u64,
    last_draw_count: usize,
    disposed: bool,
}

/// Renderer that draws nothing but tracks every call.
///
/// Clones share the same state, so a clone kept by the host (or a test)
/// observes what the manager's boxed copy does.
#[derive(Debug, Clone, Default)]
pub struct HeadlessRenderer {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HeadlessState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of allocated, not yet released resources.
    pub fn live_resources(&self) -> usize {
        self.state().live.len()
    }

    pub fn viewport(&self) -> Viewport {
        self.state().viewport
    }

    pub fn settings(&self) -> Option<QualitySettings> {
        self.state().settings
    }

    pub fn frames_rendered(&self) -> u64 {
        self.state().frames_rendered
    }

    pub fn last_draw_count(&self) -> usize {
        self.state().last_draw_count
    }

    pub fn is_disposed(&self) -> bool {
        self.state().disposed
    }
}

impl Renderer for HeadlessRenderer {
    fn allocate(&mut self, desc: ResourceDesc) -> ResourceHandle {
        let mut state = self.state();
        state.next_id += 1;
        let handle = ResourceHandle(state.next_id);
        trace!("Allocated {:?} as {:?}", desc, handle);
        state.live.insert(handle);
        handle
    }

    fn release(&mut self, handle: ResourceHandle) {
        if !self.state().live.remove(&handle) {
            warn!("Release of unknown resource {:?}", handle);
        }
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.state().viewport = viewport;
    }

    fn set_quality(&mut self, settings: QualitySettings) {
        self.state().settings = Some(settings);
    }

    fn render(&mut self, _camera: &Camera, visible: &[ResourceHandle]) {
        let mut state = self.state();
        state.frames_rendered += 1;
        state.last_draw_count = visible.len();
    }

    fn dispose(&mut self) {
        let mut state = self.state();
        if !state.live.is_empty() {
            debug!("Headless renderer disposed with {} live resources", state.live.len());
        }
        state.live.clear();
        state.disposed = true;
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::quality::QualityLevel;

    #[test]
    fn resource_set_tracks_and_releases() {
        let mut renderer = HeadlessRenderer::new();
        let mut set = ResourceSet::new();

        set.allocate(&mut renderer, ResourceDesc::Material { label: "a" });
        let geo = set.allocate(&mut renderer, ResourceDesc::Geometry { label: "b", vertices: 8 });
        assert_eq!(set.len(), 2);
        assert_eq!(renderer.live_resources(), 2);

        set.release(&mut renderer, geo);
        assert_eq!(set.len(), 1);
        assert_eq!(renderer.live_resources(), 1);

        set.release_all(&mut renderer);
        assert!(set.is_empty());
        assert_eq!(renderer.live_resources(), 0);
    }

    #[test]
    fn releasing_foreign_handle_is_ignored_by_set() {
        let mut renderer = HeadlessRenderer::new();
        let mut set = ResourceSet::new();
        let foreign = renderer.allocate(ResourceDesc::Texture { label: "t", size: 64 });

        set.release(&mut renderer, foreign);
        assert_eq!(renderer.live_resources(), 1);
    }

    #[test]
    fn headless_records_frames_and_settings() {
        let mut renderer = HeadlessRenderer::new();
        let camera = Camera::default();
        let h = renderer.allocate(ResourceDesc::Light { kind: LightKind::Point, casts_shadow: false });

        renderer.set_quality(QualityLevel::Low.settings());
        renderer.set_viewport(Viewport::new(640, 480));
        renderer.render(&camera, &[h]);

        assert_eq!(renderer.frames_rendered(), 1);
        assert_eq!(renderer.last_draw_count(), 1);
        assert_eq!(renderer.viewport(), Viewport::new(640, 480));
        assert_eq!(renderer.settings(), Some(QualityLevel::Low.settings()));
    }

    #[test]
    fn handles_are_unique() {
        let mut renderer = HeadlessRenderer::new();
        let a = renderer.allocate(ResourceDesc::Material { label: "a" });
        let b = renderer.allocate(ResourceDesc::Material { label: "a" });
        assert_ne!(a, b);
        assert_ne!(a.id(), b.id());
    }
}

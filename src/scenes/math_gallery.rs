//=========================================================================
// Math Gallery Scene
//=========================================================================
//
// Rotating parametric surfaces. The gallery cycles to the next surface
// after a fixed dwell time; mesh resolution follows the quality tier.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::f32::consts::TAU;

use glam::Vec3;

//=== Internal Dependencies ===============================================

use crate::core::error::SceneResult;
use crate::core::quality::QualityLevel;
use crate::core::render::camera::{Camera, CameraConfig};
use crate::core::render::{LightKind, Renderer, ResourceDesc, ResourceHandle, ResourceSet};
use crate::core::scene::{Scene, SceneContext};
use crate::core::section::Section;

/// Seconds each surface stays on display.
const DWELL_SECONDS: f32 = 8.0;
const ROTATION_SPEED: f32 = 0.4;

//=== Surface =============================================================

/// A parametric surface sampled over `(u, v)` in `[0, 1]²`.
///
/// Every surface shares one mesh topology, so cycling only changes the
/// vertex positions the scene streams in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Ripple,
    Saddle,
    Torus,
}

impl Surface {
    pub const ALL: [Surface; 3] = [Self::Ripple, Self::Saddle, Self::Torus];

    /// Point on the surface at `(u, v)`.
    pub fn sample(self, u: f32, v: f32) -> Vec3 {
        match self {
            Self::Ripple => {
                let x = (u - 0.5) * 8.0;
                let z = (v - 0.5) * 8.0;
                let r = (x * x + z * z).sqrt();
                Vec3::new(x, (r * 2.0).sin() / (1.0 + r), z)
            }
            Self::Saddle => {
                let x = (u - 0.5) * 4.0;
                let z = (v - 0.5) * 4.0;
                Vec3::new(x, (x * x - z * z) * 0.25, z)
            }
            Self::Torus => {
                const MAJOR: f32 = 2.0;
                const MINOR: f32 = 0.75;
                let (theta, phi) = (u * TAU, v * TAU);
                let ring = MAJOR + MINOR * phi.cos();
                Vec3::new(ring * theta.cos(), MINOR * phi.sin(), ring * theta.sin())
            }
        }
    }

    pub fn next(self) -> Surface {
        match self {
            Self::Ripple => Self::Saddle,
            Self::Saddle => Self::Torus,
            Self::Torus => Self::Ripple,
        }
    }
}

fn resolution(level: QualityLevel) -> u32 {
    match level {
        QualityLevel::Low => 16,
        QualityLevel::Medium => 32,
        QualityLevel::High => 64,
        QualityLevel::Ultra => 128,
    }
}

//=== MathGalleryScene ====================================================

pub struct MathGalleryScene {
    resources: ResourceSet,
    mesh: Option<ResourceHandle>,
    surface: Surface,
    resolution: u32,
    rotation: f32,
    dwell: f32,
    paused: bool,
}

impl MathGalleryScene {
    pub fn new() -> Self {
        Self {
            resources: ResourceSet::new(),
            mesh: None,
            surface: Surface::Ripple,
            resolution: resolution(QualityLevel::High),
            rotation: 0.0,
            dwell: 0.0,
            paused: true,
        }
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    /// Grid cells per side of the current mesh.
    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Samples the current surface on the mesh grid, rotated about Y.
    pub fn vertices(&self) -> Vec<Vec3> {
        let n = self.resolution;
        let (sin, cos) = self.rotation.sin_cos();
        let mut out = Vec::with_capacity(((n + 1) * (n + 1)) as usize);
        for j in 0..=n {
            for i in 0..=n {
                let p = self.surface.sample(i as f32 / n as f32, j as f32 / n as f32);
                out.push(Vec3::new(p.x * cos + p.z * sin, p.y, p.z * cos - p.x * sin));
            }
        }
        out
    }

    fn mesh_desc(&self) -> ResourceDesc {
        ResourceDesc::Geometry {
            label: "parametric_surface",
            vertices: (self.resolution + 1) * (self.resolution + 1),
        }
    }

    fn rebuild_mesh(&mut self, renderer: &mut dyn Renderer) {
        if let Some(old) = self.mesh.take() {
            self.resources.release(renderer, old);
        }
        self.mesh = Some(self.resources.allocate(renderer, self.mesh_desc()));
    }
}

impl Default for MathGalleryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<Section> for MathGalleryScene {
    fn section(&self) -> Section {
        Section::MathGallery
    }

    fn name(&self) -> &str {
        "Math Gallery"
    }

    fn camera_config(&self) -> CameraConfig {
        CameraConfig::perspective(Vec3::new(6.0, 4.0, 6.0), Vec3::ZERO)
    }

    fn initialize(&mut self, ctx: &mut SceneContext<'_>) -> SceneResult {
        self.resolution = resolution(ctx.quality);
        self.rebuild_mesh(ctx.renderer);
        self.resources
            .allocate(ctx.renderer, ResourceDesc::Material { label: "surface_normals" });
        self.resources.allocate(
            ctx.renderer,
            ResourceDesc::Light { kind: LightKind::Point, casts_shadow: false },
        );
        Ok(())
    }

    fn activate(&mut self) -> SceneResult {
        self.paused = false;
        Ok(())
    }

    fn deactivate(&mut self) -> SceneResult {
        self.paused = true;
        Ok(())
    }

    fn cleanup(&mut self, renderer: &mut dyn Renderer) -> SceneResult {
        self.resources.release_all(renderer);
        self.mesh = None;
        Ok(())
    }

    fn update(&mut self, delta: f32, _camera: &mut Camera) {
        if self.paused {
            return;
        }
        self.rotation = (self.rotation + ROTATION_SPEED * delta) % TAU;
        self.dwell += delta;
        if self.dwell >= DWELL_SECONDS {
            self.dwell -= DWELL_SECONDS;
            self.surface = self.surface.next();
        }
    }

    fn render(&self, renderer: &mut dyn Renderer, camera: &Camera) {
        renderer.render(camera, self.resources.handles());
    }

    fn on_quality_change(&mut self, level: QualityLevel, renderer: Option<&mut dyn Renderer>) {
        let resolution = resolution(level);
        if resolution == self.resolution {
            return;
        }
        self.resolution = resolution;
        if let (Some(renderer), true) = (renderer, self.mesh.is_some()) {
            self.rebuild_mesh(renderer);
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{HeadlessRenderer, Viewport};
    use approx::assert_relative_eq;

    #[test]
    fn saddle_is_flat_along_diagonals() {
        let p = Surface::Saddle.sample(0.75, 0.75);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn torus_points_stay_within_tube() {
        for (u, v) in [(0.0, 0.0), (0.3, 0.6), (0.9, 0.25)] {
            let p = Surface::Torus.sample(u, v);
            let ring = Vec3::new(p.x, 0.0, p.z).length();
            let tube = Vec3::new(ring - 2.0, p.y, 0.0).length();
            assert_relative_eq!(tube, 0.75, epsilon = 1e-4);
        }
    }

    #[test]
    fn surfaces_cycle_after_dwell() {
        let mut scene = MathGalleryScene::new();
        let mut camera = Camera::default();
        scene.activate().unwrap();

        for _ in 0..9 {
            scene.update(1.0, &mut camera);
        }
        assert_eq!(scene.surface(), Surface::Saddle);
    }

    #[test]
    fn quality_sets_mesh_resolution() {
        let mut renderer = HeadlessRenderer::new();
        let mut scene = MathGalleryScene::new();
        let mut ctx = SceneContext {
            renderer: &mut renderer,
            viewport: Viewport::default(),
            quality: QualityLevel::Low,
        };
        scene.initialize(&mut ctx).unwrap();
        assert_eq!(scene.vertices().len(), 17 * 17);

        let live = renderer.live_resources();
        scene.on_quality_change(QualityLevel::High, Some(&mut renderer));
        assert_eq!(scene.resolution(), 64);
        assert_eq!(renderer.live_resources(), live);

        scene.cleanup(&mut renderer).unwrap();
        assert_eq!(renderer.live_resources(), 0);
    }
}

//=========================================================================
// Shader Playground Scene
//=========================================================================
//
// A full-screen quad running one of a few fragment-shader presets. The
// scene feeds `time` and `resolution` uniforms each frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Vec2, Vec3};
use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::error::SceneResult;
use crate::core::quality::{Capabilities, QualityLevel};
use crate::core::render::camera::{Camera, CameraConfig};
use crate::core::render::{Renderer, ResourceDesc, ResourceHandle, ResourceSet, Viewport};
use crate::core::scene::{Scene, SceneContext};
use crate::core::section::Section;

//=== ShaderPreset ========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderPreset {
    #[default]
    Plasma,
    Mandelbrot,
    Raymarch,
}

impl ShaderPreset {
    pub const ALL: [ShaderPreset; 3] = [Self::Plasma, Self::Mandelbrot, Self::Raymarch];

    fn material_label(self) -> &'static str {
        match self {
            Self::Plasma => "shader_plasma",
            Self::Mandelbrot => "shader_mandelbrot",
            Self::Raymarch => "shader_raymarch",
        }
    }

    pub fn next(self) -> ShaderPreset {
        let index = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

//=== Uniforms ============================================================

/// Values fed to the fragment shader each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    pub time: f32,
    /// Drawing-buffer size in pixels, scaled by the tier's pixel ratio.
    pub resolution: Vec2,
}

//=== ShaderPlaygroundScene ===============================================

pub struct ShaderPlaygroundScene {
    resources: ResourceSet,
    material: Option<ResourceHandle>,
    preset: ShaderPreset,
    uniforms: Uniforms,
    viewport: Viewport,
    pixel_ratio: f32,
    paused: bool,
}

impl ShaderPlaygroundScene {
    pub fn new() -> Self {
        Self::with_preset(ShaderPreset::default())
    }

    pub fn with_preset(preset: ShaderPreset) -> Self {
        Self {
            resources: ResourceSet::new(),
            material: None,
            preset,
            uniforms: Uniforms { time: 0.0, resolution: Vec2::ZERO },
            viewport: Viewport::default(),
            pixel_ratio: 1.0,
            paused: true,
        }
    }

    pub fn preset(&self) -> ShaderPreset {
        self.preset
    }

    pub fn uniforms(&self) -> Uniforms {
        self.uniforms
    }

    /// Swaps to another preset's material.
    pub fn set_preset(&mut self, preset: ShaderPreset, renderer: &mut dyn Renderer) {
        if preset == self.preset {
            return;
        }
        self.preset = preset;
        if let Some(old) = self.material.take() {
            self.resources.release(renderer, old);
            self.material = Some(self.allocate_material(renderer));
        }
        debug!("Shader preset: {:?}", preset);
    }

    fn allocate_material(&mut self, renderer: &mut dyn Renderer) -> ResourceHandle {
        self.resources.allocate(
            renderer,
            ResourceDesc::Material { label: self.preset.material_label() },
        )
    }

    fn refresh_resolution(&mut self) {
        self.uniforms.resolution = Vec2::new(
            self.viewport.width as f32 * self.pixel_ratio,
            self.viewport.height as f32 * self.pixel_ratio,
        );
    }
}

impl Default for ShaderPlaygroundScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<Section> for ShaderPlaygroundScene {
    fn section(&self) -> Section {
        Section::ShaderPlayground
    }

    fn name(&self) -> &str {
        "Shader Playground"
    }

    fn camera_config(&self) -> CameraConfig {
        CameraConfig::orthographic(1.0, Vec3::new(0.0, 0.0, 1.0), Vec3::ZERO)
    }

    fn required_capabilities(&self) -> Capabilities {
        Capabilities { webgl: true, wasm: false }
    }

    fn initialize(&mut self, ctx: &mut SceneContext<'_>) -> SceneResult {
        self.viewport = ctx.viewport;
        self.pixel_ratio = ctx.quality.settings().pixel_ratio;
        self.refresh_resolution();

        self.resources.allocate(
            ctx.renderer,
            ResourceDesc::Geometry { label: "fullscreen_quad", vertices: 4 },
        );
        self.material = Some(self.allocate_material(ctx.renderer));
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
        self.material = None;
        Ok(())
    }

    fn update(&mut self, delta: f32, _camera: &mut Camera) {
        if !self.paused {
            self.uniforms.time += delta;
        }
    }

    fn render(&self, renderer: &mut dyn Renderer, camera: &Camera) {
        renderer.render(camera, self.resources.handles());
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.refresh_resolution();
    }

    fn on_quality_change(&mut self, level: QualityLevel, _renderer: Option<&mut dyn Renderer>) {
        self.pixel_ratio = level.settings().pixel_ratio;
        self.refresh_resolution();
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::HeadlessRenderer;
    use approx::assert_relative_eq;

    fn initialized(renderer: &mut HeadlessRenderer) -> ShaderPlaygroundScene {
        let mut scene = ShaderPlaygroundScene::new();
        let mut ctx = SceneContext {
            renderer,
            viewport: Viewport::new(800, 600),
            quality: QualityLevel::Medium,
        };
        scene.initialize(&mut ctx).unwrap();
        scene
    }

    #[test]
    fn resolution_tracks_viewport_and_pixel_ratio() {
        let mut renderer = HeadlessRenderer::new();
        let mut scene = initialized(&mut renderer);
        assert_eq!(scene.uniforms().resolution, Vec2::new(800.0, 600.0));

        scene.on_quality_change(QualityLevel::Ultra, None);
        scene.resize(Viewport::new(400, 300));
        assert_eq!(scene.uniforms().resolution, Vec2::new(800.0, 600.0));
    }

    #[test]
    fn time_advances_only_while_active() {
        let mut renderer = HeadlessRenderer::new();
        let mut scene = initialized(&mut renderer);
        let mut camera = Camera::default();

        scene.update(1.0, &mut camera);
        assert_eq!(scene.uniforms().time, 0.0);

        scene.activate().unwrap();
        scene.update(0.25, &mut camera);
        scene.update(0.25, &mut camera);
        assert_relative_eq!(scene.uniforms().time, 0.5);
    }

    #[test]
    fn preset_swap_replaces_material() {
        let mut renderer = HeadlessRenderer::new();
        let mut scene = initialized(&mut renderer);
        let live = renderer.live_resources();

        scene.set_preset(ShaderPreset::Plasma.next(), &mut renderer);
        assert_eq!(scene.preset(), ShaderPreset::Mandelbrot);
        assert_eq!(renderer.live_resources(), live);

        scene.cleanup(&mut renderer).unwrap();
        assert_eq!(renderer.live_resources(), 0);
    }
}

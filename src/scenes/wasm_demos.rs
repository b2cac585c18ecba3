//=========================================================================
// WASM Demos Scene
//=========================================================================
//
// Hosts compiled demo modules. The module loader runs off-thread; until
// it reports back the transition stays in its asset-loading stage. The
// built-in demo is a box of bouncing balls sized by the particle budget.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Receiver;
use glam::Vec3;
use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::error::SceneResult;
use crate::core::quality::{Capabilities, QualityLevel};
use crate::core::render::camera::{Camera, CameraConfig};
use crate::core::render::{LightKind, Renderer, ResourceDesc, ResourceSet};
use crate::core::scene::{AssetLoad, Scene, SceneContext};
use crate::core::section::Section;

const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);
/// Half extent of the cube the balls bounce in.
const BOUNDS: f32 = 3.0;
const RESTITUTION: f32 = 0.8;
const BALL_RADIUS: f32 = 0.1;

//=== Ball ================================================================

#[derive(Debug, Clone, Copy)]
struct Ball {
    position: Vec3,
    velocity: Vec3,
}

fn ball_count(level: QualityLevel) -> usize {
    (level.settings().particle_budget as usize / 50).clamp(8, 200)
}

/// Deterministic spread of starting states; no RNG needed for a demo.
fn spawn(count: usize) -> Vec<Ball> {
    (0..count)
        .map(|i| {
            let t = i as f32 * 0.618_034;
            let angle = t * std::f32::consts::TAU;
            let spread = BOUNDS - BALL_RADIUS;
            Ball {
                position: Vec3::new(
                    angle.cos() * spread * 0.8,
                    (t.fract() - 0.5) * spread,
                    angle.sin() * spread * 0.8,
                ),
                velocity: Vec3::new(-angle.sin(), 0.0, angle.cos()) * 2.0,
            }
        })
        .collect()
}

//=== WasmDemosScene ======================================================

pub struct WasmDemosScene {
    loader: Option<Receiver<Result<(), String>>>,
    resources: ResourceSet,
    balls: Vec<Ball>,
    quality: QualityLevel,
    paused: bool,
}

impl WasmDemosScene {
    pub fn new() -> Self {
        Self {
            loader: None,
            resources: ResourceSet::new(),
            balls: Vec::new(),
            quality: QualityLevel::High,
            paused: true,
        }
    }

    /// Waits on `loader` before initializing. A dropped sender counts as
    /// a failed module load. An interrupted load waits on the same
    /// loader again; it is released once the scene has initialized.
    pub fn with_module_loader(mut self, loader: Receiver<Result<(), String>>) -> Self {
        self.loader = Some(loader);
        self
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    /// Every ball is inside the box.
    pub fn is_contained(&self) -> bool {
        let limit = BOUNDS - BALL_RADIUS + 1e-4;
        self.balls
            .iter()
            .all(|b| b.position.abs().max_element() <= limit)
    }

    fn simulate(&mut self, delta: f32) {
        let limit = BOUNDS - BALL_RADIUS;
        for ball in &mut self.balls {
            ball.velocity += GRAVITY * delta;
            ball.position += ball.velocity * delta;

            for axis in 0..3 {
                if ball.position[axis].abs() > limit {
                    ball.position[axis] = ball.position[axis].clamp(-limit, limit);
                    ball.velocity[axis] = -ball.velocity[axis] * RESTITUTION;
                }
            }
        }
    }
}

impl Default for WasmDemosScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<Section> for WasmDemosScene {
    fn section(&self) -> Section {
        Section::WasmDemos
    }

    fn name(&self) -> &str {
        "WASM Demos"
    }

    fn camera_config(&self) -> CameraConfig {
        CameraConfig::perspective(Vec3::new(0.0, 2.0, 9.0), Vec3::ZERO)
    }

    fn required_capabilities(&self) -> Capabilities {
        Capabilities { webgl: false, wasm: true }
    }

    fn load_assets(&mut self) -> AssetLoad {
        match &self.loader {
            Some(loader) => {
                debug!("Waiting for demo modules");
                AssetLoad::Pending(loader.clone())
            }
            None => AssetLoad::Ready,
        }
    }

    fn initialize(&mut self, ctx: &mut SceneContext<'_>) -> SceneResult {
        self.loader = None;
        self.quality = ctx.quality;
        self.balls = spawn(ball_count(ctx.quality));

        // Instanced: one geometry serves every ball.
        self.resources.allocate(
            ctx.renderer,
            ResourceDesc::Geometry { label: "demo_ball", vertices: 162 },
        );
        self.resources.allocate(
            ctx.renderer,
            ResourceDesc::Geometry { label: "demo_box", vertices: 24 },
        );
        self.resources
            .allocate(ctx.renderer, ResourceDesc::Material { label: "demo_ball" });
        self.resources.allocate(
            ctx.renderer,
            ResourceDesc::Light {
                kind: LightKind::Directional,
                casts_shadow: ctx.quality.settings().shadow_map_size > 0,
            },
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
        self.balls.clear();
        Ok(())
    }

    fn update(&mut self, delta: f32, _camera: &mut Camera) {
        if !self.paused {
            self.simulate(delta);
        }
    }

    fn render(&self, renderer: &mut dyn Renderer, camera: &Camera) {
        renderer.render(camera, self.resources.handles());
    }

    fn on_quality_change(&mut self, level: QualityLevel, _renderer: Option<&mut dyn Renderer>) {
        if level == self.quality {
            return;
        }
        self.quality = level;
        let count = ball_count(level);
        if self.balls.is_empty() {
            return;
        }
        if count < self.balls.len() {
            self.balls.truncate(count);
        } else {
            let existing = self.balls.len();
            self.balls.extend(spawn(count).into_iter().skip(existing));
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

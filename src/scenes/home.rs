//=========================================================================
// Home Scene
//=========================================================================
//
// The landing menu: one orb per section, slowly orbiting the origin.
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

const ORBIT_RADIUS: f32 = 4.0;
const SPIN_SPEED: f32 = 0.25;
const BOB_HEIGHT: f32 = 0.2;

//=== MenuOrb =============================================================

struct MenuOrb {
    section: Section,
    geometry: ResourceHandle,
    position: Vec3,
}

//=== HomeScene ===========================================================

pub struct HomeScene {
    resources: ResourceSet,
    orbs: Vec<MenuOrb>,
    spin: f32,
    elapsed: f32,
    paused: bool,
    segments: u32,
}

impl HomeScene {
    pub fn new() -> Self {
        Self {
            resources: ResourceSet::new(),
            orbs: Vec::new(),
            spin: 0.0,
            elapsed: 0.0,
            paused: true,
            segments: orb_segments(QualityLevel::High),
        }
    }

    /// Current world position of a section's orb.
    pub fn orb_position(&self, section: Section) -> Option<Vec3> {
        self.orbs
            .iter()
            .find(|orb| orb.section == section)
            .map(|orb| orb.position)
    }

    fn orb_desc(&self) -> ResourceDesc {
        ResourceDesc::Geometry {
            label: "menu_orb",
            vertices: self.segments * self.segments,
        }
    }

    fn place_orbs(&mut self) {
        let count = self.orbs.len().max(1) as f32;
        for (i, orb) in self.orbs.iter_mut().enumerate() {
            let angle = self.spin + i as f32 * TAU / count;
            let bob = (self.elapsed * 1.5 + i as f32).sin() * BOB_HEIGHT;
            orb.position = Vec3::new(ORBIT_RADIUS * angle.cos(), bob, ORBIT_RADIUS * angle.sin());
        }
    }
}

impl Default for HomeScene {
    fn default() -> Self {
        Self::new()
    }
}

fn orb_segments(level: QualityLevel) -> u32 {
    match level {
        QualityLevel::Low => 12,
        QualityLevel::Medium => 24,
        QualityLevel::High => 32,
        QualityLevel::Ultra => 48,
    }
}

impl Scene<Section> for HomeScene {
    fn section(&self) -> Section {
        Section::Home
    }

    fn name(&self) -> &str {
        "Home"
    }

    fn camera_config(&self) -> CameraConfig {
        CameraConfig::perspective(Vec3::new(0.0, 3.0, 10.0), Vec3::ZERO)
    }

    fn initialize(&mut self, ctx: &mut SceneContext<'_>) -> SceneResult {
        self.segments = orb_segments(ctx.quality);
        let desc = self.orb_desc();

        for section in Section::ALL {
            let geometry = self.resources.allocate(ctx.renderer, desc.clone());
            self.orbs.push(MenuOrb {
                section,
                geometry,
                position: Vec3::ZERO,
            });
        }
        self.resources
            .allocate(ctx.renderer, ResourceDesc::Material { label: "menu_orb_glow" });
        self.resources.allocate(
            ctx.renderer,
            ResourceDesc::Light { kind: LightKind::Ambient, casts_shadow: false },
        );
        self.resources.allocate(
            ctx.renderer,
            ResourceDesc::Light {
                kind: LightKind::Directional,
                casts_shadow: ctx.quality.settings().shadow_map_size > 0,
            },
        );

        self.place_orbs();
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
        self.orbs.clear();
        Ok(())
    }

    fn update(&mut self, delta: f32, _camera: &mut Camera) {
        if self.paused {
            return;
        }
        self.elapsed += delta;
        self.spin = (self.spin + SPIN_SPEED * delta) % TAU;
        self.place_orbs();
    }

    fn render(&self, renderer: &mut dyn Renderer, camera: &Camera) {
        renderer.render(camera, self.resources.handles());
    }

    fn on_quality_change(&mut self, level: QualityLevel, renderer: Option<&mut dyn Renderer>) {
        let segments = orb_segments(level);
        if segments == self.segments {
            return;
        }
        self.segments = segments;

        // Before initialize the new count is simply used when building.
        let Some(renderer) = renderer else {
            return;
        };
        let desc = self.orb_desc();
        for orb in &mut self.orbs {
            self.resources.release(renderer, orb.geometry);
            orb.geometry = self.resources.allocate(renderer, desc.clone());
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

    fn initialized(renderer: &mut HeadlessRenderer) -> HomeScene {
        let mut scene = HomeScene::new();
        let mut ctx = SceneContext {
            renderer,
            viewport: Viewport::default(),
            quality: QualityLevel::Medium,
        };
        scene.initialize(&mut ctx).unwrap();
        scene
    }

    #[test]
    fn one_orb_per_section_on_the_orbit() {
        let mut renderer = HeadlessRenderer::new();
        let scene = initialized(&mut renderer);

        for section in Section::ALL {
            let position = scene.orb_position(section).unwrap();
            let radius = Vec3::new(position.x, 0.0, position.z).length();
            assert_relative_eq!(radius, ORBIT_RADIUS, epsilon = 1e-4);
        }
    }

    #[test]
    fn orbs_only_move_while_active() {
        let mut renderer = HeadlessRenderer::new();
        let mut scene = initialized(&mut renderer);
        let mut camera = Camera::default();
        let start = scene.orb_position(Section::Resume).unwrap();

        scene.update(0.5, &mut camera);
        assert_eq!(scene.orb_position(Section::Resume).unwrap(), start);

        scene.activate().unwrap();
        scene.update(0.5, &mut camera);
        assert_ne!(scene.orb_position(Section::Resume).unwrap(), start);
    }

    #[test]
    fn quality_change_rebuilds_orbs_without_leaking() {
        let mut renderer = HeadlessRenderer::new();
        let mut scene = initialized(&mut renderer);
        let live = renderer.live_resources();

        scene.on_quality_change(QualityLevel::Ultra, Some(&mut renderer));
        assert_eq!(renderer.live_resources(), live);
        assert_eq!(scene.segments, 48);

        scene.cleanup(&mut renderer).unwrap();
        assert_eq!(renderer.live_resources(), 0);
    }
}

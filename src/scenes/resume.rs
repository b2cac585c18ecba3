//=========================================================================
// Resume Scene
//=========================================================================
//
// A horizontal timeline of milestones. The view scrolls smoothly toward
// the focused entry.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Internal Dependencies ===============================================

use crate::core::error::SceneResult;
use crate::core::quality::QualityLevel;
use crate::core::render::camera::{Camera, CameraConfig};
use crate::core::render::{LightKind, Renderer, ResourceDesc, ResourceHandle, ResourceSet};
use crate::core::scene::{Scene, SceneContext};
use crate::core::section::Section;

/// World units between two timeline entries.
const ENTRY_SPACING: f32 = 3.0;
/// Scroll response in 1/s; higher settles faster.
const SCROLL_RESPONSE: f32 = 6.0;

//=== Milestone ===========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub year: u16,
    pub title: String,
}

impl Milestone {
    pub fn new(year: u16, title: impl Into<String>) -> Self {
        Self {
            year,
            title: title.into(),
        }
    }
}

fn default_milestones() -> Vec<Milestone> {
    vec![
        Milestone::new(2015, "Computer Science degree"),
        Milestone::new(2017, "Graphics programmer"),
        Milestone::new(2020, "Rendering engineer"),
        Milestone::new(2023, "Technical lead"),
    ]
}

//=== ResumeScene =========================================================

pub struct ResumeScene {
    milestones: Vec<Milestone>,
    resources: ResourceSet,
    labels: Vec<ResourceHandle>,
    focus: usize,
    scroll: f32,
    label_size: u32,
}

impl ResumeScene {
    pub fn new() -> Self {
        Self::with_milestones(default_milestones())
    }

    /// Milestones are shown in year order.
    pub fn with_milestones(mut milestones: Vec<Milestone>) -> Self {
        milestones.sort_by_key(|m| m.year);
        Self {
            milestones,
            resources: ResourceSet::new(),
            labels: Vec::new(),
            focus: 0,
            scroll: 0.0,
            label_size: label_size(QualityLevel::High),
        }
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    /// Moves the focus; out-of-range indices clamp to the last entry.
    pub fn focus(&mut self, index: usize) {
        self.focus = index.min(self.milestones.len().saturating_sub(1));
    }

    pub fn focused(&self) -> Option<&Milestone> {
        self.milestones.get(self.focus)
    }

    /// Horizontal scroll offset in world units.
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    pub fn entry_position(&self, index: usize) -> Vec3 {
        Vec3::new(index as f32 * ENTRY_SPACING - self.scroll, 0.0, 0.0)
    }

    fn label_desc(&self) -> ResourceDesc {
        ResourceDesc::Texture {
            label: "milestone_label",
            size: self.label_size,
        }
    }
}

impl Default for ResumeScene {
    fn default() -> Self {
        Self::new()
    }
}

fn label_size(level: QualityLevel) -> u32 {
    match level {
        QualityLevel::Low => 128,
        QualityLevel::Medium => 256,
        QualityLevel::High => 512,
        QualityLevel::Ultra => 1024,
    }
}

impl Scene<Section> for ResumeScene {
    fn section(&self) -> Section {
        Section::Resume
    }

    fn name(&self) -> &str {
        "Resume"
    }

    fn camera_config(&self) -> CameraConfig {
        CameraConfig::orthographic(4.0, Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO)
    }

    fn supported_quality_levels(&self) -> &[QualityLevel] {
        // Flat text content gains nothing from the top tier.
        &[QualityLevel::Low, QualityLevel::Medium, QualityLevel::High]
    }

    fn initialize(&mut self, ctx: &mut SceneContext<'_>) -> SceneResult {
        self.label_size = label_size(ctx.quality);

        let spine_vertices = (self.milestones.len() as u32).max(1) * 2;
        self.resources.allocate(
            ctx.renderer,
            ResourceDesc::Geometry { label: "timeline_spine", vertices: spine_vertices },
        );
        self.resources
            .allocate(ctx.renderer, ResourceDesc::Material { label: "timeline" });
        self.resources.allocate(
            ctx.renderer,
            ResourceDesc::Light { kind: LightKind::Ambient, casts_shadow: false },
        );

        for _ in &self.milestones {
            self.resources.allocate(
                ctx.renderer,
                ResourceDesc::Geometry { label: "milestone_node", vertices: 64 },
            );
            let label = self.resources.allocate(ctx.renderer, self.label_desc());
            self.labels.push(label);
        }
        Ok(())
    }

    fn activate(&mut self) -> SceneResult {
        self.focus = 0;
        Ok(())
    }

    fn cleanup(&mut self, renderer: &mut dyn Renderer) -> SceneResult {
        self.resources.release_all(renderer);
        self.labels.clear();
        Ok(())
    }

    fn update(&mut self, delta: f32, _camera: &mut Camera) {
        let target = self.focus as f32 * ENTRY_SPACING;
        let blend = 1.0 - (-SCROLL_RESPONSE * delta).exp();
        self.scroll += (target - self.scroll) * blend;
    }

    fn render(&self, renderer: &mut dyn Renderer, camera: &Camera) {
        renderer.render(camera, self.resources.handles());
    }

    fn on_quality_change(&mut self, level: QualityLevel, renderer: Option<&mut dyn Renderer>) {
        let size = label_size(level);
        if size == self.label_size {
            return;
        }
        self.label_size = size;

        let Some(renderer) = renderer else {
            return;
        };
        let desc = self.label_desc();
        for label in &mut self.labels {
            self.resources.release(renderer, *label);
            *label = self.resources.allocate(renderer, desc.clone());
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milestones_are_sorted_by_year() {
        let scene = ResumeScene::with_milestones(vec![
            Milestone::new(2022, "b"),
            Milestone::new(2010, "a"),
        ]);
        let years: Vec<u16> = scene.milestones().iter().map(|m| m.year).collect();
        assert_eq!(years, vec![2010, 2022]);
    }

    #[test]
    fn scroll_converges_on_focused_entry() {
        let mut scene = ResumeScene::new();
        let mut camera = Camera::default();
        scene.focus(2);

        for _ in 0..120 {
            scene.update(1.0 / 60.0, &mut camera);
        }
        assert!((scene.scroll() - 2.0 * ENTRY_SPACING).abs() < 0.01);
        assert!(scene.entry_position(2).x.abs() < 0.01);
    }

    #[test]
    fn focus_clamps_to_last_entry() {
        let mut scene = ResumeScene::new();
        scene.focus(99);
        assert_eq!(scene.focused().map(|m| m.year), Some(2023));
    }

    #[test]
    fn ultra_request_runs_at_high() {
        assert_eq!(
            QualityLevel::Ultra.resolve(ResumeScene::new().supported_quality_levels()),
            QualityLevel::High
        );
    }
}

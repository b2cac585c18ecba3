//=========================================================================
// Code Visualizer Scene
//=========================================================================
//
// A module dependency graph laid out by a simple force simulation:
// every pair of nodes repels, every edge pulls its ends together, and
// velocities are damped each step.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec3;

//=== Internal Dependencies ===============================================

use crate::core::error::SceneResult;
use crate::core::quality::QualityLevel;
use crate::core::render::camera::{Camera, CameraConfig};
use crate::core::render::{LightKind, Renderer, ResourceDesc, ResourceSet};
use crate::core::scene::{Scene, SceneContext};
use crate::core::section::Section;

const REPULSION: f32 = 4.0;
const SPRING: f32 = 2.0;
const REST_LENGTH: f32 = 2.0;
const DAMPING: f32 = 0.85;
/// Simulation step; frames are split into fixed steps of this size.
const STEP: f32 = 1.0 / 60.0;

//=== Graph ===============================================================

#[derive(Debug, Clone)]
struct Node {
    name: &'static str,
    position: Vec3,
    velocity: Vec3,
}

/// Module graph with its current layout.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    nodes: Vec<Node>,
    edges: Vec<(usize, usize)>,
}

impl ModuleGraph {
    /// Builds a graph from module names and `(from, to)` index pairs.
    ///
    /// Nodes start on a ring so the simulation has no coincident points.
    ///
    /// # Panics
    ///
    /// Panics if an edge refers to a node index out of range.
    pub fn new(names: &[&'static str], edges: &[(usize, usize)]) -> Self {
        for &(a, b) in edges {
            assert!(
                a < names.len() && b < names.len(),
                "Edge ({a}, {b}) refers to a missing node"
            );
        }

        let count = names.len().max(1) as f32;
        let nodes = names
            .iter()
            .enumerate()
            .map(|(i, &name)| {
                let angle = i as f32 / count * std::f32::consts::TAU;
                Node {
                    name,
                    position: Vec3::new(angle.cos(), angle.sin(), 0.0) * 3.0,
                    velocity: Vec3::ZERO,
                }
            })
            .collect();

        Self {
            nodes,
            edges: edges.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn position(&self, name: &str) -> Option<Vec3> {
        self.nodes.iter().find(|n| n.name == name).map(|n| n.position)
    }

    /// Distance between the two ends of an edge.
    pub fn edge_length(&self, edge: (usize, usize)) -> f32 {
        self.nodes[edge.0].position.distance(self.nodes[edge.1].position)
    }

    /// Sum of squared node speeds.
    pub fn kinetic_energy(&self) -> f32 {
        self.nodes.iter().map(|n| n.velocity.length_squared()).sum()
    }

    /// Advances the layout by one fixed step.
    pub fn step(&mut self) {
        let mut forces = vec![Vec3::ZERO; self.nodes.len()];

        for i in 0..self.nodes.len() {
            for j in (i + 1)..self.nodes.len() {
                let offset = self.nodes[i].position - self.nodes[j].position;
                let distance_sq = offset.length_squared().max(0.01);
                let push = offset.normalize_or_zero() * (REPULSION / distance_sq);
                forces[i] += push;
                forces[j] -= push;
            }
        }

        for &(a, b) in &self.edges {
            let offset = self.nodes[b].position - self.nodes[a].position;
            let stretch = offset.length() - REST_LENGTH;
            let pull = offset.normalize_or_zero() * (SPRING * stretch);
            forces[a] += pull;
            forces[b] -= pull;
        }

        for (node, force) in self.nodes.iter_mut().zip(forces) {
            node.velocity = (node.velocity + force * STEP) * DAMPING;
            node.position += node.velocity * STEP;
        }
    }
}

fn crate_graph() -> ModuleGraph {
    ModuleGraph::new(
        &["app", "platform", "core", "scene", "transition", "render", "config", "scenes"],
        &[(0, 1), (0, 2), (0, 7), (2, 3), (2, 4), (2, 5), (2, 6), (4, 3), (3, 5), (7, 3)],
    )
}

/// Label quality for node captions.
fn label_size(level: QualityLevel) -> u32 {
    if level >= QualityLevel::High {
        256
    } else {
        128
    }
}

//=== CodeVisualizerScene =================================================

pub struct CodeVisualizerScene {
    graph: ModuleGraph,
    resources: ResourceSet,
    accumulator: f32,
    paused: bool,
}

impl CodeVisualizerScene {
    pub fn new() -> Self {
        Self::with_graph(crate_graph())
    }

    pub fn with_graph(graph: ModuleGraph) -> Self {
        Self {
            graph,
            resources: ResourceSet::new(),
            accumulator: 0.0,
            paused: true,
        }
    }

    pub fn graph(&self) -> &ModuleGraph {
        &self.graph
    }
}

impl Default for CodeVisualizerScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene<Section> for CodeVisualizerScene {
    fn section(&self) -> Section {
        Section::CodeVisualizer
    }

    fn name(&self) -> &str {
        "Code Visualizer"
    }

    fn camera_config(&self) -> CameraConfig {
        CameraConfig::perspective(Vec3::new(0.0, 0.0, 14.0), Vec3::ZERO)
    }

    fn initialize(&mut self, ctx: &mut SceneContext<'_>) -> SceneResult {
        let size = label_size(ctx.quality);
        for _ in 0..self.graph.len() {
            self.resources.allocate(
                ctx.renderer,
                ResourceDesc::Geometry { label: "module_node", vertices: 42 },
            );
            self.resources
                .allocate(ctx.renderer, ResourceDesc::Texture { label: "module_label", size });
        }
        self.resources.allocate(
            ctx.renderer,
            ResourceDesc::Geometry {
                label: "dependency_edges",
                vertices: self.graph.edges().len() as u32 * 2,
            },
        );
        self.resources
            .allocate(ctx.renderer, ResourceDesc::Material { label: "graph" });
        self.resources.allocate(
            ctx.renderer,
            ResourceDesc::Light { kind: LightKind::Ambient, casts_shadow: false },
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
        Ok(())
    }

    fn update(&mut self, delta: f32, _camera: &mut Camera) {
        if self.paused {
            return;
        }
        self.accumulator += delta;
        while self.accumulator >= STEP {
            self.graph.step();
            self.accumulator -= STEP;
        }
    }

    fn render(&self, renderer: &mut dyn Renderer, camera: &Camera) {
        renderer.render(camera, self.resources.handles());
    }
}

//=========================================================================
// Tests
//=========================================================================

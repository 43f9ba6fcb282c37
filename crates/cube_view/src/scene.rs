//! Retained scene for one cube view.
//!
//! Every visual element lives under the single [`CubeGroup`], whose rotation
//! is the auto-rotate spin. Elements are replaced wholesale when the config
//! that shaped them changes.

use glam::{Mat4, Vec3};
use magic_cube::{bounding_box_edges, CubeLayout};
use settings::{LineMode, Rgb};

/// Width and height segments used when a host tessellates node spheres.
pub const SPHERE_SEGMENTS: u32 = 16;
pub const WIREFRAME_DASH: f32 = 0.3;
pub const WIREFRAME_GAP: f32 = 0.3;

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub background: Rgb,
    pub group: CubeGroup,
}

impl Scene {
    pub fn new(background: Rgb) -> Self {
        Self {
            background,
            group: CubeGroup::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CubeGroup {
    /// Spin around the world Y axis, in radians.
    pub rotation_y: f32,
    pub nodes: Vec<NodeMesh>,
    pub wireframe: Option<Wireframe>,
    pub sequence_line: Option<SequenceLine>,
}

impl CubeGroup {
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation_y)
    }

    /// Number of drawable elements currently in the group.
    pub fn element_count(&self) -> usize {
        self.nodes.len()
            + self.wireframe.as_ref().map_or(0, |w| w.edges.len())
            + usize::from(self.sequence_line.is_some())
    }
}

/// Sphere marking one cube number.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeMesh {
    pub number: u32,
    pub position: Vec3,
    pub radius: f32,
    pub color: Rgb,
}

/// Dashed outline of the cube bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Wireframe {
    pub edges: Vec<(Vec3, Vec3)>,
    pub color: Rgb,
    pub dash_size: f32,
    pub gap_size: f32,
}

impl Wireframe {
    pub fn new(scale: f32, color: Rgb) -> Self {
        Self {
            edges: bounding_box_edges(scale).to_vec(),
            color,
            dash_size: WIREFRAME_DASH,
            gap_size: WIREFRAME_GAP,
        }
    }
}

/// Polyline through the nodes in ascending number order.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceLine {
    pub points: Vec<Vec3>,
    pub color: Rgb,
}

impl SequenceLine {
    /// `None` when the mode draws no line.
    pub fn new(layout: &CubeLayout, mode: &LineMode, color: Rgb) -> Option<Self> {
        if !mode.draws_line() {
            return None;
        }
        Some(Self {
            points: layout.sequence(|n| mode.includes(n)),
            color,
        })
    }
}

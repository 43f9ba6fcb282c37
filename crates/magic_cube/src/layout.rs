use std::collections::{BTreeMap, HashMap};
use std::fmt;

use glam::Vec3;
use tracing::debug;

use crate::cube::{CubeIndex, MagicCube, CELL_COUNT, ORDER};

/// Node spacing in world units. Also sets the wireframe size.
pub const CUBE_SCALE: f32 = 2.5;

const CENTER: f32 = (ORDER / 2) as f32;

/// World position of a cell, with the cube centre at the origin.
///
/// Rows grow downward in the dataset, so y is negated to keep row 0 on top.
pub fn cell_position(index: CubeIndex, scale: f32) -> Vec3 {
    Vec3::new(
        (index.x as f32 - CENTER) * scale,
        -(index.y as f32 - CENTER) * scale,
        (index.z as f32 - CENTER) * scale,
    )
}

/// Exact, hashable key for a node position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionKey([u32; 3]);

impl PositionKey {
    pub fn new(position: Vec3) -> Self {
        // -0.0 and 0.0 must map to the same key.
        let canonical = position + Vec3::ZERO;
        Self([
            canonical.x.to_bits(),
            canonical.y.to_bits(),
            canonical.z.to_bits(),
        ])
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(
            f32::from_bits(self.0[0]),
            f32::from_bits(self.0[1]),
            f32::from_bits(self.0[2]),
        )
    }
}

impl From<Vec3> for PositionKey {
    fn from(value: Vec3) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.position();
        write!(f, "{},{},{}", p.x, p.y, p.z)
    }
}

/// Bidirectional number ↔ position index for one cube at one scale.
#[derive(Debug, Clone)]
pub struct CubeLayout {
    number_to_position: BTreeMap<u32, Vec3>,
    position_to_number: HashMap<PositionKey, u32>,
    ordered_numbers: Vec<u32>,
}

impl CubeLayout {
    pub fn build(cube: &MagicCube, scale: f32) -> Self {
        let mut number_to_position = BTreeMap::new();
        let mut position_to_number = HashMap::with_capacity(CELL_COUNT);

        for (index, number) in cube.iter() {
            let position = cell_position(index, scale);
            number_to_position.insert(number, position);
            position_to_number.insert(PositionKey::new(position), number);
        }

        // BTreeMap keys iterate ascending, which is the sequence order.
        let ordered_numbers: Vec<u32> = number_to_position.keys().copied().collect();

        debug!(nodes = ordered_numbers.len(), scale, "built cube layout");

        Self {
            number_to_position,
            position_to_number,
            ordered_numbers,
        }
    }

    pub fn len(&self) -> usize {
        self.number_to_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.number_to_position.is_empty()
    }

    pub fn position_of(&self, number: u32) -> Option<Vec3> {
        self.number_to_position.get(&number).copied()
    }

    pub fn number_at(&self, position: Vec3) -> Option<u32> {
        self.position_to_number.get(&PositionKey::new(position)).copied()
    }

    /// Numbers in ascending order, independent of where they sit in space.
    pub fn ordered_numbers(&self) -> &[u32] {
        &self.ordered_numbers
    }

    /// `(number, position)` pairs in ascending number order.
    pub fn nodes(&self) -> impl Iterator<Item = (u32, Vec3)> + '_ {
        self.number_to_position.iter().map(|(&n, &p)| (n, p))
    }

    /// Positions of the ascending numbers accepted by `include`.
    pub fn sequence<F>(&self, mut include: F) -> Vec<Vec3>
    where
        F: FnMut(u32) -> bool,
    {
        self.ordered_numbers
            .iter()
            .copied()
            .filter(|&n| include(n))
            .filter_map(|n| self.position_of(n))
            .collect()
    }
}

/// Corner indices of the bounding box: four top corners then four bottom corners.
const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// The 12 edges of the box that encloses every node at `scale`.
pub fn bounding_box_edges(scale: f32) -> [(Vec3, Vec3); 12] {
    let h = scale * CENTER;
    let corners = [
        Vec3::new(-h, h, -h),
        Vec3::new(h, h, -h),
        Vec3::new(h, h, h),
        Vec3::new(-h, h, h),
        Vec3::new(-h, -h, -h),
        Vec3::new(h, -h, -h),
        Vec3::new(h, -h, h),
        Vec3::new(-h, -h, h),
    ];
    BOX_EDGES.map(|(a, b)| (corners[a], corners[b]))
}

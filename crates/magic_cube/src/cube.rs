use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Edge length of the cube.
pub const ORDER: usize = 5;
/// Number of cells, and the largest value the cube holds.
pub const CELL_COUNT: usize = ORDER * ORDER * ORDER;
/// Sum shared by every row, column, pillar and space diagonal.
pub const MAGIC_CONSTANT: u32 = (ORDER * (CELL_COUNT + 1) / 2) as u32;

pub type Layers = [[[u32; ORDER]; ORDER]; ORDER];

/// The order-5 perfect magic cube found by Walter Trump and Christian Boyer
/// in 2003. Indexed `[z][y][x]`: layer, row, column.
pub const TRUMP_BOYER: Layers = [
    [
        [25, 16, 80, 104, 90],
        [115, 98, 4, 1, 97],
        [42, 111, 85, 2, 75],
        [66, 72, 27, 102, 48],
        [67, 18, 119, 106, 5],
    ],
    [
        [91, 77, 71, 6, 70],
        [52, 64, 117, 69, 13],
        [30, 118, 21, 123, 23],
        [26, 39, 92, 44, 114],
        [116, 17, 14, 73, 95],
    ],
    [
        [47, 61, 45, 76, 86],
        [107, 43, 38, 33, 94],
        [89, 68, 63, 58, 37],
        [32, 93, 88, 83, 19],
        [40, 50, 81, 65, 79],
    ],
    [
        [31, 53, 112, 109, 10],
        [12, 82, 34, 87, 100],
        [103, 3, 105, 8, 96],
        [113, 57, 9, 62, 74],
        [56, 120, 55, 49, 35],
    ],
    [
        [121, 108, 7, 20, 59],
        [29, 28, 122, 125, 11],
        [51, 15, 41, 124, 84],
        [78, 54, 99, 24, 60],
        [36, 110, 46, 22, 101],
    ],
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CubeError {
    #[error("value {value} at {index} is outside 1..={max}", max = CELL_COUNT)]
    OutOfRange { index: CubeIndex, value: u32 },
    #[error("value {value} appears at both {first} and {second}")]
    Duplicate {
        value: u32,
        first: CubeIndex,
        second: CubeIndex,
    },
}

/// Grid coordinate of a cell. Each axis is in `0..ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CubeIndex {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl CubeIndex {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}

impl std::fmt::Display for CubeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A validated 5×5×5 arrangement of the numbers 1..=125.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicCube {
    layers: Layers,
}

impl MagicCube {
    /// Validate a raw dataset. Every value must lie in `1..=125` and appear once.
    pub fn from_layers(layers: Layers) -> Result<Self, CubeError> {
        let mut seen: [Option<CubeIndex>; CELL_COUNT] = [None; CELL_COUNT];

        for (index, value) in iter_layers(&layers) {
            if value == 0 || value as usize > CELL_COUNT {
                return Err(CubeError::OutOfRange { index, value });
            }
            let slot = &mut seen[value as usize - 1];
            if let Some(first) = *slot {
                return Err(CubeError::Duplicate {
                    value,
                    first,
                    second: index,
                });
            }
            *slot = Some(index);
        }

        Ok(Self { layers })
    }

    pub fn trump_boyer() -> Result<Self, CubeError> {
        Self::from_layers(TRUMP_BOYER)
    }

    pub fn get(&self, index: CubeIndex) -> u32 {
        self.layers[index.z][index.y][index.x]
    }

    /// Cells in storage order: z outermost, x innermost.
    pub fn iter(&self) -> impl Iterator<Item = (CubeIndex, u32)> + '_ {
        iter_layers(&self.layers)
    }

    /// True when every row, column, pillar and the four space diagonals
    /// sum to [`MAGIC_CONSTANT`].
    pub fn is_magic(&self) -> bool {
        let n = ORDER;
        let axes_ok = (0..n).all(|a| {
            (0..n).all(|b| {
                let row: u32 = (0..n).map(|i| self.layers[a][b][i]).sum();
                let column: u32 = (0..n).map(|i| self.layers[a][i][b]).sum();
                let pillar: u32 = (0..n).map(|i| self.layers[i][a][b]).sum();
                row == MAGIC_CONSTANT && column == MAGIC_CONSTANT && pillar == MAGIC_CONSTANT
            })
        });

        let last = n - 1;
        let diagonals: [u32; 4] = [
            (0..n).map(|i| self.layers[i][i][i]).sum(),
            (0..n).map(|i| self.layers[i][i][last - i]).sum(),
            (0..n).map(|i| self.layers[i][last - i][i]).sum(),
            (0..n).map(|i| self.layers[last - i][i][i]).sum(),
        ];

        axes_ok && diagonals.iter().all(|&sum| sum == MAGIC_CONSTANT)
    }
}

fn iter_layers(layers: &Layers) -> impl Iterator<Item = (CubeIndex, u32)> + '_ {
    layers.iter().enumerate().flat_map(|(z, layer)| {
        layer.iter().enumerate().flat_map(move |(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &value)| (CubeIndex::new(x, y, z), value))
        })
    })
}

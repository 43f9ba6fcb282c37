//! The Trump-Boyer order-5 magic cube and its spatial layout.

pub mod cube;
pub mod layout;

pub use cube::{CubeError, CubeIndex, MagicCube, CELL_COUNT, MAGIC_CONSTANT, ORDER, TRUMP_BOYER};
pub use layout::{bounding_box_edges, cell_position, CubeLayout, PositionKey, CUBE_SCALE};

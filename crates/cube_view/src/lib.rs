//! Interactive view of the Trump-Boyer magic cube.
//!
//! [`CubeView`] owns the scene, camera, orbit controls and node labels of one
//! widget instance. Everything platform specific (surface, label elements,
//! resize events, frame scheduling, drawing) goes through the [`Host`] trait.

pub mod camera;
pub mod controls;
pub mod error;
pub mod host;
pub mod labels;
pub mod reconcile;
pub mod scene;
pub mod view;

pub use camera::PerspectiveCamera;
pub use controls::{ControlEvent, OrbitControls};
pub use error::{HostError, ViewError};
pub use host::{FrameRequest, Host, LabelId, ViewId};
pub use labels::{project_label, LabelPlacement, NodeLabel};
pub use reconcile::{apply_update, RebuildAction, RebuildPlan};
pub use scene::{CubeGroup, NodeMesh, Scene, SequenceLine, Wireframe};
pub use view::{CubeView, RebuildStats, AUTO_ROTATE_RESUME_SECS};

use glam::{Mat4, Vec2, Vec3};

use crate::host::LabelId;

/// Labels at or beyond this NDC depth are hidden.
pub const DEPTH_CUTOFF: f32 = 0.9;
/// Opacity floor for the farthest visible labels.
pub const MIN_OPACITY: f32 = 0.3;

/// A label bound to one cube number and a snapshot of its node position.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLabel {
    pub id: LabelId,
    pub number: u32,
    pub position: Vec3,
}

/// Where and how to draw a label this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    /// Pixels from the container's top-left corner.
    pub screen: Vec2,
    pub visible: bool,
    pub opacity: f32,
    /// Higher values draw on top.
    pub stack_order: i32,
}

impl LabelPlacement {
    pub fn from_ndc(ndc: Vec3, viewport: Vec2) -> Self {
        let screen = Vec2::new(
            (ndc.x * 0.5 + 0.5) * viewport.x,
            (-ndc.y * 0.5 + 0.5) * viewport.y,
        );

        if ndc.z < DEPTH_CUTOFF {
            Self {
                screen,
                visible: true,
                opacity: (1.0 - (ndc.z + 1.0) / 2.0).max(MIN_OPACITY),
                stack_order: ((1.0 - ndc.z) * 1000.0).round() as i32,
            }
        } else {
            Self {
                screen,
                visible: false,
                opacity: 0.0,
                stack_order: 0,
            }
        }
    }
}

/// Project a node position through the group transform and camera into
/// container pixels.
pub fn project_label(
    position: Vec3,
    group_world: &Mat4,
    view_projection: &Mat4,
    viewport: Vec2,
) -> LabelPlacement {
    let world = group_world.transform_point3(position);
    let ndc = view_projection.project_point3(world);
    LabelPlacement::from_ndc(ndc, viewport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PerspectiveCamera;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn hidden_beyond_depth_cutoff() {
        let placement = LabelPlacement::from_ndc(Vec3::new(0.0, 0.0, 0.95), VIEWPORT);
        assert!(!placement.visible);

        let edge = LabelPlacement::from_ndc(Vec3::new(0.0, 0.0, 0.9), VIEWPORT);
        assert!(!edge.visible);
    }

    #[test]
    fn mid_depth_hits_opacity_floor() {
        let placement = LabelPlacement::from_ndc(Vec3::new(0.0, 0.0, 0.5), VIEWPORT);
        assert!(placement.visible);
        assert_eq!(placement.opacity, 0.3);
        assert_eq!(placement.stack_order, 500);
    }

    #[test]
    fn near_labels_are_opaque_and_on_top() {
        let near = LabelPlacement::from_ndc(Vec3::new(0.0, 0.0, -0.5), VIEWPORT);
        assert_eq!(near.opacity, 0.75);
        assert_eq!(near.stack_order, 1500);

        let farther = LabelPlacement::from_ndc(Vec3::new(0.0, 0.0, 0.2), VIEWPORT);
        assert!(near.stack_order > farther.stack_order);
        assert!(near.opacity > farther.opacity);
    }

    #[test]
    fn ndc_maps_to_pixels_with_y_down() {
        let center = LabelPlacement::from_ndc(Vec3::ZERO, VIEWPORT);
        assert_eq!(center.screen, Vec2::new(400.0, 300.0));

        let top_left = LabelPlacement::from_ndc(Vec3::new(-1.0, 1.0, 0.0), VIEWPORT);
        assert_eq!(top_left.screen, Vec2::ZERO);

        let bottom_right = LabelPlacement::from_ndc(Vec3::new(1.0, -1.0, 0.0), VIEWPORT);
        assert_eq!(bottom_right.screen, VIEWPORT);
    }

    #[test]
    fn group_rotation_moves_projected_label() {
        let camera = PerspectiveCamera::new(75.0, (800, 600), 25.0);
        let view_projection = camera.view_projection();
        let position = Vec3::new(5.0, 0.0, 0.0);

        let still = project_label(position, &Mat4::IDENTITY, &view_projection, VIEWPORT);
        assert!(still.screen.x > 400.0);
        assert!((still.screen.y - 300.0).abs() < 1e-3);

        let half_turn = Mat4::from_rotation_y(std::f32::consts::PI);
        let turned = project_label(position, &half_turn, &view_projection, VIEWPORT);
        assert!(turned.screen.x < 400.0);
    }

    #[test]
    fn depth_cutoff_only_admits_nodes_close_to_the_near_plane() {
        // With near = 0.1 and far = 1000, NDC depth passes 0.9 about two
        // units in front of the camera.
        let camera = PerspectiveCamera::new(75.0, (800, 600), 25.0);
        let view_projection = camera.view_projection();

        let center = project_label(Vec3::ZERO, &Mat4::IDENTITY, &view_projection, VIEWPORT);
        assert!(!center.visible);

        let close = project_label(
            Vec3::new(0.0, 0.0, 24.0),
            &Mat4::IDENTITY,
            &view_projection,
            VIEWPORT,
        );
        assert!(close.visible);
        assert_eq!(close.opacity, MIN_OPACITY);
    }
}

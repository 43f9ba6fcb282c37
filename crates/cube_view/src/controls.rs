use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::camera::PerspectiveCamera;

const DAMPING_FACTOR: f32 = 0.05;
const ZOOM_STEP: f32 = 0.95;
// Keeps the camera off the poles so look_at never sees a parallel up vector.
const POLE_EPSILON: f32 = 1e-4;

/// Interaction boundaries reported to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Start,
    End,
}

/// Turntable orbit around the camera target with damped motion.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    enabled: bool,
    dragging: bool,
    rotate_speed: f32,
    /// Pending (theta, phi) rotation, consumed gradually by `update`.
    sphere_delta: Vec2,
    zoom_scale: f32,
    viewport_height: f32,
}

impl OrbitControls {
    pub fn new(viewport: (u32, u32)) -> Self {
        Self {
            enabled: true,
            dragging: false,
            rotate_speed: 1.0,
            sphere_delta: Vec2::ZERO,
            zoom_scale: 1.0,
            viewport_height: viewport.1.max(1) as f32,
        }
    }

    pub fn set_viewport(&mut self, viewport: (u32, u32)) {
        self.viewport_height = viewport.1.max(1) as f32;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn pointer_pressed(&mut self) -> Option<ControlEvent> {
        if !self.enabled || self.dragging {
            return None;
        }
        self.dragging = true;
        Some(ControlEvent::Start)
    }

    /// Drag by `delta` pixels. A full viewport height turns one revolution.
    pub fn pointer_moved(&mut self, delta: Vec2) {
        if !self.enabled || !self.dragging {
            return;
        }
        let per_pixel = TAU / self.viewport_height * self.rotate_speed;
        self.sphere_delta -= delta * per_pixel;
    }

    pub fn pointer_released(&mut self) -> Option<ControlEvent> {
        if !self.enabled || !self.dragging {
            return None;
        }
        self.dragging = false;
        Some(ControlEvent::End)
    }

    /// Positive steps move the camera closer.
    pub fn zoom(&mut self, steps: f32) {
        if !self.enabled {
            return;
        }
        self.zoom_scale *= ZOOM_STEP.powf(steps);
    }

    /// Apply one frame of damped motion to `camera`. Returns whether it moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        if !self.enabled {
            return false;
        }

        let target = camera.target();
        let offset = camera.position() - target;
        let mut radius = offset.length();
        if radius <= f32::EPSILON {
            return false;
        }

        let mut theta = offset.x.atan2(offset.z);
        let mut phi = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let step = self.sphere_delta * DAMPING_FACTOR;
        theta += step.x;
        phi = (phi + step.y).clamp(POLE_EPSILON, PI - POLE_EPSILON);

        let zoomed = self.zoom_scale != 1.0;
        if zoomed {
            radius *= self.zoom_scale;
        }

        self.sphere_delta *= 1.0 - DAMPING_FACTOR;
        self.zoom_scale = 1.0;

        let moved = zoomed || step.length_squared() > 1e-12;
        if moved {
            let sin_phi = phi.sin();
            let offset = Vec3::new(sin_phi * theta.sin(), phi.cos(), sin_phi * theta.cos()) * radius;
            camera.set_position(target + offset);
        }
        moved
    }

    /// Detach from input. Further events are ignored.
    pub fn dispose(&mut self) {
        self.enabled = false;
        self.dragging = false;
        self.sphere_delta = Vec2::ZERO;
        self.zoom_scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::new(75.0, (800, 600), 25.0)
    }

    #[test]
    fn press_and_release_report_boundaries() {
        let mut controls = OrbitControls::new((800, 600));
        assert_eq!(controls.pointer_released(), None);
        assert_eq!(controls.pointer_pressed(), Some(ControlEvent::Start));
        assert_eq!(controls.pointer_pressed(), None);
        assert!(controls.is_dragging());
        assert_eq!(controls.pointer_released(), Some(ControlEvent::End));
        assert!(!controls.is_dragging());
    }

    #[test]
    fn drag_orbits_without_changing_distance() {
        let mut controls = OrbitControls::new((800, 600));
        let mut camera = camera();
        controls.pointer_pressed();
        controls.pointer_moved(Vec2::new(120.0, 0.0));
        controls.pointer_released();

        let start = camera.position();
        for _ in 0..200 {
            controls.update(&mut camera);
        }

        assert_ne!(camera.position(), start);
        assert!((camera.distance() - 25.0).abs() < 1e-3);
        assert!((camera.position().y).abs() < 1e-3);
    }

    #[test]
    fn damping_decays_motion() {
        let mut controls = OrbitControls::new((800, 600));
        let mut camera = camera();
        controls.pointer_pressed();
        controls.pointer_moved(Vec2::new(50.0, 30.0));

        assert!(controls.update(&mut camera));
        for _ in 0..2000 {
            controls.update(&mut camera);
        }
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn zoom_scales_distance_without_limits() {
        let mut controls = OrbitControls::new((800, 600));
        let mut camera = camera();

        controls.zoom(1.0);
        controls.update(&mut camera);
        assert!((camera.distance() - 25.0 * 0.95).abs() < 1e-4);

        let mut far = PerspectiveCamera::new(75.0, (800, 600), 1000.0);
        controls.zoom(1.0);
        controls.update(&mut far);
        assert!((far.distance() - 950.0).abs() < 1e-2);

        let mut near = PerspectiveCamera::new(75.0, (800, 600), 1.0);
        controls.zoom(2.0);
        controls.update(&mut near);
        assert!((near.distance() - 0.9025).abs() < 1e-4);
    }

    #[test]
    fn disposed_controls_ignore_input() {
        let mut controls = OrbitControls::new((800, 600));
        let mut camera = camera();
        controls.dispose();

        assert_eq!(controls.pointer_pressed(), None);
        controls.pointer_moved(Vec2::new(100.0, 100.0));
        controls.zoom(3.0);
        assert!(!controls.update(&mut camera));
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 25.0));
        assert!(!controls.is_enabled());
    }
}

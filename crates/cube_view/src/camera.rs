use glam::{Mat4, Vec3};

const WORLD_UP: Vec3 = Vec3::Y;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

/// Perspective camera looking at `target`, with OpenGL clip space (z in -1..1).
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    fov_y_deg: f32,
    aspect: f32,
    near: f32,
    far: f32,
    position: Vec3,
    target: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    /// Camera on the +Z axis at `distance` from the origin.
    pub fn new(fov_y_deg: f32, viewport: (u32, u32), distance: f32) -> Self {
        let mut camera = Self {
            fov_y_deg,
            aspect: aspect_of(viewport),
            near: NEAR,
            far: FAR,
            position: Vec3::new(0.0, 0.0, distance),
            target: Vec3::ZERO,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    /// Recompute the projection matrix after a lens change.
    pub fn update_projection(&mut self) {
        self.projection = Mat4::perspective_rh_gl(
            self.fov_y_deg.to_radians(),
            self.aspect,
            self.near,
            self.far,
        );
    }

    pub fn set_fov(&mut self, fov_y_deg: f32) {
        self.fov_y_deg = fov_y_deg;
        self.update_projection();
    }

    pub fn set_viewport(&mut self, viewport: (u32, u32)) {
        self.aspect = aspect_of(viewport);
        self.update_projection();
    }

    /// Move along the current view direction so the camera sits `distance`
    /// from the target. Orientation is unchanged.
    pub fn set_distance(&mut self, distance: f32) {
        let direction = (self.position - self.target).normalize_or_zero();
        self.position = self.target + direction * distance;
        self.update_projection();
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn fov(&self) -> f32 {
        self.fov_y_deg
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, WORLD_UP)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view_matrix()
    }

    /// World position to normalized device coordinates.
    pub fn project(&self, world: Vec3) -> Vec3 {
        self.view_projection().project_point3(world)
    }

    /// Pixels per world unit at `world`, for sizing screen-space markers.
    pub fn pixels_per_unit(&self, world: Vec3, viewport_height: f32) -> f32 {
        let depth = (self.view_matrix().transform_point3(world).z).abs().max(self.near);
        let half_fov = (self.fov_y_deg.to_radians() * 0.5).tan();
        viewport_height / (2.0 * depth * half_fov)
    }
}

fn aspect_of((width, height): (u32, u32)) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

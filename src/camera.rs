//! Camera for the reveal view.

use glam::{Mat4, Vec3};

/// Fixed perspective camera looking down the -Z axis at the particle field.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// World position of the eye.
    pub position: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Near clip plane distance.
    pub near: f32,
    /// Far clip plane distance.
    pub far: f32,
}

impl Camera {
    /// Create a camera with the reveal's default framing: 60° fov, eye at
    /// z = 300 looking at the origin.
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 300.0),
            fov_y: 60.0_f32.to_radians(),
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Calculate the projection matrix for rendering.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Calculate the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_looks_down_negative_z() {
        let camera = Camera::new(1.0);
        let origin_in_view = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!((origin_in_view.x).abs() < 1e-5);
        assert!((origin_in_view.y).abs() < 1e-5);
        assert!((origin_in_view.z + 300.0).abs() < 1e-3);
    }

    #[test]
    fn test_set_aspect() {
        let mut camera = Camera::new(1.0);
        camera.set_aspect(16.0 / 9.0);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
    }
}

//! Pointer-to-image coordinate projection.
//!
//! A pointer position on the render surface is carried into the source
//! image's pixel space by casting a camera ray through the normalized device
//! coordinate and intersecting it with the field's z = 0 plane. Positions
//! that land outside the image are discarded, not clamped.

use glam::{Vec2, Vec3};

use crate::camera::Camera;

/// Projects pointer NDC positions into image pixel coordinates.
#[derive(Debug, Clone, Copy)]
pub struct InteractionMapper {
    width: f32,
    height: f32,
}

impl InteractionMapper {
    /// Create a mapper for an image of the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    /// Map a pointer position in NDC (x right, y up, both in [-1, 1]) to
    /// image pixel coordinates.
    ///
    /// Returns `None` when the ray misses the z = 0 plane or the hit falls
    /// outside the image; such interactions are dropped for the tick.
    pub fn map_to_image(&self, ndc: Vec2, camera: &Camera) -> Option<Vec2> {
        let inverse_view_proj =
            (camera.projection_matrix() * camera.view_matrix()).inverse();
        let far_point = inverse_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));

        let origin = camera.position;
        let direction = (far_point - origin).normalize();
        if direction.z.abs() < f32::EPSILON {
            return None;
        }

        let t = -origin.z / direction.z;
        if t <= 0.0 {
            return None;
        }
        let hit = origin + direction * t;

        // The field is centered in world space; undo the centering and flip y
        // back into image space.
        let u = (hit.x + self.width / 2.0) / self.width;
        let v = 1.0 - (hit.y + self.height / 2.0) / self.height;
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }

        Some(Vec2::new(u * self.width, v * self.height))
    }
}

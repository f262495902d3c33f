use glam::{Vec2, Vec3};

use crate::world::Camera;

/// Per-frame snapshot of everything the projection math reads from the
/// viewer: position, yaw basis and screen geometry.
///
/// Built once per frame (or per portal pass) and passed by reference into
/// every entry point.
#[derive(Clone, Copy, Debug)]
pub struct ViewContext {
    pub pos: Vec3,
    pub sin: f32,
    pub cos: f32,
    /// Screen width in columns.
    pub width: i32,
    pub center_x: f32,
    pub center_y: f32,
    /// Pixels per map unit at depth 1, horizontally.
    pub focal: f32,
    /// Pixels per map unit at depth 1, vertically.
    pub focal_y: f32,
    /// `tan(fov/2)`.
    pub focal_tangent: f32,
}

impl ViewContext {
    pub fn new(camera: &Camera, width: usize, height: usize) -> Self {
        let (sin, cos) = camera.yaw().sin_cos();
        let focal = camera.screen_scale(width);
        Self {
            pos: camera.pos(),
            sin,
            cos,
            width: width as i32,
            center_x: width as f32 * 0.5,
            center_y: height as f32 * 0.5,
            focal,
            focal_y: focal,
            focal_tangent: camera.focal_tangent(),
        }
    }

    /// Offset of `p` from the eye on the X–Y plane.
    #[inline]
    pub fn delta(&self, p: Vec2) -> Vec2 {
        p - self.pos.truncate()
    }

    /// View-relative offset → (lateral, depth).
    #[inline]
    pub fn to_view(&self, d: Vec2) -> Vec2 {
        Vec2::new(d.x * self.sin - d.y * self.cos, d.x * self.cos + d.y * self.sin)
    }

    /// Depth of a view-relative offset along the forward axis.
    #[inline]
    pub fn depth(&self, d: Vec2) -> f32 {
        d.x * self.cos + d.y * self.sin
    }
}

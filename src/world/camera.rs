use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::config::RenderConfig;

/// Eye the wall sprites are projected for.
///
/// Heading only; there is no pitch.  `pos.z` is the absolute eye height.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pos: Vec3,
    /// Radians, 0 = +X, counter-clockwise.
    yaw: f32,
    /// Horizontal field of view, radians.
    fov: f32,
}

impl Camera {
    pub fn new(pos: Vec3, yaw: f32, fov: f32) -> Self {
        Self {
            pos,
            yaw: yaw.rem_euclid(TAU),
            fov,
        }
    }

    /// Camera using the configured field of view.
    pub fn with_config(pos: Vec3, yaw: f32, config: &RenderConfig) -> Self {
        Self::new(pos, yaw, config.fov_degrees.to_radians())
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// World X–Y point → (lateral, depth); lateral grows to the right.
    pub fn to_cam(&self, p: Vec2) -> Vec2 {
        let d = p - self.pos.truncate();
        Vec2::new(d.dot(self.right()), d.dot(self.forward()))
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    #[inline]
    pub fn forward(&self) -> Vec2 {
        Vec2::from_angle(self.yaw)
    }

    #[inline]
    pub fn right(&self) -> Vec2 {
        let f = self.forward();
        Vec2::new(f.y, -f.x)
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Walk `forward` units ahead and `side` units to the right.
    pub fn step(&mut self, forward: f32, side: f32) {
        let d = self.forward() * forward + self.right() * side;
        self.pos += d.extend(0.0);
    }

    /// Positive turns left.
    pub fn turn(&mut self, delta_yaw: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(TAU);
    }

    /*───────────────── projection helpers ──────────────────*/

    /// Pixels per map unit at depth 1 for a `w`-column screen.
    #[inline]
    pub fn screen_scale(&self, w: usize) -> f32 {
        w as f32 * 0.5 / self.focal_tangent()
    }

    /// `tan(fov/2)`.
    #[inline]
    pub fn focal_tangent(&self) -> f32 {
        (self.fov * 0.5).tan()
    }
}

//! Portal windows and per-column portal occlusion for sprites.

use glam::Vec2;
use smallvec::SmallVec;

use crate::renderer::software::wallsprite::VisibleSprite;

/// Screen columns `left..right` the current portal pass may touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortalWindow {
    pub left: i32,
    pub right: i32,
    /// Identifies the portal pass; 0 is the main view.
    pub uniq: u32,
}

impl PortalWindow {
    /// The whole screen, main view.
    pub fn full(width: usize) -> Self {
        Self {
            left: 0,
            right: width as i32,
            uniq: 0,
        }
    }
}

/// Decides whether a sprite column is hidden behind a portal boundary.
pub trait PortalClip {
    /// `true` when column `x` of `spr` must not be drawn.
    fn clip_sprite_column(&self, x: i32, spr: &VisibleSprite) -> bool;
}

/// No portals: nothing is ever clipped.
pub struct NoPortals;

impl PortalClip for NoPortals {
    #[inline]
    fn clip_sprite_column(&self, _x: i32, _spr: &VisibleSprite) -> bool {
        false
    }
}

/// A portal line drawn this frame, as seen on screen.
#[derive(Clone, Copy, Debug)]
pub struct PortalSeg {
    /// Columns `x1..x2` covered by the seg.
    pub x1: i32,
    pub x2: i32,
    /// Portal pass the seg was drawn in.
    pub portal_uniq: u32,
    /// Line endpoints in world space; the front side is on the right of
    /// `v1 → v2`.
    pub v1: Vec2,
    pub v2: Vec2,
}

impl PortalSeg {
    /// World point strictly behind the line.
    fn point_behind(&self, p: Vec2) -> bool {
        let d = self.v2 - self.v1;
        (p.y - self.v1.y) * d.x + (self.v1.x - p.x) * d.y > f32::EPSILON
    }
}

/// Portal segs collected during the opaque pass.
#[derive(Default)]
pub struct PortalSegs {
    segs: SmallVec<[PortalSeg; 8]>,
    /// Sprites seen from the root of a skybox are never portal-clipped.
    pub in_skybox: bool,
}

impl PortalSegs {
    pub fn push(&mut self, seg: PortalSeg) {
        self.segs.push(seg);
    }

    pub fn clear(&mut self) {
        self.segs.clear();
        self.in_skybox = false;
    }
}

impl PortalClip for PortalSegs {
    fn clip_sprite_column(&self, x: i32, spr: &VisibleSprite) -> bool {
        if self.in_skybox {
            return false;
        }
        let pos = spr.gpos.truncate();
        self.segs.iter().any(|seg| {
            seg.portal_uniq == spr.portal_uniq
                && seg.point_behind(pos)
                && x >= seg.x1
                && x < seg.x2
        })
    }
}

use glam::Vec2;

use crate::{
    fixed::{FRACUNIT, Fixed},
    renderer::software::view::ViewContext,
};

/// Edges nearer than this are not projected.
pub const TOO_CLOSE_Z: f32 = 1.0;

/// A plane segment transformed to view space and mapped to screen columns.
///
/// `tleft`/`tright` keep the unclipped (lateral, depth) edge points; the
/// screen span `sx1..sx2` and edge depths `sz1`/`sz2` are already cut to the
/// view frustum.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WallCoords {
    pub tleft: Vec2,
    pub tright: Vec2,
    pub sx1: i32,
    pub sx2: i32,
    pub sz1: f32,
    pub sz2: f32,
}

impl WallCoords {
    /// Project the view-relative segment `left → right`.
    ///
    /// Returns `None` when the segment is off either side of the frustum,
    /// nearer than `too_close`, or seen from behind (`sx2 <= sx1`).
    pub fn init(left: Vec2, right: Vec2, too_close: f32, view: &ViewContext) -> Option<Self> {
        let tleft = view.to_view(left);
        let tright = view.to_view(right);

        // frustum space: the view edges are x = ±y
        let ft = view.focal_tangent;
        let (lx, ly) = (tleft.x, tleft.y * ft);
        let (rx, ry) = (tright.x, tright.y * ft);
        let cx = view.center_x;

        let (sx1, sz1) = if lx >= -ly {
            if lx > ly || ly == 0.0 {
                return None; // left edge is off the right side
            }
            ((cx + lx * cx / ly).round() as i32, tleft.y)
        } else {
            if rx < -ry {
                return None; // whole segment is off the left side
            }
            let den = lx - rx - ry + ly;
            if den == 0.0 {
                return None;
            }
            (0, (ly + (ry - ly) * (lx + ly) / den) / ft)
        };

        if sz1 < too_close {
            return None;
        }

        let (sx2, sz2) = if rx <= ry {
            if rx < -ry || ry == 0.0 {
                return None; // right edge is off the left side
            }
            ((cx + rx * cx / ry).round() as i32, tright.y)
        } else {
            if lx > ly {
                return None; // whole segment is off the right side
            }
            let den = ry - ly - rx + lx;
            if den == 0.0 {
                return None;
            }
            (view.width, (ly + (ry - ly) * (lx - ly) / den) / ft)
        };

        if sz2 < too_close || sx2 <= sx1 {
            return None;
        }

        Some(Self {
            tleft,
            tright,
            sx1,
            sx2,
            sz1,
            sz2,
        })
    }
}

/// Screen-linear coefficients for perspective-correct texture mapping.
///
/// For a column centred at `x' = x + 0.5 - center_x` the fraction along the
/// plane is `(uoz_org + uoz_step·x') / (invz_org + invz_step·x')`.
#[derive(Clone, Copy, Debug)]
pub struct WallTmapVals {
    pub uoz_org: f32,
    pub uoz_step: f32,
    pub invz_org: f32,
    pub invz_step: f32,
}

impl WallTmapVals {
    pub fn from_wall_coords(wallc: &WallCoords, view: &ViewContext) -> Self {
        let l = wallc.tleft;
        let r = wallc.tright;
        Self {
            uoz_org: -l.x * view.focal,
            uoz_step: l.y,
            invz_org: (r.x - l.x) * view.focal,
            invz_step: l.y - r.y,
        }
    }
}

/// Per-column texel offsets and vertical steps for `x1..x2`.
#[derive(Clone, Debug, Default)]
pub struct ProjectedWallTexcoords {
    x1: i32,
    u_pos: Vec<Fixed>,
    v_step: Vec<f32>,
}

impl ProjectedWallTexcoords {
    /// `tex_width` is in texels; `u_pos` comes out in 16.16 texels clamped
    /// to `0 ..= (tex_width << 16) - 1`.  `v_step` is map units per screen
    /// row at that column's depth.
    pub fn project(
        tex_width: usize,
        x1: i32,
        x2: i32,
        wallc: &WallCoords,
        tmap: &WallTmapVals,
        view: &ViewContext,
    ) -> Self {
        let count = (x2 - x1).max(0) as usize;
        let mut u_pos = Vec::with_capacity(count);
        let mut v_step = Vec::with_capacity(count);

        let max_u = (tex_width as i64 * FRACUNIT as i64 - 1).max(0) as f32;
        let xrepeat = tex_width as f32 * FRACUNIT as f32;
        let dz = wallc.tright.y - wallc.tleft.y;

        let x0 = x1 as f32 + 0.5 - view.center_x;
        let mut uoz = tmap.uoz_org + tmap.uoz_step * x0;
        let mut invz = tmap.invz_org + tmap.invz_step * x0;

        for _ in 0..count {
            let t = if invz != 0.0 { uoz / invz } else { 0.0 };
            u_pos.push((t * xrepeat).clamp(0.0, max_u) as Fixed);
            v_step.push((wallc.tleft.y + t * dz) / view.focal_y);
            uoz += tmap.uoz_step;
            invz += tmap.invz_step;
        }

        Self { x1, u_pos, v_step }
    }

    #[inline]
    pub fn u_pos(&self, x: i32) -> Fixed {
        self.u_pos[(x - self.x1) as usize]
    }

    #[inline]
    pub fn v_step(&self, x: i32) -> f32 {
        self.v_step[(x - self.x1) as usize]
    }

    /// Mirror every column: `u → (tex_width << 16) - 1 - u`.
    pub fn flip_horizontal(&mut self, tex_width: usize) {
        let right = (tex_width as Fixed) * FRACUNIT - 1;
        for u in &mut self.u_pos {
            *u = right - *u;
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/

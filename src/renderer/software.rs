//! ---------------------------------------------------------------------------
//! Classic software (CPU) column renderer
//!
//! * Fills a frame-buffer of **0xAARRGGBB** pixels.
//! * Sprites arrive as masked columns, already split and lit by the
//!   wall-sprite stage; this back-end only clips, shades and blends.
//! * The clip bands it hands out are whatever the opaque pass left behind;
//!   with no opaque pass they are fully open.
//! ---------------------------------------------------------------------------

pub mod light;
pub mod portal;
pub mod registry;
pub mod style;
pub mod view;
pub mod wallcoords;
pub mod wallsprite;

pub use light::{CameraLight, ColormapLight, LightVisibility};
pub use portal::{NoPortals, PortalClip, PortalSeg, PortalSegs, PortalWindow};
pub use registry::{FrameArena, SpriteHandle, VisibleSpriteList};
pub use style::{DrawerStyle, RenderStyle, SpriteBlend};
pub use view::ViewContext;
pub use wallsprite::{
    ActorFlags, ProjectionContext, RenderContext, RenderFlags, SpriteShading, VisibleSprite,
    WallSpriteThing, project, render,
};

use log::trace;

use crate::{
    fixed::{Fixed, fixed_int, fixed_to_float, float_to_fixed},
    renderer::{ClipBands, ColumnDrawer, MaskedColumn, Renderer, Resources, Rgba},
    world::{Rgb, TRANSPARENT},
};

/// Background the scratch buffer is cleared to.
const CLEAR_COLOR: Rgba = 0xFF_202020;

/// Row offsets sampled by the fuzz effect; walked cyclically.
const FUZZ_OFFSETS: [i32; 16] = [1, -1, 1, -1, 1, 1, -1, 1, 1, -1, 1, 1, 1, -1, 1, -1];

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

/// Doom-style column renderer.
#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    /* clip bands survive across columns */
    bands: ClipBands,
    width: usize,
    height: usize,
    fuzz_pos: usize,
}

impl Software {
    /// Narrow the clip bands, e.g. with the rows covered by opaque geometry.
    pub fn clip_bands_mut(&mut self) -> &mut ClipBands {
        &mut self.bands
    }

    /// Finished pixels of the current frame.
    pub fn pixels(&self) -> &[Rgba] {
        &self.scratch
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.scratch.resize(w * h, 0);
        }

        /* dark-grey clear */
        self.scratch.fill(CLEAR_COLOR);
        self.bands = ClipBands::open(w, h);
        self.fuzz_pos = 0;
    }

    fn clip_bands(&self) -> ClipBands {
        self.bands.clone()
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

impl ColumnDrawer for Software {
    fn draw_masked_column(
        &mut self,
        style: &DrawerStyle,
        column: &MaskedColumn<'_>,
        res: &Resources<'_>,
    ) {
        if column.x < 0 || column.x as usize >= self.width {
            return;
        }
        let tex = match res.textures.texture(column.texture) {
            Ok(tex) => tex,
            Err(e) => {
                trace!("column {} skipped: {e}", column.x);
                return;
            }
        };
        let cmap = match res.colormaps.colormap(style.light.colormap) {
            Ok(cmap) => cmap,
            Err(e) => {
                trace!("column {} skipped: {e}", column.x);
                return;
            }
        };
        let Some((y0, y1)) = self.visible_rows(column, tex.h) else {
            return;
        };

        let shade = cmap.shade(style.light.index);
        let palette = res.colormaps.palette();
        let translation = style
            .translation
            .and_then(|t| res.colormaps.translation(t).ok());

        // fill colours are lit once per column
        let fill = match style.blend {
            SpriteBlend::Stencil { fill, .. } | SpriteBlend::Shaded { fill, .. } => {
                palette.rgb(shade[fill as usize])
            }
            _ => Rgb::BLACK,
        };

        let col = column.x as usize;
        let u = column.texel_column(tex.w);
        let last_row = tex.h as i32 - 1;
        let mut frac: Fixed = float_to_fixed(
            (y0 as f32 + 0.5 - column.spr_top_screen) * fixed_to_float(column.iscale),
        );

        for y in y0..y1 {
            let v = fixed_int(frac).clamp(0, last_row) as usize;
            frac += column.iscale;

            let raw = tex.texel(u, v);
            if raw == TRANSPARENT {
                continue;
            }
            let idx = translation.map_or(raw, |t| t[raw as usize]);
            let at = y as usize * self.width + col;
            let dst = Rgb::from_argb(self.scratch[at]);

            let out = match style.blend {
                SpriteBlend::Opaque => palette.rgb(shade[idx as usize]),
                SpriteBlend::Translucent { alpha } => {
                    mix(dst, palette.rgb(shade[idx as usize]), alpha)
                }
                SpriteBlend::Add { alpha } => add(dst, palette.rgb(shade[idx as usize]), alpha),
                SpriteBlend::Subtract { alpha } => {
                    subtract(dst, palette.rgb(shade[idx as usize]), alpha)
                }
                SpriteBlend::Stencil {
                    alpha, additive, ..
                } => {
                    if additive {
                        add(dst, fill, alpha)
                    } else {
                        mix(dst, fill, alpha)
                    }
                }
                SpriteBlend::Shaded {
                    alpha, additive, ..
                } => {
                    let coverage = alpha * raw as f32 / 255.0;
                    if additive {
                        add(dst, fill, coverage)
                    } else {
                        mix(dst, fill, coverage)
                    }
                }
                SpriteBlend::Fuzz => self.fuzz(col, y),
            };
            self.scratch[at] = out.to_argb();
        }
    }
}

/*──────────────────────── column rendering ───────────────────────────*/

impl Software {
    /// Screen rows `y0..y1` of this column inside the clip bands, if any.
    fn visible_rows(&self, column: &MaskedColumn<'_>, tex_h: usize) -> Option<(i32, i32)> {
        let col = column.x as usize;
        let a = column.spr_top_screen;
        let b = a + tex_h as f32 * column.spr_y_scale;
        let (top, bot) = if a <= b { (a, b) } else { (b, a) };

        let ceil = column.ceiling_clip.get(col).map_or(-1, |&c| c as i32);
        let floor = column
            .floor_clip
            .get(col)
            .map_or(self.height as i32, |&f| f as i32);

        /* pixel centres inside [top, bot) */
        let y0 = ((top - 0.5).ceil() as i32).max(ceil + 1).max(0);
        let y1 = ((bot - 0.5).ceil() as i32).min(floor).min(self.height as i32);
        (y0 < y1).then_some((y0, y1))
    }

    /// Darkened copy of a nearby pixel in the same column.
    fn fuzz(&mut self, col: usize, y: i32) -> Rgb {
        let off = FUZZ_OFFSETS[self.fuzz_pos % FUZZ_OFFSETS.len()];
        self.fuzz_pos = self.fuzz_pos.wrapping_add(1);
        let src_y = (y + off).clamp(0, self.height as i32 - 1) as usize;
        let src = Rgb::from_argb(self.scratch[src_y * self.width + col]);
        mix(src, Rgb::BLACK, 0.25)
    }
}

/*──────────────────────── blending helpers ───────────────────────────*/

#[inline]
fn channel_mix(d: u8, s: u8, a: f32) -> u8 {
    (d as f32 + (s as f32 - d as f32) * a).round().clamp(0.0, 255.0) as u8
}

fn mix(dst: Rgb, src: Rgb, alpha: f32) -> Rgb {
    Rgb::new(
        channel_mix(dst.r, src.r, alpha),
        channel_mix(dst.g, src.g, alpha),
        channel_mix(dst.b, src.b, alpha),
    )
}

fn add(dst: Rgb, src: Rgb, alpha: f32) -> Rgb {
    let ch = |d: u8, s: u8| (d as f32 + s as f32 * alpha).round().min(255.0) as u8;
    Rgb::new(ch(dst.r, src.r), ch(dst.g, src.g), ch(dst.b, src.b))
}

fn subtract(dst: Rgb, src: Rgb, alpha: f32) -> Rgb {
    let ch = |d: u8, s: u8| (d as f32 - s as f32 * alpha).round().max(0.0) as u8;
    Rgb::new(ch(dst.r, src.r), ch(dst.g, src.g), ch(dst.b, src.b))
}

/*──────────────────────────────── Tests ───────────────────────────────*/

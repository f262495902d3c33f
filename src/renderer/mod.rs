//! Rendering abstraction layer.
//!
//! *The wall-sprite stages never touch a pixel buffer directly.*
//! They hand finished [`MaskedColumn`]s to a type that implements
//! [`ColumnDrawer`]; [`software::Software`] is the CPU back-end that turns
//! them into pixels.
//!
//! * Tests plug in a recording drawer to observe exactly which columns were
//!   emitted.
//! * A helper blanket-impl [`RendererExt`] adds `draw_sprites` so frame
//!   loops stay short.

use crate::{
    fixed::{Fixed, fixed_int},
    renderer::software::{
        DrawerStyle, RenderContext, VisibleSpriteList, render,
    },
    world::{ColormapBank, TextureBank, TextureId},
};

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// Read-only resources a column drawer samples from.
#[derive(Clone, Copy)]
pub struct Resources<'a> {
    pub textures: &'a TextureBank,
    pub colormaps: &'a ColormapBank,
}

/// One vertical slice of a masked (transparent-holed) texture.
///
/// Texel row `v` lands on screen row `spr_top_screen + v * spr_y_scale`;
/// a negative scale draws the texture upside down.  Rows at or above
/// `ceiling_clip[x]` and at or below `floor_clip[x]` are hidden.
#[derive(Clone, Copy, Debug)]
pub struct MaskedColumn<'a> {
    pub x: i32,
    /// Texels per screen row, 16.16.
    pub iscale: Fixed,
    pub texture: TextureId,
    /// Horizontal texel position, 16.16.
    pub u_pos: Fixed,
    /// Screen rows per texel.
    pub spr_y_scale: f32,
    pub spr_top_screen: f32,
    pub flip_vert: bool,
    pub floor_clip: &'a [i16],
    pub ceiling_clip: &'a [i16],
}

impl MaskedColumn<'_> {
    /// Texel column for a texture `width` texels wide.
    #[inline]
    pub fn texel_column(&self, width: usize) -> usize {
        fixed_int(self.u_pos).clamp(0, width as i32 - 1) as usize
    }
}

/// The pixel-column output primitive.
pub trait ColumnDrawer {
    fn draw_masked_column(
        &mut self,
        style: &DrawerStyle,
        column: &MaskedColumn<'_>,
        res: &Resources<'_>,
    );
}

/// Per-column clip rows left behind by the opaque pass.
///
/// `ceil[x]` is the last hidden row above, `floor[x]` the first hidden row
/// below.
#[derive(Default, Clone, Debug)]
pub struct ClipBands {
    pub ceil: Vec<i16>,
    pub floor: Vec<i16>,
}

impl ClipBands {
    /// Fully open bands for a `width × height` screen.
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            ceil: vec![-1; width],
            floor: vec![height as i16; width],
        }
    }
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer: ColumnDrawer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Clip rows the sprite pass must respect this frame.
    fn clip_bands(&self) -> ClipBands;

    /// Finish the frame and **loan** the finished buffer to `submit`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl that walks the sprite list in draw order.
pub trait RendererExt: Renderer {
    fn draw_sprites(&mut self, sprites: &VisibleSpriteList, ctx: &mut RenderContext<'_>)
    where
        Self: Sized,
    {
        let bands = self.clip_bands();
        for spr in sprites.iter() {
            render(spr, ctx, &bands.floor, &bands.ceil, self);
        }
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;

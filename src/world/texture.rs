// Format-agnostic repository of textures decoded by the asset loader.
// The renderer interacts through `TextureId` only.

use std::collections::HashMap;

use glam::Vec2;

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// Palette index that is never drawn (masked texel).
pub const TRANSPARENT: u8 = 0;

/// CPU-side storage: 8-bit palette indices in row-major order.
///
/// Offsets follow patch conventions: `left_offset` is the distance from the
/// anchor to the left edge, `top_offset` the distance from the anchor up to
/// the top row.  `scale` divides the texel size into world units.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub left_offset: i32,
    pub top_offset: i32,
    pub scale: Vec2,
    pub pixels: Vec<u8>,
}

impl Texture {
    /// Texture with the anchor at bottom-centre, the usual placement for
    /// decorations.
    pub fn new<S: Into<String>>(name: S, w: usize, h: usize, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), w * h);
        Self {
            name: name.into(),
            w,
            h,
            left_offset: (w / 2) as i32,
            top_offset: h as i32,
            scale: Vec2::ONE,
            pixels,
        }
    }

    pub fn with_offsets(mut self, left: i32, top: i32) -> Self {
        self.left_offset = left;
        self.top_offset = top;
        self
    }

    #[inline]
    pub fn texel(&self, u: usize, v: usize) -> u8 {
        self.pixels[v * self.w + u]
    }

    /*──────────────────── world-unit dimensions ─────────────────────*/

    #[inline]
    pub fn scaled_width(&self) -> f32 {
        self.w as f32 / self.scale.x
    }

    #[inline]
    pub fn scaled_height(&self) -> f32 {
        self.h as f32 / self.scale.y
    }

    #[inline]
    pub fn scaled_left_offset(&self) -> f32 {
        self.left_offset as f32 / self.scale.x
    }

    #[inline]
    pub fn scaled_top_offset(&self) -> f32 {
        self.top_offset as f32 / self.scale.y
    }
}

/// 8×8 two-tone checker, the stand-in for a missing decal.
impl Default for Texture {
    fn default() -> Self {
        const LIGHT_IDX: u8 = 8;
        const DARK_IDX: u8 = 16;
        let pixels = (0..64)
            .map(|i| if (i % 8 + i / 8) % 2 == 0 { LIGHT_IDX } else { DARK_IDX })
            .collect();
        Texture::new("CHECKER", 8, 8, pixels)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    #[error("texture id {0} out of range")]
    BadId(TextureId),
}

/// Decal pictures by name and by `TextureId`.
///
/// Id **0** is always the missing-texture checker; a sprite whose picture
/// id is out of range is skipped, never drawn with garbage.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    /// Bank holding only `missing` (as `"MISSING"`, id 0).
    pub fn new(missing: Texture) -> Self {
        Self {
            by_name: HashMap::from([("MISSING".to_owned(), NO_TEXTURE)]),
            data: vec![missing],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Pictures stored, the missing one included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` while only the missing picture is present.
    pub fn is_empty(&self) -> bool {
        self.data.len() <= 1
    }

    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Register `tex` under `name`; names are unique.
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/

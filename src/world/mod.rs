mod camera;
mod colormap;
mod texture;

pub use camera::Camera;

pub use colormap::{
    Colormap, ColormapBank, ColormapError, ColormapId, FULL_NORMAL_LIGHT, NUMCOLORMAPS, Palette,
    Rgb, TranslationId,
};

pub use texture::{NO_TEXTURE, TRANSPARENT, Texture, TextureBank, TextureError, TextureId};

/// Sector index in the caller's level data.
pub type SectorId = u16;

/// What a sprite needs from its sector: identity and ambient light.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectorRef {
    pub id: SectorId,
    pub light_level: i16,
}

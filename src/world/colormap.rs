// Light/fog shade tables, palette and colour translations.
//
// A `Colormap` is NUMCOLORMAPS remap tables from palette index to palette
// index, table 0 being full brightness and the last one fully faded.  Tables
// are keyed by (light colour, fade colour, desaturation); asking for the same
// key twice hands back the same `ColormapId`.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use log::debug;

/// Shade tables per colormap.
pub const NUMCOLORMAPS: usize = 32;

pub type ColormapId = u16;
pub type TranslationId = u16;

/// Plain white light fading to black, always present with id 0.
pub const FULL_NORMAL_LIGHT: ColormapId = 0;

/// 8-bit RGB triple.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub fn is_black(self) -> bool {
        self == Self::BLACK
    }

    pub fn inverse(self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// Pack as 0xAARRGGBB with an opaque alpha.
    #[inline]
    pub fn to_argb(self) -> u32 {
        0xFF00_0000 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    #[inline]
    pub fn from_argb(c: u32) -> Self {
        Self::new((c >> 16) as u8, (c >> 8) as u8, c as u8)
    }
}

pub struct Palette(pub [u32; 256]);
impl Default for Palette {
    fn default() -> Self {
        Palette([0u32; 256])
    }
}
impl Index<usize> for Palette {
    type Output = u32;
    fn index(&self, idx: usize) -> &u32 {
        &self.0[idx]
    }
}
impl IndexMut<usize> for Palette {
    fn index_mut(&mut self, idx: usize) -> &mut u32 {
        &mut self.0[idx]
    }
}

impl Palette {
    /// Linear grey ramp, handy for tests and tooling.
    pub fn grayscale() -> Self {
        let mut pal = Palette::default();
        for i in 0..256 {
            pal[i] = Rgb::new(i as u8, i as u8, i as u8).to_argb();
        }
        pal
    }

    #[inline]
    pub fn rgb(&self, idx: u8) -> Rgb {
        Rgb::from_argb(self[idx as usize])
    }

    /// Nearest palette entry by squared RGB distance.
    pub fn best_match(&self, c: Rgb) -> u8 {
        let mut best = 0usize;
        let mut best_dist = i32::MAX;
        for (i, &argb) in self.0.iter().enumerate() {
            let p = Rgb::from_argb(argb);
            let dr = p.r as i32 - c.r as i32;
            let dg = p.g as i32 - c.g as i32;
            let db = p.b as i32 - c.b as i32;
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best = i;
                if dist == 0 {
                    break;
                }
            }
        }
        best as u8
    }
}

/// One light/fade combination expanded into shade tables.
pub struct Colormap {
    pub color: Rgb,
    pub fade: Rgb,
    pub desaturate: u8,
    tables: Box<[[u8; 256]; NUMCOLORMAPS]>,
}

impl Colormap {
    fn build(palette: &Palette, color: Rgb, fade: Rgb, desaturate: u8) -> Self {
        let mut tables = Box::new([[0u8; 256]; NUMCOLORMAPS]);
        let desat = desaturate as i32;

        for (level, table) in tables.iter_mut().enumerate() {
            let bright = 1.0 - level as f32 / NUMCOLORMAPS as f32;
            for (c, out) in table.iter_mut().enumerate() {
                let src = palette.rgb(c as u8);
                let gray = (src.r as i32 * 77 + src.g as i32 * 143 + src.b as i32 * 37) >> 8;
                let mix = |ch: u8, tint: u8, fade: u8| -> u8 {
                    let ch = ch as i32 + ((gray - ch as i32) * desat >> 8);
                    let lit = ch as f32 * tint as f32 / 255.0;
                    (lit * bright + fade as f32 * (1.0 - bright)).clamp(0.0, 255.0) as u8
                };
                *out = palette.best_match(Rgb::new(
                    mix(src.r, color.r, fade.r),
                    mix(src.g, color.g, fade.g),
                    mix(src.b, color.b, fade.b),
                ));
            }
        }

        Self {
            color,
            fade,
            desaturate,
            tables,
        }
    }

    /// Remap table for shade `index` (0 = brightest).
    #[inline]
    pub fn shade(&self, index: usize) -> &[u8; 256] {
        &self.tables[index.min(NUMCOLORMAPS - 1)]
    }

    #[inline]
    pub fn has_fade(&self) -> bool {
        !self.fade.is_black()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ColormapError {
    #[error("colormap id {0} out of range")]
    BadId(ColormapId),

    #[error("translation id {0} out of range")]
    BadTranslation(TranslationId),
}

/// Owns the palette, every built colormap and the translation tables.
pub struct ColormapBank {
    palette: Palette,
    maps: Vec<Colormap>,
    by_key: HashMap<(Rgb, Rgb, u8), ColormapId>,
    translations: Vec<[u8; 256]>,
}

impl ColormapBank {
    pub fn new(palette: Palette) -> Self {
        let mut bank = Self {
            palette,
            maps: Vec::new(),
            by_key: HashMap::new(),
            translations: Vec::new(),
        };
        let id = bank.special_lights(Rgb::WHITE, Rgb::BLACK, 0);
        debug_assert_eq!(id, FULL_NORMAL_LIGHT);
        bank
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Find or build the colormap for this light/fade/desaturation triple.
    pub fn special_lights(&mut self, color: Rgb, fade: Rgb, desaturate: u8) -> ColormapId {
        let key = (color, fade, desaturate);
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }
        let id = self.maps.len() as ColormapId;
        debug!(
            "building colormap {id}: color={color:?} fade={fade:?} desaturate={desaturate}"
        );
        self.maps
            .push(Colormap::build(&self.palette, color, fade, desaturate));
        self.by_key.insert(key, id);
        id
    }

    pub fn colormap(&self, id: ColormapId) -> Result<&Colormap, ColormapError> {
        self.maps.get(id as usize).ok_or(ColormapError::BadId(id))
    }

    pub fn add_translation(&mut self, table: [u8; 256]) -> TranslationId {
        self.translations.push(table);
        (self.translations.len() - 1) as TranslationId
    }

    pub fn translation(&self, id: TranslationId) -> Result<&[u8; 256], ColormapError> {
        self.translations
            .get(id as usize)
            .ok_or(ColormapError::BadTranslation(id))
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/

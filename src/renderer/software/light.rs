//! Light-level → colormap selection.
//!
//! Shade and visibility are both measured in colormap units: a shade of
//! `s` with no distance light picks table `floor(s)`, and every unit of
//! visibility brightens the result by one table, up to [`MAXLIGHTVIS`].

use crate::{
    config::RenderConfig,
    renderer::software::{view::ViewContext, wallcoords::WallCoords},
    world::{ColormapBank, ColormapId, FULL_NORMAL_LIGHT, NUMCOLORMAPS, Rgb},
};

/// Depth floor for distance lighting.
pub const MINZ: f32 = 4.0;

/// Most colormap steps distance lighting may add.
pub const MAXLIGHTVIS: f32 = 24.0;

/// Screen width the visibility constant is calibrated against at 90°.
const BASE_FOCAL: f32 = 160.0;

/// Sector light level (0‥255) → shade.
#[inline]
pub fn light_to_shade(level: i32) -> f32 {
    (NUMCOLORMAPS * 2) as f32 - (level + 12) as f32 / 4.0
}

/// Colormap index for a distance light `vis` at `shade`.
#[inline]
pub fn palookup(vis: f32, shade: f32) -> usize {
    let idx = (shade - vis.min(MAXLIGHTVIS)).floor() as i32;
    idx.clamp(0, NUMCOLORMAPS as i32 - 1) as usize
}

/// Global visibility scalars for the current view.
#[derive(Clone, Copy, Debug)]
pub struct LightVisibility {
    wall_glob_vis: f32,
    sprite_glob_vis: f32,
}

impl LightVisibility {
    pub fn new(visibility: f32, view: &ViewContext) -> Self {
        let glob = visibility * BASE_FOCAL / view.focal_tangent;
        Self {
            wall_glob_vis: glob,
            sprite_glob_vis: glob,
        }
    }

    /// Visibility numerator for wall-like surfaces (divide by depth).
    #[inline]
    pub fn wall_glob_vis(&self) -> f32 {
        self.wall_glob_vis
    }

    /// Visibility numerator for sprites (divide by depth).
    #[inline]
    pub fn sprite_glob_vis(&self) -> f32 {
        self.sprite_glob_vis
    }
}

/// Frame-global overrides coming from the viewer (power-ups, gun flash).
#[derive(Clone, Copy, Debug, Default)]
pub struct CameraLight {
    /// Force every surface to this colormap index.
    pub fixed_light_level: Option<u8>,
    /// Replace every colormap (e.g. invulnerability).
    pub fixed_colormap: Option<ColormapId>,
    /// Extra light in steps of 16 light levels.
    pub extra_light: i32,
}

impl CameraLight {
    /// Extra light contributed to a sector, none in fog.
    #[inline]
    pub fn actual_extra_light(&self, foggy: bool) -> i32 {
        if foggy { 0 } else { self.extra_light << 4 }
    }
}

/// A colormap plus the shade table picked inside it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColormapLight {
    pub base_colormap: ColormapId,
    pub colormap_num: usize,
}

impl ColormapLight {
    /// Sprite-level light selection.
    #[allow(clippy::too_many_arguments)]
    pub fn set_colormap(
        visibility: f32,
        shade: f32,
        base_colormap: ColormapId,
        fullbright: bool,
        invert: bool,
        fade_to_black: bool,
        camera: &CameraLight,
        config: &RenderConfig,
        colormaps: &mut ColormapBank,
    ) -> Self {
        let mut base = base_colormap;
        if fade_to_black || invert {
            let key = colormaps
                .colormap(base)
                .ok()
                .map(|cm| (cm.color, cm.fade, cm.desaturate));
            if let Some((color, fade, desaturate)) = key {
                let fade = match (fade_to_black, invert) {
                    (true, true) => Rgb::WHITE,
                    (true, false) => Rgb::BLACK,
                    _ => fade.inverse(),
                };
                base = colormaps.special_lights(color, fade, desaturate);
            }
        }

        let plain_or = |base| {
            if config.fullbright_ignores_sector_color {
                FULL_NORMAL_LIGHT
            } else {
                base
            }
        };

        if let Some(fixed) = camera.fixed_colormap {
            Self {
                base_colormap: fixed,
                colormap_num: 0,
            }
        } else if let Some(level) = camera.fixed_light_level {
            Self {
                base_colormap: plain_or(base),
                colormap_num: (level as usize).min(NUMCOLORMAPS - 1),
            }
        } else if fullbright {
            Self {
                base_colormap: plain_or(base),
                colormap_num: 0,
            }
        } else {
            Self {
                base_colormap: base,
                colormap_num: palookup(visibility, shade),
            }
        }
    }
}

/// Shade table chosen for one column.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColumnLight {
    pub colormap: ColormapId,
    pub index: usize,
    /// Distance light the index was derived from (0 for overrides).
    pub light: f32,
}

impl ColumnLight {
    #[inline]
    pub fn new(colormap: ColormapId, light: f32, shade: f32) -> Self {
        Self {
            colormap,
            index: palookup(light, shade),
            light,
        }
    }
}

/// Distance light interpolated linearly in screen x between the two edges
/// of a projected plane.
#[derive(Clone, Copy, Debug)]
pub struct LightRamp {
    sx1: i32,
    left: f32,
    step: f32,
}

impl LightRamp {
    pub fn new(glob_vis: f32, wallc: &WallCoords) -> Self {
        let left = glob_vis / wallc.sz1;
        let right = glob_vis / wallc.sz2;
        Self {
            sx1: wallc.sx1,
            left,
            step: (right - left) / (wallc.sx2 - wallc.sx1) as f32,
        }
    }

    #[inline]
    pub fn at(&self, x: i32) -> f32 {
        self.left + (x - self.sx1) as f32 * self.step
    }

    #[inline]
    pub fn step(&self) -> f32 {
        self.step
    }
}

/// How a sprite's columns are lit, settled once per draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ColumnLighting {
    /// Same table for every column.
    Flat(ColumnLight),
    /// Distance lighting: `ColumnLight::new(colormap, ramp, shade)` per column.
    Distance { colormap: ColormapId, shade: f32 },
}

impl ColumnLighting {
    /// Precedence: fixed light level, fixed colormap, full-bright, distance.
    pub fn resolve(
        colormap: ColormapId,
        shade: f32,
        fullbright: bool,
        foggy: bool,
        camera: &CameraLight,
        config: &RenderConfig,
    ) -> Self {
        if let Some(level) = camera.fixed_light_level {
            Self::Flat(ColumnLight {
                colormap,
                index: (level as usize).min(NUMCOLORMAPS - 1),
                light: 0.0,
            })
        } else if let Some(fixed) = camera.fixed_colormap {
            Self::Flat(ColumnLight {
                colormap: fixed,
                index: 0,
                light: 0.0,
            })
        } else if fullbright && !foggy {
            let colormap = if config.fullbright_ignores_sector_color {
                FULL_NORMAL_LIGHT
            } else {
                colormap
            };
            Self::Flat(ColumnLight {
                colormap,
                index: 0,
                light: 0.0,
            })
        } else {
            Self::Distance { colormap, shade }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/

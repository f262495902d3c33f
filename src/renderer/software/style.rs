use crate::{
    renderer::software::light::ColumnLight,
    world::{Palette, Rgb, TranslationId},
};

/// Blend-mode selector carried by an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderStyle {
    /// Never drawn.
    None,
    #[default]
    Normal,
    Fuzzy,
    Translucent,
    Add,
    Subtract,
    /// Opaque silhouette in the fill colour.
    Stencil,
    TranslucentStencil,
    AddStencil,
    /// Texel value used as coverage of the fill colour.
    Shaded,
    AddShaded,
}

/// Blend strategy resolved once per sprite and reused for all its columns.
///
/// Fill colours are stored as unlit palette indices; the drawer only runs
/// them through the column's shade table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpriteBlend {
    Opaque,
    Translucent { alpha: f32 },
    Add { alpha: f32 },
    Subtract { alpha: f32 },
    Stencil { fill: u8, alpha: f32, additive: bool },
    Shaded { fill: u8, alpha: f32, additive: bool },
    Fuzz,
}

impl SpriteBlend {
    /// `None` when the style cannot put anything on screen.
    pub fn resolve(
        style: RenderStyle,
        alpha: f32,
        fill_color: Option<Rgb>,
        palette: &Palette,
    ) -> Option<Self> {
        let alpha = alpha.clamp(0.0, 1.0);
        let visible = alpha > 0.0;
        let fill = || palette.best_match(fill_color.unwrap_or(Rgb::BLACK));

        let blend = match style {
            RenderStyle::None => return None,
            RenderStyle::Normal => Self::Opaque,
            RenderStyle::Fuzzy => Self::Fuzz,
            RenderStyle::Translucent if alpha >= 1.0 => Self::Opaque,
            RenderStyle::Translucent if visible => Self::Translucent { alpha },
            RenderStyle::Add if visible => Self::Add { alpha },
            RenderStyle::Subtract if visible => Self::Subtract { alpha },
            RenderStyle::Stencil => Self::Stencil {
                fill: fill(),
                alpha: 1.0,
                additive: false,
            },
            RenderStyle::TranslucentStencil if visible => Self::Stencil {
                fill: fill(),
                alpha,
                additive: false,
            },
            RenderStyle::AddStencil if visible => Self::Stencil {
                fill: fill(),
                alpha,
                additive: true,
            },
            RenderStyle::Shaded if visible => Self::Shaded {
                fill: fill(),
                alpha,
                additive: false,
            },
            RenderStyle::AddShaded if visible => Self::Shaded {
                fill: fill(),
                alpha,
                additive: true,
            },
            _ => return None,
        };
        Some(blend)
    }
}

/// Everything a column drawer needs besides the column geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawerStyle {
    pub blend: SpriteBlend,
    pub translation: Option<TranslationId>,
    pub light: ColumnLight,
}

impl DrawerStyle {
    /// Settle the blend for a sprite; `None` means skip the sprite.
    pub fn set_patch_style(
        style: RenderStyle,
        alpha: f32,
        translation: Option<TranslationId>,
        fill_color: Option<Rgb>,
        palette: &Palette,
    ) -> Option<Self> {
        let blend = SpriteBlend::resolve(style, alpha, fill_color, palette)?;
        Some(Self {
            blend,
            translation,
            light: ColumnLight::default(),
        })
    }

    #[inline]
    pub fn set_colormap_light(&mut self, light: ColumnLight) {
        self.light = light;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(style: RenderStyle, alpha: f32) -> Option<SpriteBlend> {
        SpriteBlend::resolve(style, alpha, None, &Palette::grayscale())
    }

    #[test]
    fn invisible_styles_collapse() {
        let pal = Palette::grayscale();
        assert_eq!(resolve(RenderStyle::None, 1.0), None);
        assert_eq!(resolve(RenderStyle::Translucent, 0.0), None);
        assert_eq!(resolve(RenderStyle::Add, -0.5), None);
        assert_eq!(resolve(RenderStyle::Shaded, 0.0), None);
        assert!(DrawerStyle::set_patch_style(RenderStyle::AddStencil, 0.0, None, None, &pal).is_none());
    }

    #[test]
    fn opaque_translucency_is_normal() {
        assert_eq!(resolve(RenderStyle::Translucent, 1.0), Some(SpriteBlend::Opaque));
        assert_eq!(
            resolve(RenderStyle::Translucent, 0.4),
            Some(SpriteBlend::Translucent { alpha: 0.4 })
        );
        // normal ignores alpha entirely
        assert_eq!(resolve(RenderStyle::Normal, 0.0), Some(SpriteBlend::Opaque));
    }

    #[test]
    fn stencil_fill_is_matched_once_into_the_palette() {
        let pal = Palette::grayscale();
        assert_eq!(
            SpriteBlend::resolve(RenderStyle::AddStencil, 2.0, Some(Rgb::new(90, 90, 90)), &pal),
            Some(SpriteBlend::Stencil {
                fill: 90,
                alpha: 1.0,
                additive: true
            })
        );
        assert_eq!(
            SpriteBlend::resolve(RenderStyle::Shaded, 0.5, Some(Rgb::WHITE), &pal),
            Some(SpriteBlend::Shaded {
                fill: 255,
                alpha: 0.5,
                additive: false
            })
        );
        let style =
            DrawerStyle::set_patch_style(RenderStyle::Stencil, 0.0, Some(3), None, &pal).unwrap();
        assert_eq!(style.translation, Some(3));
        assert_eq!(
            style.blend,
            SpriteBlend::Stencil {
                fill: 0,
                alpha: 1.0,
                additive: false
            }
        );
    }
}

//! Wall sprites: flat decals pinned to a yaw-aligned plane.
//!
//! [`project`] turns an actor into a [`VisibleSprite`] in the frame's
//! registry; [`render`] later draws one record column by column.

use std::f32::consts::FRAC_PI_2;

use bitflags::bitflags;
use glam::{Vec2, Vec3};
use log::{trace, warn};

use crate::{
    config::RenderConfig,
    fixed::float_to_fixed,
    renderer::{
        ColumnDrawer, MaskedColumn, Resources,
        software::{
            light::{
                CameraLight, ColormapLight, ColumnLight, ColumnLighting, LightRamp,
                LightVisibility, MINZ, light_to_shade,
            },
            portal::{PortalClip, PortalWindow},
            registry::{SpriteHandle, VisibleSpriteList},
            style::{DrawerStyle, RenderStyle},
            view::ViewContext,
            wallcoords::{ProjectedWallTexcoords, TOO_CLOSE_Z, WallCoords, WallTmapVals},
        },
    },
    world::{
        ColormapBank, ColormapId, Rgb, SectorId, SectorRef, TextureBank, TextureId,
        TranslationId,
    },
};

bitflags! {
    /// Per-sprite drawing flags.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RenderFlags: u16 {
        const XFLIP      = 0x0001;
        const YFLIP      = 0x0002;
        const FULLBRIGHT = 0x0004;
    }
}

bitflags! {
    /// Actor flags the projection looks at.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ActorFlags: u32 {
        /// Always drawn at full brightness.
        const BRIGHT = 0x0000_0001;
    }
}

/// Which side of a height-transfer sector's fake flats the viewer is on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WaterFakeSide {
    #[default]
    Center,
    BelowFloor,
    AboveCeiling,
}

/// Actor fields read by the projection stage.
#[derive(Clone, Copy, Debug, Default)]
pub struct WallSpriteThing {
    /// Plane normal, radians.
    pub yaw: f32,
    pub flags: ActorFlags,
    pub style: RenderStyle,
    pub alpha: f32,
    pub fill_color: Option<Rgb>,
    pub translation: Option<TranslationId>,
    pub sector: SectorRef,
}

/// Lighting inputs decided by the caller for this sprite.
#[derive(Clone, Copy, Debug)]
pub struct SpriteShading {
    pub shade: f32,
    pub foggy: bool,
    pub base_colormap: ColormapId,
}

impl SpriteShading {
    /// Shade from the sector's light level plus the viewer's extra light.
    pub fn for_sector(
        sector: SectorRef,
        foggy: bool,
        base_colormap: ColormapId,
        camera: &CameraLight,
    ) -> Self {
        Self {
            shade: light_to_shade(sector.light_level as i32 + camera.actual_extra_light(foggy)),
            foggy,
            base_colormap,
        }
    }
}

/// One wall sprite visible this frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct VisibleSprite {
    /// Columns `x1..x2`, clamped to the portal window.
    pub x1: i32,
    pub x2: i32,
    pub wallc: WallCoords,

    pub idepth: f32,
    pub depth: f32,

    pub gpos: Vec3,
    /// Anchor minus eye on the X–Y plane.
    pub delta: Vec2,
    pub gzb: f32,
    pub gzt: f32,
    pub yscale: f32,

    pub render_flags: RenderFlags,
    pub style: RenderStyle,
    pub alpha: f32,
    pub fill_color: Option<Rgb>,
    pub translation: Option<TranslationId>,

    pub light: ColormapLight,
    pub foggy: bool,
    pub pic: TextureId,

    pub sector: SectorRef,
    pub heightsec: Option<SectorId>,
    pub fake_floor: Option<SectorId>,
    pub fake_ceiling: Option<SectorId>,
    pub fake_flat: WaterFakeSide,

    pub portal_uniq: u32,
}

/// Frame state the projection stage reads, plus the colormap cache it may
/// extend.
pub struct ProjectionContext<'a> {
    pub view: &'a ViewContext,
    pub window: PortalWindow,
    pub light: &'a LightVisibility,
    pub camera_light: &'a CameraLight,
    pub config: &'a RenderConfig,
    pub textures: &'a TextureBank,
    pub colormaps: &'a mut ColormapBank,
}

/// Frame state the draw stage reads.
pub struct RenderContext<'a> {
    pub view: &'a ViewContext,
    pub light: &'a LightVisibility,
    pub camera_light: &'a CameraLight,
    pub config: &'a RenderConfig,
    pub textures: &'a TextureBank,
    pub colormaps: &'a mut ColormapBank,
    pub portal: &'a dyn PortalClip,
}

/// Project `thing` anchored at `pos` and queue it in `sprites`.
///
/// Returns `None` when nothing of the sprite can be seen from here.
#[allow(clippy::too_many_arguments)]
pub fn project(
    thing: &WallSpriteThing,
    pos: Vec3,
    pic: TextureId,
    scale: Vec2,
    render_flags: RenderFlags,
    shading: SpriteShading,
    ctx: &mut ProjectionContext<'_>,
    sprites: &mut VisibleSpriteList,
) -> Option<SpriteHandle> {
    let tex = match ctx.textures.texture(pic) {
        Ok(tex) => tex,
        Err(e) => {
            warn!("wall sprite skipped: {e}");
            return None;
        }
    };
    let view = ctx.view;

    // The yaw is the plane normal; the edges run along the perpendicular.
    let (sin, cos) = (thing.yaw + FRAC_PI_2).sin_cos();
    let tangent = Vec2::new(cos, sin);
    let x1 = tex.scaled_left_offset() * scale.x;
    let x2 = tex.scaled_width() * scale.x;

    // Both components of the right edge step from the left edge along the
    // tangent.
    let left = pos.truncate() - tangent * x1 - view.pos.truncate();
    let right = left + tangent * x2;

    let Some(wallc) = WallCoords::init(left, right, TOO_CLOSE_Z, view) else {
        trace!("wall sprite {pic} rejected by clipper");
        return None;
    };

    let window = ctx.window;
    if wallc.sx1 >= window.right || wallc.sx2 <= window.left {
        trace!(
            "wall sprite {pic} outside portal window {}..{}",
            window.left, window.right
        );
        return None;
    }

    let delta = view.delta(pos.truncate());
    let tz = view.depth(delta);

    let top = tex.scaled_top_offset();
    let gzt = pos.z + scale.y * top;
    let gzb = pos.z + scale.y * (top - tex.scaled_height());

    let mut render_flags = render_flags;
    if thing.flags.contains(ActorFlags::BRIGHT) {
        render_flags |= RenderFlags::FULLBRIGHT;
    }

    let light = ColormapLight::set_colormap(
        ctx.light.sprite_glob_vis() / tz.max(MINZ),
        shading.shade,
        shading.base_colormap,
        render_flags.contains(RenderFlags::FULLBRIGHT),
        false,
        false,
        ctx.camera_light,
        ctx.config,
        ctx.colormaps,
    );

    let record = VisibleSprite {
        x1: wallc.sx1.max(window.left),
        x2: wallc.sx2.min(window.right),
        wallc,
        idepth: 1.0 / tz,
        depth: tz,
        gpos: pos,
        delta,
        gzb,
        gzt,
        yscale: scale.y,
        render_flags,
        style: thing.style,
        alpha: thing.alpha,
        fill_color: thing.fill_color,
        translation: thing.translation,
        light,
        foggy: shading.foggy,
        pic,
        sector: thing.sector,
        heightsec: None,
        fake_floor: None,
        fake_ceiling: None,
        fake_flat: WaterFakeSide::Center,
        portal_uniq: window.uniq,
    };

    Some(sprites.push(record))
}

/// Per-sprite values shared by every column of one draw.
struct SpriteColumns<'t> {
    pic: TextureId,
    texcoords: &'t ProjectedWallTexcoords,
    texturemid: f32,
    masked_scale_y: f32,
    flip_vert: bool,
}

impl SpriteColumns<'_> {
    #[allow(clippy::too_many_arguments)]
    fn draw_column(
        &self,
        drawer: &mut dyn ColumnDrawer,
        style: &DrawerStyle,
        x: i32,
        view: &ViewContext,
        floor_clip: &[i16],
        ceiling_clip: &[i16],
        res: &Resources<'_>,
    ) {
        let iscale = self.texcoords.v_step(x) * self.masked_scale_y;
        let spr_y_scale = 1.0 / iscale;
        let spr_top_screen = if self.flip_vert {
            view.center_y + self.texturemid * spr_y_scale
        } else {
            view.center_y - self.texturemid * spr_y_scale
        };

        drawer.draw_masked_column(
            style,
            &MaskedColumn {
                x,
                iscale: float_to_fixed(iscale),
                texture: self.pic,
                u_pos: self.texcoords.u_pos(x),
                spr_y_scale,
                spr_top_screen,
                flip_vert: self.flip_vert,
                floor_clip,
                ceiling_clip,
            },
            res,
        );
    }
}

/// Draw one registry record.
///
/// `floor_clip`/`ceiling_clip` are indexed by screen column.
pub fn render(
    spr: &VisibleSprite,
    ctx: &mut RenderContext<'_>,
    floor_clip: &[i16],
    ceiling_clip: &[i16],
    drawer: &mut dyn ColumnDrawer,
) {
    let x1 = spr.x1.max(spr.wallc.sx1);
    let x2 = spr.x2.min(spr.wallc.sx2);
    if x1 >= x2 {
        return;
    }

    let Some(mut style) = DrawerStyle::set_patch_style(
        spr.style,
        spr.alpha,
        spr.translation,
        spr.fill_color,
        ctx.colormaps.palette(),
    ) else {
        trace!("wall sprite {} invisible ({:?})", spr.pic, spr.style);
        return;
    };

    let textures = ctx.textures;
    let tex = match textures.texture(spr.pic) {
        Ok(tex) => tex,
        Err(e) => {
            warn!("wall sprite not drawn: {e}");
            return;
        }
    };
    let view = ctx.view;

    let tmap = WallTmapVals::from_wall_coords(&spr.wallc, view);
    let mut texcoords = ProjectedWallTexcoords::project(tex.w, x1, x2, &spr.wallc, &tmap, view);
    if spr.render_flags.contains(RenderFlags::XFLIP) {
        texcoords.flip_horizontal(tex.w);
    }

    let mut iyscale = tex.scale.y / spr.yscale;
    let mut texturemid = (spr.gzt - view.pos.z) * iyscale;

    // Additive decals only ever fade toward black.
    let mut usecolormap = spr.light.base_colormap;
    if spr.style == RenderStyle::Add {
        let faded = ctx
            .colormaps
            .colormap(usecolormap)
            .ok()
            .filter(|cm| cm.has_fade())
            .map(|cm| (cm.color, cm.desaturate));
        if let Some((color, desaturate)) = faded {
            usecolormap = ctx.colormaps.special_lights(color, Rgb::BLACK, desaturate);
        }
    }

    let shade = light_to_shade(
        spr.sector.light_level as i32 + ctx.camera_light.actual_extra_light(spr.foggy),
    );
    let ramp = LightRamp::new(ctx.light.wall_glob_vis(), &spr.wallc);
    let mut light = ramp.at(x1);
    let lighting = ColumnLighting::resolve(
        usecolormap,
        shade,
        spr.render_flags.contains(RenderFlags::FULLBRIGHT),
        spr.foggy,
        ctx.camera_light,
        ctx.config,
    );
    if let ColumnLighting::Flat(fixed) = lighting {
        style.set_colormap_light(fixed);
    }

    let flip_vert = spr.render_flags.contains(RenderFlags::YFLIP);
    if flip_vert {
        iyscale = -iyscale;
        texturemid -= tex.h as f32;
    }

    let columns = SpriteColumns {
        pic: spr.pic,
        texcoords: &texcoords,
        texturemid,
        masked_scale_y: iyscale,
        flip_vert,
    };
    let res = Resources {
        textures,
        colormaps: &*ctx.colormaps,
    };

    for x in x1..x2 {
        if let ColumnLighting::Distance { colormap, shade } = lighting {
            style.set_colormap_light(ColumnLight::new(colormap, light, shade));
        }
        if !ctx.portal.clip_sprite_column(x, spr) {
            columns.draw_column(drawer, &style, x, view, floor_clip, ceiling_clip, &res);
        }
        light += ramp.step();
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        renderer::{
            ClipBands,
            software::{portal::NoPortals, style::SpriteBlend},
        },
        world::{Camera, FULL_NORMAL_LIGHT, Palette, Texture},
    };
    use std::f32::consts::PI;

    const W: usize = 320;
    const H: usize = 200;
    const EYE_Z: f32 = 41.0;

    /// Column as seen by the drawer, detached from the clip slices.
    #[derive(Clone, Copy, Debug)]
    struct Emitted {
        x: i32,
        texel: usize,
        spr_y_scale: f32,
        spr_top_screen: f32,
        flip_vert: bool,
        style: DrawerStyle,
    }

    #[derive(Default)]
    struct RecordingDrawer {
        columns: Vec<Emitted>,
    }

    impl ColumnDrawer for RecordingDrawer {
        fn draw_masked_column(
            &mut self,
            style: &DrawerStyle,
            column: &MaskedColumn<'_>,
            res: &Resources<'_>,
        ) {
            let tex = res.textures.texture(column.texture).unwrap();
            self.columns.push(Emitted {
                x: column.x,
                texel: column.texel_column(tex.w),
                spr_y_scale: column.spr_y_scale,
                spr_top_screen: column.spr_top_screen,
                flip_vert: column.flip_vert,
                style: *style,
            });
        }
    }

    /// Occludes a fixed set of columns.
    struct Occlude(Vec<i32>);

    impl PortalClip for Occlude {
        fn clip_sprite_column(&self, x: i32, _spr: &VisibleSprite) -> bool {
            self.0.contains(&x)
        }
    }

    struct Scene {
        view: ViewContext,
        light: LightVisibility,
        camera_light: CameraLight,
        config: RenderConfig,
        textures: TextureBank,
        colormaps: ColormapBank,
        sprites: VisibleSpriteList,
        pic: TextureId,
        window: PortalWindow,
    }

    impl Scene {
        fn new() -> Self {
            Self::looking(0.0)
        }

        fn looking(yaw: f32) -> Self {
            let camera = Camera::new(Vec3::new(0.0, 0.0, EYE_Z), yaw, FRAC_PI_2);
            let view = ViewContext::new(&camera, W, H);
            let mut textures = TextureBank::default_with_checker();
            let pixels = (0..64 * 64).map(|i| (i % 64) as u8 + 1).collect();
            let pic = textures
                .insert("DECAL", Texture::new("DECAL", 64, 64, pixels))
                .unwrap();
            Self {
                light: LightVisibility::new(8.0, &view),
                view,
                camera_light: CameraLight::default(),
                config: RenderConfig::default(),
                textures,
                colormaps: ColormapBank::new(Palette::grayscale()),
                sprites: VisibleSpriteList::default(),
                pic,
                window: PortalWindow::full(W),
            }
        }

        /// Sprite at `pos` facing back toward the eye.
        fn facing_thing(&self) -> WallSpriteThing {
            let (s, c) = (self.view.sin, self.view.cos);
            WallSpriteThing {
                yaw: s.atan2(c) + PI,
                alpha: 1.0,
                sector: SectorRef {
                    id: 0,
                    light_level: 160,
                },
                ..WallSpriteThing::default()
            }
        }

        fn project_thing(
            &mut self,
            thing: &WallSpriteThing,
            pos: Vec3,
            flags: RenderFlags,
        ) -> Option<SpriteHandle> {
            let shading = SpriteShading::for_sector(
                thing.sector,
                false,
                FULL_NORMAL_LIGHT,
                &self.camera_light,
            );
            let mut ctx = ProjectionContext {
                view: &self.view,
                window: self.window,
                light: &self.light,
                camera_light: &self.camera_light,
                config: &self.config,
                textures: &self.textures,
                colormaps: &mut self.colormaps,
            };
            project(
                thing,
                pos,
                self.pic,
                Vec2::ONE,
                flags,
                shading,
                &mut ctx,
                &mut self.sprites,
            )
        }

        fn project_ahead(&mut self, dist: f32, flags: RenderFlags) -> Option<SpriteHandle> {
            let thing = self.facing_thing();
            let fwd = Vec2::new(self.view.cos, self.view.sin) * dist;
            self.project_thing(&thing, fwd.extend(0.0), flags)
        }

        fn draw(&mut self, handle: SpriteHandle, portal: &dyn PortalClip) -> Vec<Emitted> {
            let spr = *self.sprites.get(handle).unwrap();
            self.draw_record(&spr, portal)
        }

        fn draw_record(&mut self, spr: &VisibleSprite, portal: &dyn PortalClip) -> Vec<Emitted> {
            let bands = ClipBands::open(W, H);
            let mut drawer = RecordingDrawer::default();
            let mut ctx = RenderContext {
                view: &self.view,
                light: &self.light,
                camera_light: &self.camera_light,
                config: &self.config,
                textures: &self.textures,
                colormaps: &mut self.colormaps,
                portal,
            };
            render(spr, &mut ctx, &bands.floor, &bands.ceil, &mut drawer);
            drawer.columns
        }
    }

    #[test_log::test]
    fn anchors_behind_the_eye_are_never_queued() {
        let mut scene = Scene::new();
        let thing = scene.facing_thing();
        for pos in [
            Vec3::new(-100.0, 0.0, 0.0),
            Vec3::new(-5.0, 3.0, 0.0),
            Vec3::new(-300.0, -250.0, 20.0),
            Vec3::new(0.5, 0.0, 0.0),
        ] {
            assert!(scene.project_thing(&thing, pos, RenderFlags::empty()).is_none());
        }
        assert!(scene.sprites.is_empty());
    }

    #[test]
    fn centred_decal_at_distance_100() {
        let mut scene = Scene::new();
        let h = scene.project_ahead(100.0, RenderFlags::empty()).unwrap();
        assert_eq!(scene.sprites.len(), 1);

        let spr = scene.sprites.get(h).unwrap();
        let cx = scene.view.center_x as i32;
        assert_eq!(cx - spr.x1, spr.x2 - cx);
        // 64 units at depth 100 with a 160-pixel focal length
        let expected = 64.0 * scene.view.focal / 100.0;
        assert!(((spr.x2 - spr.x1) as f32 - expected).abs() <= 1.0);
        assert!((spr.idepth - 0.01).abs() < 1e-6);
        assert!(spr.depth > 0.0);
        assert!(spr.gzb <= spr.gzt);
        assert_eq!((spr.gzb, spr.gzt), (0.0, 64.0));
    }

    #[test]
    fn right_edge_follows_the_plane_tangent() {
        // arbitrary heading: the edges must straddle the anchor evenly
        let mut scene = Scene::looking(0.7);
        let h = scene.project_ahead(150.0, RenderFlags::empty()).unwrap();
        let spr = scene.sprites.get(h).unwrap();
        let mid = (spr.wallc.tleft + spr.wallc.tright) * 0.5;
        let anchor = scene.view.to_view(spr.delta);
        assert!((mid - anchor).length() < 1e-3, "{mid:?} vs {anchor:?}");
        assert!((spr.wallc.tleft.distance(spr.wallc.tright) - 64.0).abs() < 1e-3);
    }

    #[test_log::test]
    fn bounds_stay_inside_the_portal_window() {
        let mut scene = Scene::new();
        scene.window = PortalWindow {
            left: 130,
            right: 180,
            uniq: 4,
        };
        for dist in [20.0, 60.0, 100.0, 400.0] {
            let h = scene.project_ahead(dist, RenderFlags::empty()).unwrap();
            let spr = scene.sprites.get(h).unwrap();
            assert!(scene.window.left <= spr.x1);
            assert!(spr.x1 <= spr.x2);
            assert!(spr.x2 <= scene.window.right);
            assert_eq!(spr.portal_uniq, 4);
        }

        // entirely left of the window
        scene.window = PortalWindow {
            left: 250,
            right: 320,
            uniq: 0,
        };
        assert!(scene.project_ahead(100.0, RenderFlags::empty()).is_none());
    }

    #[test]
    fn idepth_shrinks_with_distance() {
        let mut scene = Scene::looking(1.1);
        let mut last = f32::INFINITY;
        for dist in [10.0, 50.0, 100.0, 101.0, 400.0, 2000.0] {
            let h = scene.project_ahead(dist, RenderFlags::empty()).unwrap();
            let idepth = scene.sprites.get(h).unwrap().idepth;
            assert!(idepth > 0.0 && idepth < last);
            last = idepth;
        }
    }

    #[test]
    fn projected_light_uses_sprite_visibility() {
        let mut scene = Scene::new();
        let h = scene.project_ahead(100.0, RenderFlags::empty()).unwrap();
        let spr = scene.sprites.get(h).unwrap();
        // vis 1280/100 = 12.8, shade for light 160 = 21
        assert_eq!(spr.light.colormap_num, 8);
        assert_eq!(spr.light.base_colormap, FULL_NORMAL_LIGHT);
    }

    #[test]
    fn bright_actor_marks_the_record_fullbright() {
        let mut scene = Scene::new();
        let mut thing = scene.facing_thing();
        thing.flags = ActorFlags::BRIGHT;
        let h = scene
            .project_thing(&thing, Vec3::new(100.0, 0.0, 0.0), RenderFlags::empty())
            .unwrap();
        let spr = scene.sprites.get(h).unwrap();
        assert!(spr.render_flags.contains(RenderFlags::FULLBRIGHT));
        assert_eq!(spr.light.colormap_num, 0);

        let cols = scene.draw(h, &NoPortals);
        assert!(!cols.is_empty());
        assert!(cols.iter().all(|c| c.style.light.index == 0));
    }

    #[test]
    fn draws_every_column_with_correct_vertical_placement() {
        let mut scene = Scene::new();
        let h = scene.project_ahead(100.0, RenderFlags::empty()).unwrap();
        let spr = *scene.sprites.get(h).unwrap();
        let cols = scene.draw(h, &NoPortals);

        let xs: Vec<i32> = cols.iter().map(|c| c.x).collect();
        assert_eq!(xs, (spr.x1..spr.x2).collect::<Vec<_>>());

        // top at 64, eye at 41 → 23 units above the horizon at depth 100
        let c = &cols[cols.len() / 2];
        assert!((c.spr_y_scale - 1.6).abs() < 1e-3);
        assert!((c.spr_top_screen - (100.0 - 23.0 * 1.6)).abs() < 1e-2);
        assert!(!c.flip_vert);
        assert_eq!(c.style.blend, SpriteBlend::Opaque);
    }

    #[test]
    fn vertical_flip_starts_at_the_bottom() {
        let mut scene = Scene::new();
        let h = scene.project_ahead(100.0, RenderFlags::YFLIP).unwrap();
        let cols = scene.draw(h, &NoPortals);
        let c = &cols[cols.len() / 2];
        assert!(c.flip_vert);
        assert!(c.spr_y_scale < 0.0);
        // bottom row sits 41 units below the horizon
        assert!((c.spr_top_screen - (100.0 + 41.0 * 1.6)).abs() < 1e-2);
    }

    #[test]
    fn horizontal_flip_mirrors_texels() {
        let mut scene = Scene::new();
        let plain = scene.project_ahead(100.0, RenderFlags::empty()).unwrap();
        let flipped = scene.project_ahead(100.0, RenderFlags::XFLIP).unwrap();
        let a = scene.draw(plain, &NoPortals);
        let b = scene.draw(flipped, &NoPortals);
        assert_eq!(a.len(), b.len());
        for (p, f) in a.iter().zip(&b) {
            assert_eq!(f.texel, 63 - p.texel);
        }
    }

    #[test]
    fn occluded_column_emits_nothing() {
        let mut scene = Scene::new();
        let h = scene.project_ahead(100.0, RenderFlags::empty()).unwrap();
        let mid = scene.view.center_x as i32;
        let cols = scene.draw(h, &Occlude(vec![mid]));
        assert!(cols.iter().all(|c| c.x != mid));
        assert!(cols.iter().any(|c| c.x == mid - 1));
        assert!(cols.iter().any(|c| c.x == mid + 1));
    }

    #[test]
    fn light_is_linear_and_lands_on_right_edge() {
        let mut scene = Scene::new();
        // tilt the plane so its edges sit at different depths
        let mut thing = scene.facing_thing();
        thing.yaw -= 0.9;
        let h = scene
            .project_thing(&thing, Vec3::new(120.0, 0.0, 0.0), RenderFlags::empty())
            .unwrap();
        let spr = *scene.sprites.get(h).unwrap();
        assert!(spr.wallc.sz1 != spr.wallc.sz2);

        let cols = scene.draw(h, &NoPortals);
        let lights: Vec<f32> = cols.iter().map(|c| c.style.light.light).collect();
        assert!(lights.len() > 2);

        let ramp = LightRamp::new(scene.light.wall_glob_vis(), &spr.wallc);
        let step = ramp.step();
        for pair in lights.windows(2) {
            assert!((pair[1] - pair[0] - step).abs() < 1e-3);
            assert!(if step < 0.0 { pair[1] < pair[0] } else { pair[1] > pair[0] });
        }
        let right = scene.light.wall_glob_vis() / spr.wallc.sz2;
        let end = lights[lights.len() - 1] + step;
        assert!((end - right).abs() < 1e-2 * right.abs().max(1.0));
    }

    #[test]
    fn narrowed_window_draws_the_same_columns_mid_plane() {
        let mut scene = Scene::new();
        let mut thing = scene.facing_thing();
        thing.yaw -= 0.9;
        let pos = Vec3::new(120.0, 0.0, 0.0);

        let full = scene.project_thing(&thing, pos, RenderFlags::empty()).unwrap();
        let wide = *scene.sprites.get(full).unwrap();
        let mid = (wide.x1 + wide.x2) / 2;

        scene.window = PortalWindow {
            left: mid,
            right: W as i32,
            uniq: 0,
        };
        let clamped = scene.project_thing(&thing, pos, RenderFlags::empty()).unwrap();
        let narrow = *scene.sprites.get(clamped).unwrap();
        assert_eq!(narrow.x1, mid);
        assert!(narrow.x1 > narrow.wallc.sx1);

        let all = scene.draw(full, &NoPortals);
        let part = scene.draw(clamped, &NoPortals);
        assert_eq!(part.len(), (wide.x2 - mid) as usize);
        assert_eq!(part[0].x, mid);
        for c in &part {
            let same = all.iter().find(|a| a.x == c.x).unwrap();
            assert_eq!(c.texel, same.texel, "column {}", c.x);
            assert!(
                (c.style.light.light - same.style.light.light).abs() < 1e-3,
                "column {}",
                c.x
            );
        }
    }

    #[test]
    fn fixed_light_overrides_distance() {
        let mut scene = Scene::new();
        scene.camera_light.fixed_light_level = Some(5);
        let h = scene.project_ahead(100.0, RenderFlags::empty()).unwrap();
        let cols = scene.draw(h, &NoPortals);
        assert!(cols.iter().all(|c| c.style.light.index == 5));
    }

    #[test_log::test]
    fn additive_decal_fades_to_black() {
        let mut scene = Scene::new();
        let tint = Rgb::new(255, 200, 200);
        let fog = scene.colormaps.special_lights(tint, Rgb::new(64, 64, 64), 0);

        let h = scene.project_ahead(100.0, RenderFlags::empty()).unwrap();
        let mut spr = *scene.sprites.get(h).unwrap();
        spr.style = RenderStyle::Add;
        spr.alpha = 0.5;
        spr.light.base_colormap = fog;

        let first = scene.draw_record(&spr, &NoPortals);
        let maps_after_first = scene.colormaps.len();
        let second = scene.draw_record(&spr, &NoPortals);

        let used = first[0].style.light.colormap;
        assert_ne!(used, fog);
        let cm = scene.colormaps.colormap(used).unwrap();
        assert_eq!((cm.color, cm.fade), (tint, Rgb::BLACK));
        assert_eq!(second[0].style.light.colormap, used);
        assert_eq!(scene.colormaps.len(), maps_after_first);
        assert_eq!(first[0].style.blend, SpriteBlend::Add { alpha: 0.5 });
    }

    #[test]
    fn additive_decal_without_fade_keeps_its_colormap() {
        let mut scene = Scene::new();
        let h = scene.project_ahead(100.0, RenderFlags::empty()).unwrap();
        let mut spr = *scene.sprites.get(h).unwrap();
        spr.style = RenderStyle::Add;
        spr.alpha = 0.5;
        assert_eq!(spr.light.base_colormap, FULL_NORMAL_LIGHT);

        let maps_before = scene.colormaps.len();
        let cols = scene.draw_record(&spr, &NoPortals);
        assert!(!cols.is_empty());
        assert!(cols.iter().all(|c| c.style.light.colormap == FULL_NORMAL_LIGHT));
        assert_eq!(scene.colormaps.len(), maps_before);
    }

    #[test]
    fn invisible_or_empty_sprites_touch_nothing() {
        let mut scene = Scene::new();
        let h = scene.project_ahead(100.0, RenderFlags::empty()).unwrap();
        let base = *scene.sprites.get(h).unwrap();

        let hidden = VisibleSprite {
            style: RenderStyle::Translucent,
            alpha: 0.0,
            ..base
        };
        assert!(scene.draw_record(&hidden, &NoPortals).is_empty());

        let none = VisibleSprite {
            style: RenderStyle::None,
            ..base
        };
        assert!(scene.draw_record(&none, &NoPortals).is_empty());

        let empty = VisibleSprite {
            x2: base.x1,
            ..base
        };
        assert!(scene.draw_record(&empty, &NoPortals).is_empty());
    }

    #[test]
    fn texels_cover_the_texture_left_to_right() {
        let mut scene = Scene::new();
        let h = scene.project_ahead(100.0, RenderFlags::empty()).unwrap();
        let cols = scene.draw(h, &NoPortals);
        assert!(cols[0].texel <= 1);
        assert!(cols[cols.len() - 1].texel >= 62);
    }
}

use anyhow::Context;
use clap::Parser;
use glam::{Vec2, Vec3};
use log::info;
use minifb::{Key, Window, WindowOptions};
use std::{
    f32::consts::{PI, TAU},
    time::{Duration, Instant},
};

use wallsprite_rs::{
    RenderConfig,
    renderer::{
        Renderer, RendererExt,
        software::{
            ActorFlags, CameraLight, LightVisibility, NoPortals, PortalWindow, ProjectionContext,
            RenderContext, RenderFlags, RenderStyle, Software, SpriteShading, ViewContext,
            VisibleSpriteList, WallSpriteThing, project,
        },
    },
    world::{
        Camera, ColormapBank, ColormapId, FULL_NORMAL_LIGHT, Palette, Rgb, SectorRef, TRANSPARENT,
        Texture, TextureBank, TextureId, TranslationId,
    },
};

const PLAYER_HEIGHT: f32 = 41.0;
const TURN_SPEED: f32 = 0.05;
const MOVE_SPEED: f32 = 6.0;

/// Ring of wall sprites around the viewer, drawn by the software back-end.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    #[arg(long, default_value_t = 960)]
    width: usize,
    #[arg(long, default_value_t = 600)]
    height: usize,
    /// Render this many frames without a window, then exit.
    #[arg(long)]
    frames: Option<usize>,
    /// Number of sprites on the ring.
    #[arg(long, default_value_t = 14)]
    count: usize,
    #[arg(long, default_value_t = 320.0)]
    radius: f32,
    #[arg(long, default_value_t = 8.0)]
    visibility: f32,
    #[arg(long, default_value_t = 90.0)]
    fov: f32,
    /// Full-bright sprites ignore their sector's light colour.
    #[arg(long)]
    fullbright_ignores_sector_color: bool,
}

/// One sprite of the demo scene.
struct Placed {
    thing: WallSpriteThing,
    pos: Vec3,
    pic: TextureId,
    flags: RenderFlags,
    base_colormap: ColormapId,
    foggy: bool,
}

struct Scene {
    textures: TextureBank,
    colormaps: ColormapBank,
    config: RenderConfig,
    sprites: Vec<Placed>,
}

/*──────────────────────── procedural assets ──────────────────────────*/

/// Four ramps of 64: grey, red, green, blue.
fn demo_palette() -> Palette {
    let mut pal = Palette::default();
    for i in 0..256 {
        let v = ((i % 64) * 4 + 3) as u8;
        let rgb = match i / 64 {
            0 => Rgb::new(v, v, v),
            1 => Rgb::new(v, v / 4, v / 4),
            2 => Rgb::new(v / 4, v, v / 4),
            _ => Rgb::new(v / 4, v / 4, v),
        };
        pal[i] = rgb.to_argb();
    }
    pal
}

/// Disc with a bright rim; outside the disc is see-through.
fn ring_texture(size: usize) -> Texture {
    let r = size as f32 * 0.5;
    let mut pixels = vec![TRANSPARENT; size * size];
    for y in 0..size {
        for x in 0..size {
            let d = Vec2::new(x as f32 + 0.5 - r, y as f32 + 0.5 - r).length();
            if d < r {
                let shade = (63.0 * (d / r)) as u8;
                pixels[y * size + x] = 64 + shade.max(1);
            }
        }
    }
    Texture::new("RING", size, size, pixels)
}

/// Vertical bars with gaps, tinted along the height.
fn bars_texture(w: usize, h: usize) -> Texture {
    let mut pixels = vec![TRANSPARENT; w * h];
    for y in 0..h {
        for x in 0..w {
            if (x / 4) % 2 == 0 {
                pixels[y * w + x] = 128 + (y * 63 / h.max(1)) as u8 + 1;
            }
        }
    }
    Texture::new("BARS", w, h, pixels)
}

/// Diagonal stripes on an opaque blue ground.
fn glyph_texture(size: usize) -> Texture {
    let mut pixels = vec![0u8; size * size];
    for y in 0..size {
        for x in 0..size {
            pixels[y * size + x] = if (x + y) % 16 < 5 {
                60
            } else {
                192 + ((x * 63) / size) as u8
            };
        }
    }
    Texture::new("GLYPH", size, size, pixels)
}

/// Swap the red and green ramps.
fn red_to_green() -> [u8; 256] {
    let mut table = [0u8; 256];
    for (i, out) in table.iter_mut().enumerate() {
        *out = match i / 64 {
            1 => (i + 64) as u8,
            2 => (i - 64) as u8,
            _ => i as u8,
        };
    }
    table
}

impl Scene {
    fn build(args: &Args) -> anyhow::Result<Self> {
        let mut textures = TextureBank::default_with_checker();
        let pics = [
            textures.insert("RING", ring_texture(64))?,
            textures.insert("BARS", bars_texture(48, 96))?,
            textures.insert("GLYPH", glyph_texture(64).with_offsets(32, 80))?,
        ];

        let mut colormaps = ColormapBank::new(demo_palette());
        let fog = colormaps.special_lights(Rgb::WHITE, Rgb::new(40, 40, 64), 0);
        let swap: TranslationId = colormaps.add_translation(red_to_green());

        const STYLES: [(RenderStyle, f32); 8] = [
            (RenderStyle::Normal, 1.0),
            (RenderStyle::Translucent, 0.6),
            (RenderStyle::Add, 0.8),
            (RenderStyle::Stencil, 1.0),
            (RenderStyle::Shaded, 1.0),
            (RenderStyle::Fuzzy, 1.0),
            (RenderStyle::Subtract, 0.5),
            (RenderStyle::AddStencil, 0.7),
        ];

        let sprites = (0..args.count)
            .map(|i| {
                let a = i as f32 * TAU / args.count.max(1) as f32;
                let (style, alpha) = STYLES[i % STYLES.len()];
                let foggy = i % 5 == 4;
                let mut flags = RenderFlags::empty();
                if i % 2 == 1 {
                    flags |= RenderFlags::XFLIP;
                }
                if i % 7 == 6 {
                    flags |= RenderFlags::YFLIP;
                }
                Placed {
                    thing: WallSpriteThing {
                        // face the centre of the ring
                        yaw: a + PI,
                        flags: if i % 6 == 0 {
                            ActorFlags::BRIGHT
                        } else {
                            ActorFlags::empty()
                        },
                        style,
                        alpha,
                        fill_color: Some(Rgb::new(220, 40, 40)),
                        translation: (i % 3 == 1).then_some(swap),
                        sector: SectorRef {
                            id: i as u16,
                            light_level: 96 + ((i * 37) % 160) as i16,
                        },
                    },
                    pos: Vec2::from_angle(a).extend(0.0) * args.radius,
                    pic: pics[i % pics.len()],
                    flags,
                    base_colormap: if foggy { fog } else { FULL_NORMAL_LIGHT },
                    foggy,
                }
            })
            .collect();

        Ok(Self {
            textures,
            colormaps,
            config: RenderConfig {
                fullbright_ignores_sector_color: args.fullbright_ignores_sector_color,
                visibility: args.visibility,
                fov_degrees: args.fov,
            },
            sprites,
        })
    }

    /// Project, sort and draw every sprite; returns how many were visible.
    fn render(
        &mut self,
        camera: &Camera,
        renderer: &mut Software,
        visible: &mut VisibleSpriteList,
        w: usize,
        h: usize,
    ) -> usize {
        let view = ViewContext::new(camera, w, h);
        let light = LightVisibility::new(self.config.visibility, &view);
        let camera_light = CameraLight::default();

        let mut pctx = ProjectionContext {
            view: &view,
            window: PortalWindow::full(w),
            light: &light,
            camera_light: &camera_light,
            config: &self.config,
            textures: &self.textures,
            colormaps: &mut self.colormaps,
        };
        for placed in &self.sprites {
            let shading = SpriteShading::for_sector(
                placed.thing.sector,
                placed.foggy,
                placed.base_colormap,
                &camera_light,
            );
            project(
                &placed.thing,
                placed.pos,
                placed.pic,
                Vec2::ONE,
                placed.flags,
                shading,
                &mut pctx,
                visible,
            );
        }
        visible.sort_back_to_front();
        let count = visible.len();

        let mut rctx = RenderContext {
            view: &view,
            light: &light,
            camera_light: &camera_light,
            config: &self.config,
            textures: &self.textures,
            colormaps: &mut self.colormaps,
            portal: &NoPortals,
        };
        renderer.draw_sprites(visible, &mut rctx);
        visible.reset();
        count
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let (w, h) = (args.width, args.height);

    let mut scene = Scene::build(&args)?;
    let mut camera = Camera::with_config(Vec3::new(0.0, 0.0, PLAYER_HEIGHT), 0.0, &scene.config);
    let mut renderer = Software::default();
    let mut visible = VisibleSpriteList::default();

    info!(
        "{} wall sprites on a ring of radius {}, {w}x{h}",
        scene.sprites.len(),
        args.radius
    );

    if let Some(frames) = args.frames {
        let t0 = Instant::now();
        let mut drawn = 0;
        for _ in 0..frames {
            renderer.begin_frame(w, h);
            drawn += scene.render(&camera, &mut renderer, &mut visible, w, h);
            renderer.end_frame(|_, _, _| {});
            camera.turn(TURN_SPEED);
        }
        let avg_ms = t0.elapsed().as_secs_f64() * 1000.0 / frames.max(1) as f64;
        info!(
            "{frames} frames, avg render {avg_ms:.2} ms, {:.1} sprites/frame",
            drawn as f64 / frames.max(1) as f64
        );
        return Ok(());
    }

    let mut win = Window::new("Wall sprites", w, h, WindowOptions::default())
        .context("opening window")?;
    win.set_target_fps(35);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        if win.is_key_down(Key::Left) {
            camera.turn(TURN_SPEED);
        }
        if win.is_key_down(Key::Right) {
            camera.turn(-TURN_SPEED);
        }
        if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
            camera.step(MOVE_SPEED, 0.0);
        }
        if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
            camera.step(-MOVE_SPEED, 0.0);
        }
        if win.is_key_down(Key::A) {
            camera.step(0.0, -MOVE_SPEED);
        }
        if win.is_key_down(Key::D) {
            camera.step(0.0, MOVE_SPEED);
        }

        let t0 = Instant::now();
        renderer.begin_frame(w, h);
        scene.render(&camera, &mut renderer, &mut visible, w, h);
        let mut shown = Ok(());
        renderer.end_frame(|fb, fw, fh| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            shown = win.update_with_buffer(fb, fw, fh);
        });
        shown.context("presenting frame")?;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            info!("avg render: {avg_ms:.2} ms  ({:.1} FPS)", 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}

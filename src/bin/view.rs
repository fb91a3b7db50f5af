//! Interactive viewer: renders a demo scene (or an OBJ model) into a
//! minifb window.
//!
//! ```bash
//! cargo run --release -- [--obj model.obj] [--width 800] [--height 600]
//! ```
//!
//! WASD moves, arrow keys pan/tilt, Q/E roll, Esc quits.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use minifb::{Key, Window, WindowOptions};

use yarast_rs::geometry::{FaceStyle, MeshFlags, obj::load_obj, primitives::cube};
use yarast_rs::math::vec3;
use yarast_rs::render::{PixelFormat, color};
use yarast_rs::scene::{Camera, CameraKind, Light, Scene};

#[derive(Parser)]
#[command(about = "software-rasterizer viewer")]
struct Args {
    /// OBJ model to display instead of the demo cube.
    #[arg(long)]
    obj: Option<PathBuf>,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Use an orthogonal camera instead of perspective.
    #[arg(long)]
    ortho: bool,
}

fn build_scene(args: &Args) -> Result<Scene> {
    let kind = if args.ortho {
        CameraKind::Orthogonal
    } else {
        CameraKind::Perspective
    };
    let mut camera = Camera::new(kind);
    camera.set_origin(vec3(0.0, 2.0, 8.0));
    camera.set_view_size(if args.ortho { 8.0 } else { 2.0 }, if args.ortho { 6.0 } else { 1.5 });
    camera.look_at(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0))?;

    let mut scene = Scene::new(camera);
    scene.set_background(color::rgb(0x20, 0x20, 0x20));
    scene.config.render_on_change_only = true;

    let mesh = match &args.obj {
        Some(path) => {
            let mut m = load_obj(path, None);
            m.flags |= MeshFlags::DRAW_EDGES;
            m
        }
        None => {
            let mut m = cube(2.0, FaceStyle::solid(color::rgb(0xC0, 0x30, 0x30)), color::WHITE);
            m.flags |= MeshFlags::DRAW_EDGES | MeshFlags::DRAW_OUTLINE;
            m
        }
    };
    scene.add_mesh(mesh);

    scene.add_light(Light::directional(
        vec3(6.0, 10.0, 6.0),
        vec3(-0.5, -1.0, -0.5),
        color::WHITE,
    )?);
    let fill = scene.add_light(Light::point(
        vec3(-4.0, 3.0, 4.0),
        20.0,
        color::rgb(0xFF, 0xE0, 0xA0),
    ));
    scene.light_mut(fill).aim(vec3(0.5, -0.4, -0.6))?;
    Ok(scene)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Scene-level lock: rendering and UI-driven mutation are mutually
    // exclusive, matching the core's exclusivity contract.
    let scene = Mutex::new(build_scene(&args)?);

    let mut window = Window::new(
        "yarast",
        args.width as usize,
        args.height as usize,
        WindowOptions::default(),
    )?;
    window.set_target_fps(30);

    const MOVE: f32 = 0.15;
    const TURN: f32 = 0.03;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        {
            let mut scene = scene.lock().expect("scene lock");
            let cam = scene.camera_mut();
            let forward = cam.orientation().forward();
            let right = cam.orientation().right();
            if window.is_key_down(Key::W) {
                cam.translate(forward * MOVE);
            }
            if window.is_key_down(Key::S) {
                cam.translate(forward * -MOVE);
            }
            if window.is_key_down(Key::A) {
                cam.translate(right * -MOVE);
            }
            if window.is_key_down(Key::D) {
                cam.translate(right * MOVE);
            }
            if window.is_key_down(Key::Left) {
                cam.pan(TURN)?;
            }
            if window.is_key_down(Key::Right) {
                cam.pan(-TURN)?;
            }
            if window.is_key_down(Key::Up) {
                cam.tilt(-TURN)?;
            }
            if window.is_key_down(Key::Down) {
                cam.tilt(TURN)?;
            }
            if window.is_key_down(Key::Q) {
                cam.roll(-TURN)?;
            }
            if window.is_key_down(Key::E) {
                cam.roll(TURN)?;
            }
        }

        let frame = {
            let mut scene = scene.lock().expect("scene lock");
            scene.render(args.width, args.height, PixelFormat::Bgr24)?
        };
        match frame {
            Some(frame) => {
                let words = frame.to_argb_words();
                window.update_with_buffer(&words, frame.width as usize, frame.height as usize)?;
            }
            None => window.update(),
        }
    }
    Ok(())
}

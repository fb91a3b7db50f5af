//! Offline renderer: draws the demo scene (or an OBJ model) once and
//! writes a `.bmp`.
//!
//! ```bash
//! cargo run --bin render_bmp -- out.bmp [--obj model.obj] [--width 640]
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use yarast_rs::geometry::{FaceStyle, MeshFlags, obj::load_obj, primitives::cube};
use yarast_rs::math::vec3;
use yarast_rs::render::{PixelFormat, color};
use yarast_rs::scene::{Camera, CameraKind, Light, Scene};

#[derive(Parser)]
#[command(about = "render a scene to a .bmp file")]
struct Args {
    /// Output bitmap path.
    out: PathBuf,

    /// OBJ model to render instead of the demo cube.
    #[arg(long)]
    obj: Option<PathBuf>,

    #[arg(long, default_value_t = 640)]
    width: u32,

    #[arg(long, default_value_t = 480)]
    height: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut camera = Camera::new(CameraKind::Perspective);
    camera.set_origin(vec3(3.0, 2.5, 6.0));
    camera.set_view_size(2.0, 1.5);
    camera
        .look_at(vec3(0.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0))
        .context("aim camera")?;

    let mut scene = Scene::new(camera);
    scene.set_background(color::rgb(0x18, 0x18, 0x28));

    let mesh = match &args.obj {
        Some(path) => load_obj(path, None),
        None => {
            let mut m = cube(2.0, FaceStyle::solid(color::rgb(0xC0, 0x30, 0x30)), color::WHITE);
            m.flags |= MeshFlags::DRAW_EDGES;
            m
        }
    };
    scene.add_mesh(mesh);
    scene.add_light(Light::directional(
        vec3(6.0, 10.0, 6.0),
        vec3(-0.5, -1.0, -0.5),
        color::WHITE,
    )?);

    let frame = scene
        .render(args.width, args.height, PixelFormat::Bgr24)?
        .context("zero-area render target")?;
    frame.write_bmp(&args.out).context("write bitmap")?;
    println!(
        "wrote {} ({}x{}, {} bytes)",
        args.out.display(),
        frame.width,
        frame.height,
        frame.data.len()
    );
    Ok(())
}

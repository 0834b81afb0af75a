//! `scenepick` binary: opens a viewer on a JSON mesh (or a demo scene) with optional TOML options.

use std::path::Path;

use glam::Vec3;
use scenepick::options::Options;
use scenepick::scene::{placement, MeshData};
use scenepick::{Viewer, ViewerError};

/// Three cubes in a row on a floor quad.
fn demo_scene(viewer: scenepick::ViewerBuilder) -> scenepick::ViewerBuilder {
    let floor = placement(Vec3::new(4.0, 1.0, 4.0), Vec3::new(0.0, -1.0, 0.0))
        * glam::Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2);
    [-2.5_f32, 0.0, 2.5]
        .into_iter()
        .fold(viewer, |viewer, x| {
            viewer.with_object(
                MeshData::cube(),
                None,
                placement(Vec3::splat(0.5), Vec3::new(x, 0.0, 0.0)),
            )
        })
        .with_object(MeshData::quad(), None, floor)
}

fn run() -> Result<(), ViewerError> {
    let mut args = std::env::args().skip(1);
    let mesh_path = args.next();
    let options = match args.next() {
        Some(path) => Options::load(Path::new(&path))?,
        None => Options::default(),
    };

    let builder = Viewer::builder().with_options(options);
    let builder = match mesh_path {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            let mesh = MeshData::from_json(&json)?;
            log::info!("loaded {} vertices from {path}", mesh.vertex_count());
            builder
                .with_title(format!("scenepick - {path}"))
                .with_object(mesh, None, glam::Mat4::IDENTITY)
        }
        None => demo_scene(builder),
    };
    builder.build().run()
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

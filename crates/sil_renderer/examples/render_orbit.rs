//! Render a point-cloud cube from a ring of cameras.
//!
//! Cameras are built in the OpenGL convention (look -Z, up +Y) and converted
//! to OpenCV camera-to-world before rendering, so the cube should appear
//! centered and upright in every silhouette.
//!
//! Run with: cargo run --example render_orbit -- [output-dir]

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use sil_core::CameraConvention;
use sil_renderer::{pinhole_intrinsics, render_point_cloud, Mat4, Resolution, Vec3};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let out_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("silhouettes"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    println!("Silhouette Renderer - Orbit Example");
    println!("===================================");

    let vertices = cube_surface(0.5, 24);
    println!("Point cloud: {} vertices", vertices.len());

    // OpenGL camera-to-world poses orbiting the origin
    let camera_count = 8;
    let gl_poses: Vec<Mat4> = (0..camera_count)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / camera_count as f32;
            let eye = Vec3::new(3.0 * angle.sin(), 1.5, 3.0 * angle.cos());
            Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y).inverse()
        })
        .collect();
    let extrinsics = CameraConvention::OPENGL.to_opencv(&gl_poses)?;

    // Normalized intrinsics: focal length 1, principal point at the center
    let intrinsics = vec![pinhole_intrinsics(1.0, 1.0, 0.5, 0.5); camera_count];

    let start = std::time::Instant::now();
    let canvas = render_point_cloud(&vertices, &extrinsics, &intrinsics, Resolution::default())?;
    println!("Rendered {} cameras in {:?}", canvas.batch_size(), start.elapsed());

    for camera in 0..canvas.batch_size() {
        let path = out_dir.join(format!("camera_{:03}.png", camera));
        canvas
            .to_image(camera)?
            .save(&path)
            .with_context(|| format!("failed to save {}", path.display()))?;
        println!(
            "  [{}] {} hit pixels -> {}",
            camera,
            canvas.hit_count(camera),
            path.display()
        );
    }

    Ok(())
}

/// Points on the surface of an axis-aligned cube.
fn cube_surface(half_extent: f32, steps: usize) -> Vec<Vec3> {
    let mut points = Vec::new();
    let t = |i: usize| -half_extent + 2.0 * half_extent * i as f32 / (steps - 1) as f32;

    for i in 0..steps {
        for j in 0..steps {
            let (a, b) = (t(i), t(j));
            for side in [-half_extent, half_extent] {
                points.push(Vec3::new(side, a, b));
                points.push(Vec3::new(a, side, b));
                points.push(Vec3::new(a, b, side));
            }
        }
    }

    points
}

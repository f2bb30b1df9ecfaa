//! Example: Load a camera dataset and print its poses.
//!
//! Run with: cargo run --example inspect_dataset -- data/puzzle [w2c|c2w look up right]

use std::env;

use anyhow::Context;
use sil_core::{convert_dataset, load_dataset, CameraConvention};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_dataset <dataset-dir> [<format> <look> <up> <right>]");
        println!("\nExamples:");
        println!("  cargo run --example inspect_dataset -- data/puzzle");
        println!("  cargo run --example inspect_dataset -- data/puzzle c2w -z +y +x");
        return Ok(());
    }

    let path = &args[1];
    println!("Loading dataset: {}", path);

    let mut dataset =
        load_dataset(path).with_context(|| format!("failed to load dataset {}", path))?;

    if args.len() >= 6 {
        let convention = CameraConvention::new(
            args[2].parse()?,
            args[3].parse()?,
            args[4].parse()?,
            args[5].parse()?,
        )?;
        dataset = convert_dataset(&dataset, &convention)?;
        println!("Converted poses to OpenCV camera-to-world");
    }

    println!("\n=== Dataset: {} cameras ===", dataset.camera_count());

    for (i, (pose, k)) in dataset
        .extrinsics
        .iter()
        .zip(&dataset.intrinsics)
        .enumerate()
    {
        let position = pose.transform_point3(sil_math::Vec3::ZERO);
        let look = pose.transform_vector3(sil_math::Vec3::Z);
        println!(
            "  [{}] origin ({:.2}, {:.2}, {:.2}) +Z ({:.2}, {:.2}, {:.2})",
            i, position.x, position.y, position.z, look.x, look.y, look.z
        );
        println!(
            "       fx {:.2} fy {:.2} cx {:.2} cy {:.2}",
            k.x_axis.x, k.y_axis.y, k.z_axis.x, k.z_axis.y
        );
    }

    println!("\n--- Images ---");
    for (i, image) in dataset.images.iter().enumerate() {
        println!("  [{}] {}x{}", i, image.width, image.height);
    }

    Ok(())
}

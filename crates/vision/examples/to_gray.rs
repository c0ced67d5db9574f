//! Convert an image file to grayscale and RGB PNGs.
//!
//! Usage: `cargo run --example to_gray -- <input> [out_dir]`

use std::path::{Path, PathBuf};
use vision::io::{self, DecodeOptions};
use vision::{GrayImage, RgbImage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    vision::core::init_tracing(false);
    #[cfg(not(feature = "tracing"))]
    vision::core::init_with_level(log::LevelFilter::Debug)?;

    let mut args = std::env::args().skip(1);
    let input = PathBuf::from(args.next().ok_or("missing input path")?);
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| "testout".into());

    let (raster, format) = io::image_from_file(&input, &DecodeOptions::default())?;
    let stem = input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    println!("{}: {:?} {} {}", input.display(), format, raster.kind(), raster.size());

    let mut gray = GrayImage::new();
    gray.set_image(&raster);
    io::save_gray(&gray, out_path(&out_dir, "gray", stem))?;

    let mut rgb = RgbImage::new();
    rgb.set_image(&raster);
    io::save_rgb(&rgb, out_path(&out_dir, "rgb", stem))?;

    println!("wrote {gray} and {rgb} to {}", out_dir.display());
    Ok(())
}

fn out_path(dir: &Path, prefix: &str, stem: &str) -> PathBuf {
    dir.join(format!("{prefix}-{stem}.png"))
}

//! Load decoded images into flat gray/RGB buffers and save them back.
//!
//! This crate provides:
//! - re-exports of the buffer types and conversion engine from `vision-core`
//! - (feature-gated) the codec boundary: decode PNG/JPEG/GIF/... bytes into a
//!   [`Raster`] that keeps palettes and luma/chroma planes intact, and encode
//!   rasters back to lossless PNG.
//!
//! ## Quickstart
//!
//! ```no_run
//! use vision::io::{self, DecodeOptions};
//! use vision::GrayImage;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (raster, format) = io::image_from_file("photo.jpg", &DecodeOptions::default())?;
//! let mut gray = GrayImage::new();
//! gray.set_image(&raster);
//! println!("{gray} from {format:?}");
//! io::encode(&gray.to_raster(), "photo-gray.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `vision::core`: the whole `vision-core` crate (buffers, rasters, luminance helpers).
//! - `vision::io` (feature `image`): `decode`, `image_from_file`, `encode`, and
//!   the `load_*`/`save_*` helpers.

pub use vision_core as core;

pub use vision_core::{
    ChromaSubsampling, ColorSource, GrayImage, IntGrayImage, PixelBuffer, Raster, RasterKind, Rgb,
    RgbImage, Size,
};

#[cfg(feature = "image")]
pub mod io;

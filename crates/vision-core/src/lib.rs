//! Flat pixel buffers and exact pixel-format conversion.
//!
//! This crate holds the in-memory side of image loading: [`GrayImage`],
//! [`IntGrayImage`] and [`RgbImage`] buffers that resize in place, and the
//! conversion engine that fills them from a decoded [`Raster`] and exports
//! them back. It does not decode or encode files; the `vision` crate wires a
//! codec to it.
//!
//! All luminance math is integer fixed point (BT.601 weights scaled by 2^16),
//! so results are bit-exact on every platform.
//!
//! ```
//! use vision_core::{GrayImage, NrgbaRaster, Raster, Size};
//!
//! let px = vec![200, 100, 50, 255, 200, 100, 50, 0];
//! let raster = Raster::from(NrgbaRaster::from_raw(Size::new(2, 1), 8, px).unwrap());
//!
//! let mut gray = GrayImage::new();
//! gray.set_image(&raster);
//! assert_eq!(gray.pixels(), &[124, 0]);
//! ```

mod buffer;
mod gray;
mod int_gray;
mod logger;
pub mod luma;
mod raster;
mod rgb;
mod size;

pub use buffer::PixelBuffer;
pub use gray::GrayImage;
pub use int_gray::IntGrayImage;
pub use raster::{
    ChromaSubsampling, ColorSource, GrayRaster, NrgbaRaster, PalettedRaster, Raster, RasterError,
    RasterKind, YCbCrRaster,
};
pub use rgb::{Rgb, RgbImage};
pub use size::Size;

#[cfg(feature = "tracing")]
pub use logger::{engine_directives, init_tracing};

pub use logger::{init_with_level, ENGINE_TARGETS};

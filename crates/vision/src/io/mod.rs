//! Codec boundary: bytes and files in, [`Raster`] out, and back.
//!
//! - `decode` / `image_from_file`: auto-detect the format and build the most
//!   specific raster encoding (gray, straight-alpha RGBA, palette, luma-chroma),
//!   falling back to an opaque 16-bit query source for everything else.
//! - `encode` / `encode_to_vec`: write any raster as lossless PNG.
//! - `load_gray`, `load_rgb`, `save_gray`, `save_rgb`: file-to-buffer shortcuts.

mod encode;
mod gif_frame;
mod indexed;
mod jpeg;
mod options;

pub use options::DecodeOptions;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use std::fs;
use std::path::Path;
use vision_core::{
    ColorSource, GrayImage, GrayRaster, NrgbaRaster, Raster, RasterError, RgbImage, Size,
};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced at the codec boundary.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("unrecognized image format")]
    UnknownFormat,

    #[error("failed to decode {format} image: {message}")]
    Decode {
        format: &'static str,
        message: String,
    },

    #[error("decoded planes are inconsistent: {0}")]
    Raster(#[from] RasterError),

    #[error("failed to encode png: {0}")]
    Encode(#[from] png::EncodingError),
}

impl IoError {
    /// Decoding reads from memory, so codec-level I/O errors mean truncated data.
    fn from_image(format: ImageFormat, e: image::ImageError) -> Self {
        IoError::Decode {
            format: format_name(format),
            message: e.to_string(),
        }
    }
}

/// Short lowercase name of `format` (its canonical file extension).
pub fn format_name(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("unknown")
}

/// Decode an in-memory image and report its container format.
///
/// Indexed PNGs and GIFs (first frame) keep their palette, and color JPEGs
/// keep their luma and chroma planes. Chroma comes back upsampled, so
/// [`Raster::YCbCr`] values from this function are always 4:4:4.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(bytes, options), fields(len = bytes.len()))
)]
pub fn decode(bytes: &[u8], options: &DecodeOptions) -> Result<(Raster, ImageFormat), IoError> {
    let format = image::guess_format(bytes).map_err(|_| IoError::UnknownFormat)?;

    let specific = match format {
        ImageFormat::Png if options.keep_palette => indexed::decode_indexed_png(bytes)?,
        ImageFormat::Gif if options.keep_palette => Some(gif_frame::decode_gif(bytes)?),
        ImageFormat::Jpeg if options.keep_luma_chroma => jpeg::decode_jpeg(bytes)?,
        _ => None,
    };
    let raster = match specific {
        Some(raster) => raster,
        None => decode_generic(bytes, format)?,
    };

    log::debug!(
        "decoded {} as {} raster {}",
        format_name(format),
        raster.kind(),
        raster.size()
    );
    Ok((raster, format))
}

/// Read and decode the image at `path`.
pub fn image_from_file(
    path: impl AsRef<Path>,
    options: &DecodeOptions,
) -> Result<(Raster, ImageFormat), IoError> {
    let bytes = fs::read(path.as_ref())?;
    decode(&bytes, options)
}

fn decode_generic(bytes: &[u8], format: ImageFormat) -> Result<Raster, IoError> {
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| IoError::from_image(format, e))?;
    let size = Size::new(img.width() as usize, img.height() as usize);
    let raster = match img {
        DynamicImage::ImageLuma8(buf) => {
            Raster::Gray(GrayRaster::from_raw(size, size.width, buf.into_raw())?)
        }
        DynamicImage::ImageRgba8(buf) => {
            Raster::Nrgba(NrgbaRaster::from_raw(size, size.width * 4, buf.into_raw())?)
        }
        // Gray+alpha (including gray PNGs with tRNS) is straight alpha too.
        img @ DynamicImage::ImageLumaA8(_) => Raster::Nrgba(NrgbaRaster::from_raw(
            size,
            size.width * 4,
            img.to_rgba8().into_raw(),
        )?),
        other => Raster::Other(Box::new(Rgba16Source(other.to_rgba16()))),
    };
    Ok(raster)
}

/// Straight-alpha 16-bit RGBA pixels answering the generic color query.
struct Rgba16Source(ImageBuffer<Rgba<u16>, Vec<u16>>);

impl ColorSource for Rgba16Source {
    fn size(&self) -> Size {
        Size::new(self.0.width() as usize, self.0.height() as usize)
    }

    fn rgba64(&self, x: usize, y: usize) -> [u32; 4] {
        let [r, g, b, a] = self.0.get_pixel(x as u32, y as u32).0.map(u32::from);
        [r * a / 0xffff, g * a / 0xffff, b * a / 0xffff, a]
    }
}

/// Encode `raster` as PNG bytes.
pub fn encode_to_vec(raster: &Raster) -> Result<Vec<u8>, IoError> {
    encode::encode_png(raster)
}

/// Encode `raster` as PNG and write it to `path`, creating parent directories.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(raster, path), fields(kind = %raster.kind(), size = %raster.size()))
)]
pub fn encode(raster: &Raster, path: impl AsRef<Path>) -> Result<(), IoError> {
    let path = path.as_ref();
    let bytes = encode_to_vec(raster)?;
    ensure_parent_dir(path)?;
    fs::write(path, bytes)?;
    log::debug!("wrote {} raster {} to {}", raster.kind(), raster.size(), path.display());
    Ok(())
}

/// Load the image at `path` into a new gray buffer.
pub fn load_gray(path: impl AsRef<Path>) -> Result<GrayImage, IoError> {
    let (raster, _) = image_from_file(path, &DecodeOptions::default())?;
    let mut gray = GrayImage::new();
    gray.set_image(&raster);
    Ok(gray)
}

/// Load the image at `path` into a new RGB buffer.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage, IoError> {
    let (raster, _) = image_from_file(path, &DecodeOptions::default())?;
    let mut rgb = RgbImage::new();
    rgb.set_image(&raster);
    Ok(rgb)
}

pub fn save_gray(gray: &GrayImage, path: impl AsRef<Path>) -> Result<(), IoError> {
    encode(&gray.to_raster(), path)
}

pub fn save_rgb(rgb: &RgbImage, path: impl AsRef<Path>) -> Result<(), IoError> {
    encode(&rgb.to_raster(), path)
}

fn ensure_parent_dir(path: &Path) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

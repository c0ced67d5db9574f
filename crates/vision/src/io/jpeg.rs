//! JPEG decoding with `zune-jpeg`, keeping the decoder's native YCbCr output.
//!
//! Chroma arrives upsampled to full resolution, so color JPEGs become 4:4:4
//! luma-chroma rasters. Grayscale JPEGs become gray rasters.

use super::IoError;
use vision_core::{ChromaSubsampling, GrayRaster, Raster, Size, YCbCrRaster};
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Decode `bytes` as a gray or luma-chroma raster, or `None` for component
/// layouts (CMYK, ...) better left to the generic path.
pub(super) fn decode_jpeg(bytes: &[u8]) -> Result<Option<Raster>, IoError> {
    let mut headers = JpegDecoder::new(bytes);
    headers.decode_headers().map_err(jpeg_error)?;
    let info = headers.info().ok_or_else(|| IoError::Decode {
        format: "jpeg",
        message: "missing frame header".to_string(),
    })?;
    let size = Size::new(info.width as usize, info.height as usize);

    let colorspace = match info.components {
        1 => ColorSpace::Luma,
        3 => ColorSpace::YCbCr,
        n => {
            log::debug!("jpeg with {n} components, using generic decoder");
            return Ok(None);
        }
    };

    let options = DecoderOptions::default().jpeg_set_out_colorspace(colorspace);
    let mut decoder = JpegDecoder::new_with_options(bytes, options);
    let pix = decoder.decode().map_err(jpeg_error)?;
    if decoder.get_output_colorspace() != Some(colorspace) {
        log::debug!("jpeg decoder refused {colorspace:?} output, using generic decoder");
        return Ok(None);
    }

    let raster = match colorspace {
        ColorSpace::Luma => Raster::Gray(GrayRaster::from_raw(size, size.width, pix)?),
        _ => {
            let (y, cb, cr) = split_planes(&pix, size.area())?;
            Raster::YCbCr(YCbCrRaster::from_planes(
                size,
                ChromaSubsampling::S444,
                (y, size.width),
                (cb, cr, size.width),
            )?)
        }
    };
    Ok(Some(raster))
}

fn jpeg_error(e: zune_jpeg::errors::DecodeErrors) -> IoError {
    IoError::Decode {
        format: "jpeg",
        message: format!("{e:?}"),
    }
}

/// De-interleave `Y Cb Cr` triples into three planes.
fn split_planes(pix: &[u8], area: usize) -> Result<(Vec<u8>, Vec<u8>, Vec<u8>), IoError> {
    if pix.len() < area * 3 {
        return Err(IoError::Decode {
            format: "jpeg",
            message: format!("expected {} samples, got {}", area * 3, pix.len()),
        });
    }
    let mut y = Vec::with_capacity(area);
    let mut cb = Vec::with_capacity(area);
    let mut cr = Vec::with_capacity(area);
    for px in pix[..area * 3].chunks_exact(3) {
        y.push(px[0]);
        cb.push(px[1]);
        cr.push(px[2]);
    }
    Ok((y, cb, cr))
}

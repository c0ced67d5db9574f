//! Lossless PNG output for every raster encoding.

use super::IoError;
use vision_core::{GrayRaster, PalettedRaster, Raster, Size};

/// Pixel layout handed to the PNG writer.
enum PngData {
    Gray(Vec<u8>),
    Rgba(Vec<u8>),
    Indexed {
        indices: Vec<u8>,
        rgb: Vec<u8>,
        trns: Option<Vec<u8>>,
    },
}

pub(super) fn encode_png(raster: &Raster) -> Result<Vec<u8>, IoError> {
    let size = raster.size();
    let data = match raster {
        Raster::Gray(src) => PngData::Gray(pack_gray(src)),
        Raster::Nrgba(src) => {
            let mut pix = Vec::with_capacity(size.area() * 4);
            for y in 0..size.height {
                pix.extend_from_slice(src.row(y));
            }
            PngData::Rgba(pix)
        }
        Raster::Paletted(src) => pack_indexed(src),
        Raster::YCbCr(_) | Raster::Other(_) => PngData::Rgba(query_rgba8(raster, size)),
    };
    write_png(size, data)
}

fn pack_gray(src: &GrayRaster) -> Vec<u8> {
    let size = src.size();
    let mut pix = Vec::with_capacity(size.area());
    for y in 0..size.height {
        pix.extend_from_slice(src.row(y));
    }
    pix
}

fn pack_indexed(src: &PalettedRaster) -> PngData {
    let size = src.size();
    let mut indices = Vec::with_capacity(size.area());
    for y in 0..size.height {
        indices.extend_from_slice(src.row(y));
    }
    // PNG palettes hold at most 256 entries; pad so every index is defined.
    let max_index = indices.iter().copied().max().map_or(0, usize::from);
    let entries = src.palette().len().max(max_index + 1).clamp(1, 256);
    let mut rgb = Vec::with_capacity(entries * 3);
    let mut alpha = Vec::with_capacity(entries);
    for i in 0..entries {
        let [r, g, b, a] = src.palette().get(i).copied().unwrap_or([0; 4]);
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }
    let trns = alpha.iter().any(|&a| a != 0xff).then_some(alpha);
    PngData::Indexed { indices, rgb, trns }
}

/// Straight-alpha RGBA8 from the premultiplied 16-bit query.
fn query_rgba8(raster: &Raster, size: Size) -> Vec<u8> {
    let mut pix = Vec::with_capacity(size.area() * 4);
    for y in 0..size.height {
        for x in 0..size.width {
            let [r, g, b, a] = raster.rgba64(x, y);
            let unmul = |c: u32| -> u8 {
                match a {
                    0 => 0,
                    0xffff => (c >> 8) as u8,
                    _ => ((c * 0xffff / a).min(0xffff) >> 8) as u8,
                }
            };
            pix.extend_from_slice(&[unmul(r), unmul(g), unmul(b), (a >> 8) as u8]);
        }
    }
    pix
}

fn write_png(size: Size, data: PngData) -> Result<Vec<u8>, IoError> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, size.width as u32, size.height as u32);
        encoder.set_depth(png::BitDepth::Eight);
        let pix = match data {
            PngData::Gray(pix) => {
                encoder.set_color(png::ColorType::Grayscale);
                pix
            }
            PngData::Rgba(pix) => {
                encoder.set_color(png::ColorType::Rgba);
                pix
            }
            PngData::Indexed { indices, rgb, trns } => {
                encoder.set_color(png::ColorType::Indexed);
                encoder.set_palette(rgb);
                if let Some(trns) = trns {
                    encoder.set_trns(trns);
                }
                indices
            }
        };
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&pix)?;
        writer.finish()?;
    }
    Ok(out)
}

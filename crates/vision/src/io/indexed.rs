//! Indexed PNG decoding that keeps the palette.

use super::IoError;
use std::io::Cursor;
use vision_core::{PalettedRaster, Raster, Size};

/// Decode `bytes` as a paletted raster, or `None` if the PNG is not indexed.
pub(super) fn decode_indexed_png(bytes: &[u8]) -> Result<Option<Raster>, IoError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::IDENTITY);
    let mut reader = decoder.read_info().map_err(png_error)?;

    let info = reader.info();
    if info.color_type != png::ColorType::Indexed {
        return Ok(None);
    }
    let depth = info.bit_depth as u8;
    let size = Size::new(info.width as usize, info.height as usize);
    let palette = build_palette(
        info.palette.as_deref().unwrap_or_default(),
        info.trns.as_deref().unwrap_or_default(),
    );

    let line = (size.width * depth as usize).div_ceil(8);
    let mut packed = vec![0u8; line * size.height];
    let frame = reader.next_frame(&mut packed).map_err(png_error)?;
    let stride = frame.line_size;

    let raster = if depth == 8 {
        PalettedRaster::from_raw(size, stride, packed, palette)?
    } else {
        let indices = unpack_indices(&packed, stride, size, depth);
        PalettedRaster::from_raw(size, size.width, indices, palette)?
    };
    Ok(Some(Raster::Paletted(raster)))
}

fn png_error(e: png::DecodingError) -> IoError {
    IoError::Decode {
        format: "png",
        message: e.to_string(),
    }
}

/// RGB triples plus optional tRNS alpha into straight-alpha RGBA entries.
fn build_palette(rgb: &[u8], trns: &[u8]) -> Vec<[u8; 4]> {
    rgb.chunks_exact(3)
        .enumerate()
        .map(|(i, c)| [c[0], c[1], c[2], trns.get(i).copied().unwrap_or(0xff)])
        .collect()
}

/// Expand 1/2/4-bit packed indices (MSB first) to one byte per pixel.
fn unpack_indices(packed: &[u8], stride: usize, size: Size, depth: u8) -> Vec<u8> {
    let per_byte = (8 / depth) as usize;
    let mask = (1u8 << depth) - 1;
    let mut out = Vec::with_capacity(size.area());
    for y in 0..size.height {
        let row = &packed[y * stride..];
        for x in 0..size.width {
            let shift = 8 - depth * (x % per_byte + 1) as u8;
            out.push((row[x / per_byte] >> shift) & mask);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpacks_sub_byte_indices() {
        // 1-bit: 0b1010_0000 -> 1,0,1,0,0
        assert_eq!(
            unpack_indices(&[0b1010_0000], 1, Size::new(5, 1), 1),
            vec![1, 0, 1, 0, 0]
        );
        // 2-bit, two rows of 3 pixels.
        assert_eq!(
            unpack_indices(&[0b00_01_10_00, 0b11_10_01_00], 1, Size::new(3, 2), 2),
            vec![0, 1, 2, 3, 2, 1]
        );
        // 4-bit
        assert_eq!(
            unpack_indices(&[0xab, 0xc0], 2, Size::new(3, 1), 4),
            vec![0xa, 0xb, 0xc]
        );
    }

    #[test]
    fn palette_takes_alpha_from_trns() {
        let pal = build_palette(&[1, 2, 3, 4, 5, 6, 7, 8, 9], &[0, 128]);
        assert_eq!(pal, vec![[1, 2, 3, 0], [4, 5, 6, 128], [7, 8, 9, 255]]);
    }
}

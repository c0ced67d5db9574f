//! GIF decoding that keeps the first frame's palette.

use super::IoError;
use std::io::Cursor;
use vision_core::{PalettedRaster, Raster, Size};

/// Decode the first frame of `bytes` as a paletted raster.
///
/// The raster covers the frame rectangle, not the logical screen. The
/// frame's local color table wins over the global one; the transparent
/// index, if any, becomes transparent black.
pub(super) fn decode_gif(bytes: &[u8]) -> Result<Raster, IoError> {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options.read_info(Cursor::new(bytes)).map_err(gif_error)?;

    let (size, transparent) = match decoder.next_frame_info().map_err(gif_error)? {
        Some(frame) => (
            Size::new(frame.width as usize, frame.height as usize),
            frame.transparent,
        ),
        None => return Err(decode_error("no image frames")),
    };

    let mut indices = vec![0u8; decoder.buffer_size()];
    decoder.read_into_buffer(&mut indices).map_err(gif_error)?;
    if indices.len() < size.area() {
        return Err(decode_error("not enough image data"));
    }
    let palette = build_palette(decoder.palette().map_err(gif_error)?, transparent);

    Ok(Raster::Paletted(PalettedRaster::from_raw(
        size, size.width, indices, palette,
    )?))
}

fn build_palette(rgb: &[u8], transparent: Option<u8>) -> Vec<[u8; 4]> {
    let mut palette: Vec<[u8; 4]> = rgb
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2], 0xff])
        .collect();
    if let Some(t) = transparent.map(usize::from) {
        if t < palette.len() {
            palette[t] = [0; 4];
        }
    }
    palette
}

fn decode_error(message: &str) -> IoError {
    IoError::Decode {
        format: "gif",
        message: message.to_string(),
    }
}

fn gif_error(e: gif::DecodingError) -> IoError {
    decode_error(&e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_entry_is_zeroed() {
        let pal = build_palette(&[9, 9, 9, 1, 2, 3], Some(1));
        assert_eq!(pal, vec![[9, 9, 9, 255], [0, 0, 0, 0]]);
        assert_eq!(build_palette(&[1, 2, 3], Some(7)), vec![[1, 2, 3, 255]]);
    }
}

//! 8-bit luminance buffer and its conversion from/to [`Raster`].

use crate::luma::{luma16, luma8_over_black};
use crate::raster::{
    nrgba_to_rgba64, GrayRaster, NrgbaRaster, PalettedRaster, Raster, YCbCrRaster,
};
use crate::{PixelBuffer, Size};
use std::fmt;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Single-channel 8-bit image, luminance in `0..=255`.
pub type GrayImage = PixelBuffer<u8>;

/// Copy a strided `u8` plane into a tightly packed destination.
fn copy_plane(dst: &mut [u8], size: Size, src: &[u8], stride: usize) {
    let w = size.width;
    if stride == w {
        dst.copy_from_slice(&src[..size.area()]);
    } else {
        for (y, row) in dst.chunks_exact_mut(w.max(1)).take(size.height).enumerate() {
            let start = y * stride;
            row.copy_from_slice(&src[start..start + w]);
        }
    }
}

impl PixelBuffer<u8> {
    /// Resize to the raster's bounds and fill every pixel with its luminance.
    ///
    /// Gray and luma-chroma sources are copied verbatim (chroma is dropped),
    /// straight-alpha sources are composited over black, palettes go through
    /// a per-entry lookup table. Anything else is read through the generic
    /// color query, ignoring alpha.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, raster), fields(kind = %raster.kind(), size = %raster.size()))
    )]
    pub fn set_image(&mut self, raster: &Raster) {
        let size = raster.size();
        log::debug!("gray <- {} raster {}", raster.kind(), size);
        self.resize(size);
        if size.is_empty() {
            return;
        }

        match raster {
            Raster::Gray(src) => self.set_from_gray(src),
            Raster::Nrgba(src) => self.set_from_nrgba(src),
            Raster::Paletted(src) => self.set_from_paletted(src),
            Raster::YCbCr(src) => self.set_from_ycbcr(src),
            Raster::Other(_) => self.set_from_query(raster),
        }
    }

    fn set_from_gray(&mut self, src: &GrayRaster) {
        let size = self.size();
        copy_plane(self.pixels_mut(), size, src.pix(), src.stride());
    }

    fn set_from_nrgba(&mut self, src: &NrgbaRaster) {
        for y in 0..self.height() {
            let src_row = src.row(y);
            for (dst, px) in self.row_mut(y).iter_mut().zip(src_row.chunks_exact(4)) {
                *dst = luma8_over_black(px[0], px[1], px[2], px[3]);
            }
        }
    }

    fn set_from_paletted(&mut self, src: &PalettedRaster) {
        let mut lut = [0u8; 256];
        for (entry, &color) in lut.iter_mut().zip(src.palette()) {
            let [r, g, b, _] = nrgba_to_rgba64(color);
            *entry = luma16(r, g, b);
        }
        for y in 0..self.height() {
            let idx_row = src.row(y);
            for (dst, &idx) in self.row_mut(y).iter_mut().zip(idx_row) {
                *dst = lut[idx as usize];
            }
        }
    }

    fn set_from_ycbcr(&mut self, src: &YCbCrRaster) {
        let size = self.size();
        copy_plane(self.pixels_mut(), size, src.y_plane(), src.y_stride());
    }

    fn set_from_query(&mut self, raster: &Raster) {
        let w = self.width();
        for (i, dst) in self.pixels_mut().iter_mut().enumerate() {
            let [r, g, b, _] = raster.rgba64(i % w, i / w);
            *dst = luma16(r, g, b);
        }
    }

    /// Single-channel raster holding a copy of this buffer.
    pub fn to_raster(&self) -> Raster {
        let size = self.size();
        let mut out = GrayRaster::new(size);
        for y in 0..size.height {
            out.row_mut(y).copy_from_slice(self.row(y));
        }
        Raster::Gray(out)
    }
}

impl fmt::Display for PixelBuffer<u8> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[gray-image]{}", self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{ChromaSubsampling, ColorSource};

    fn gray_of(raster: &Raster) -> GrayImage {
        let mut g = GrayImage::new();
        g.set_image(raster);
        g
    }

    #[test]
    fn gray_source_copies_rows_with_padding() {
        let src = GrayRaster::from_raw(Size::new(3, 2), 5, vec![1, 2, 3, 99, 99, 4, 5, 6])
            .expect("gray");
        let g = gray_of(&Raster::Gray(src));
        assert_eq!(g.size(), Size::new(3, 2));
        assert_eq!(g.pixels(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn nrgba_alpha_edge_cases() {
        let src = NrgbaRaster::from_raw(
            Size::new(3, 1),
            12,
            vec![200, 100, 50, 0, 200, 100, 50, 255, 200, 100, 50, 128],
        )
        .expect("nrgba");
        let g = gray_of(&Raster::Nrgba(src));
        assert_eq!(g.pixels(), &[0, 124, 62]);
    }

    #[test]
    fn palette_black_white_alternates() {
        let pix: Vec<u8> = (0..16).map(|i| (i % 2) as u8).collect();
        let src = PalettedRaster::from_raw(
            Size::new(4, 4),
            4,
            pix,
            vec![[0, 0, 0, 255], [255, 255, 255, 255]],
        )
        .expect("paletted");
        let g = gray_of(&Raster::Paletted(src));
        for (i, &v) in g.pixels().iter().enumerate() {
            assert_eq!(v, if i % 2 == 0 { 0 } else { 255 }, "pixel {i}");
        }
    }

    #[test]
    fn palette_index_beyond_palette_is_black() {
        let src = PalettedRaster::from_raw(Size::new(2, 1), 2, vec![0, 200], vec![[255; 4]])
            .expect("paletted");
        assert_eq!(gray_of(&Raster::Paletted(src)).pixels(), &[255, 0]);
    }

    #[test]
    fn ycbcr_source_keeps_luma_only() {
        let size = Size::new(3, 2);
        let y: Vec<u8> = vec![10, 20, 30, 0, 40, 50, 60, 0];
        let a = YCbCrRaster::from_planes(
            size,
            ChromaSubsampling::S444,
            (y.clone(), 4),
            (vec![0; 6], vec![255; 6], 3),
        )
        .expect("ycbcr");
        let b = YCbCrRaster::from_planes(
            size,
            ChromaSubsampling::S420,
            (y, 4),
            (vec![77; 4], vec![13; 4], 2),
        )
        .expect("ycbcr");
        let ga = gray_of(&Raster::YCbCr(a));
        let gb = gray_of(&Raster::YCbCr(b));
        assert_eq!(ga.pixels(), &[10, 20, 30, 40, 50, 60]);
        assert_eq!(ga, gb);
    }

    struct HalfTransparentRed;

    impl ColorSource for HalfTransparentRed {
        fn size(&self) -> Size {
            Size::new(2, 2)
        }
        fn rgba64(&self, _x: usize, _y: usize) -> [u32; 4] {
            [0xffff, 0, 0, 0x8000]
        }
    }

    #[test]
    fn fallback_ignores_alpha() {
        let g = gray_of(&Raster::Other(Box::new(HalfTransparentRed)));
        assert_eq!(g.size(), Size::new(2, 2));
        assert!(g.pixels().iter().all(|&v| v == 76));
    }

    #[test]
    fn reuses_buffer_across_calls() {
        let mut g = GrayImage::with_size(Size::new(64, 64));
        let cap = g.capacity();
        g.set_image(&Raster::Gray(GrayRaster::new(Size::new(8, 8))));
        assert_eq!(g.pixels().len(), 64);
        assert_eq!(g.capacity(), cap);
    }

    #[test]
    fn export_round_trips() {
        let mut g = GrayImage::with_size(Size::new(5, 4));
        for (i, p) in g.pixels_mut().iter_mut().enumerate() {
            *p = (i * 13) as u8;
        }
        let raster = g.to_raster();
        assert_eq!(raster.size(), g.size());
        let back = gray_of(&raster);
        assert_eq!(back.pixels(), g.pixels());
    }

    #[test]
    fn empty_buffer_exports_empty_raster() {
        let g = GrayImage::new();
        assert_eq!(g.to_raster().size(), Size::new(0, 0));
        assert_eq!(g.to_string(), "[gray-image]0x0");
    }
}

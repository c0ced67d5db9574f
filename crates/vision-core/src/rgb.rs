//! Three-channel 8-bit color buffer and its conversion from/to [`Raster`].

use crate::luma::scale_by_alpha;
use crate::raster::{nrgba_to_rgba64, NrgbaRaster, PalettedRaster, Raster};
use crate::PixelBuffer;
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// One opaque 8-bit color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// Truncate a 16-bit color query to 8 bits per channel, dropping alpha.
    #[inline]
    fn from_rgba64([r, g, b, _]: [u32; 4]) -> Self {
        Self::new((r >> 8) as u8, (g >> 8) as u8, (b >> 8) as u8)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

/// Three-channel 8-bit image.
pub type RgbImage = PixelBuffer<Rgb>;

impl PixelBuffer<Rgb> {
    /// Resize to the raster's bounds and fill every pixel with its color.
    ///
    /// Straight-alpha sources are composited over black. Luma-chroma and
    /// unknown encodings are read through the generic color query with
    /// alpha ignored.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, raster), fields(kind = %raster.kind(), size = %raster.size()))
    )]
    pub fn set_image(&mut self, raster: &Raster) {
        let size = raster.size();
        log::debug!("rgb <- {} raster {}", raster.kind(), size);
        self.resize(size);
        if size.is_empty() {
            return;
        }

        match raster {
            Raster::Gray(src) => {
                for y in 0..size.height {
                    for (dst, &v) in self.row_mut(y).iter_mut().zip(src.row(y)) {
                        *dst = Rgb::gray(v);
                    }
                }
            }
            Raster::Nrgba(src) => self.set_from_nrgba(src),
            Raster::Paletted(src) => self.set_from_paletted(src),
            Raster::YCbCr(_) | Raster::Other(_) => self.set_from_query(raster),
        }
    }

    fn set_from_nrgba(&mut self, src: &NrgbaRaster) {
        for y in 0..self.height() {
            let src_row = src.row(y);
            for (dst, px) in self.row_mut(y).iter_mut().zip(src_row.chunks_exact(4)) {
                *dst = match px[3] {
                    0 => Rgb::BLACK,
                    0xff => Rgb::new(px[0], px[1], px[2]),
                    a => Rgb::new(
                        scale_by_alpha(px[0], a),
                        scale_by_alpha(px[1], a),
                        scale_by_alpha(px[2], a),
                    ),
                };
            }
        }
    }

    fn set_from_paletted(&mut self, src: &PalettedRaster) {
        let mut lut = [Rgb::BLACK; 256];
        for (entry, &color) in lut.iter_mut().zip(src.palette()) {
            *entry = Rgb::from_rgba64(nrgba_to_rgba64(color));
        }
        for y in 0..self.height() {
            let idx_row = src.row(y);
            for (dst, &idx) in self.row_mut(y).iter_mut().zip(idx_row) {
                *dst = lut[idx as usize];
            }
        }
    }

    fn set_from_query(&mut self, raster: &Raster) {
        let w = self.width();
        for (i, dst) in self.pixels_mut().iter_mut().enumerate() {
            *dst = Rgb::from_rgba64(raster.rgba64(i % w, i / w));
        }
    }

    /// Opaque RGBA raster holding a copy of this buffer.
    pub fn to_raster(&self) -> Raster {
        let size = self.size();
        let mut out = NrgbaRaster::new(size);
        for y in 0..size.height {
            for (dst, c) in out.row_mut(y).chunks_exact_mut(4).zip(self.row(y)) {
                dst.copy_from_slice(&[c.r, c.g, c.b, 0xff]);
            }
        }
        Raster::Nrgba(out)
    }
}

impl fmt::Display for PixelBuffer<Rgb> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[rgb-image]{}", self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{ChromaSubsampling, ColorSource, GrayRaster, YCbCrRaster};
    use crate::Size;

    fn rgb_of(raster: &Raster) -> RgbImage {
        let mut img = RgbImage::new();
        img.set_image(raster);
        img
    }

    #[test]
    fn gray_source_expands_to_triples() {
        let src = GrayRaster::from_raw(Size::new(2, 2), 3, vec![7, 8, 0, 9, 10]).expect("gray");
        let img = rgb_of(&Raster::Gray(src));
        assert_eq!(
            img.pixels(),
            &[Rgb::gray(7), Rgb::gray(8), Rgb::gray(9), Rgb::gray(10)]
        );
    }

    #[test]
    fn nrgba_alpha_edge_cases() {
        let src = NrgbaRaster::from_raw(
            Size::new(3, 1),
            12,
            vec![200, 100, 50, 0, 200, 100, 50, 255, 200, 100, 50, 128],
        )
        .expect("nrgba");
        let img = rgb_of(&Raster::Nrgba(src));
        assert_eq!(img.get(0, 0), Rgb::BLACK);
        assert_eq!(img.get(1, 0), Rgb::new(200, 100, 50));
        assert_eq!(img.get(2, 0), Rgb::new(100, 50, 25));
    }

    #[test]
    fn palette_maps_through_table() {
        let src = PalettedRaster::from_raw(
            Size::new(3, 1),
            3,
            vec![1, 0, 2],
            vec![[10, 20, 30, 255], [255, 255, 255, 255], [255, 0, 0, 0]],
        )
        .expect("paletted");
        let img = rgb_of(&Raster::Paletted(src));
        assert_eq!(
            img.pixels(),
            &[Rgb::gray(255), Rgb::new(10, 20, 30), Rgb::BLACK]
        );
    }

    #[test]
    fn ycbcr_goes_through_color_query() {
        let src = YCbCrRaster::from_planes(
            Size::new(2, 1),
            ChromaSubsampling::S444,
            (vec![0x40, 0xff], 2),
            (vec![128, 128], vec![128, 128], 2),
        )
        .expect("ycbcr");
        let img = rgb_of(&Raster::YCbCr(src));
        assert_eq!(img.pixels(), &[Rgb::gray(0x40), Rgb::gray(0xff)]);
    }

    struct Translucent;

    impl ColorSource for Translucent {
        fn size(&self) -> Size {
            Size::new(1, 3)
        }
        fn rgba64(&self, _x: usize, y: usize) -> [u32; 4] {
            [0x1234 * y as u32, 0xffff, 0x00ff, 0]
        }
    }

    #[test]
    fn fallback_truncates_and_ignores_alpha() {
        let img = rgb_of(&Raster::Other(Box::new(Translucent)));
        assert_eq!(img.size(), Size::new(1, 3));
        assert_eq!(
            img.pixels(),
            &[Rgb::new(0, 255, 0), Rgb::new(0x12, 255, 0), Rgb::new(0x24, 255, 0)]
        );
    }

    #[test]
    fn export_is_opaque_and_round_trips() {
        let mut img = RgbImage::with_size(Size::new(3, 2));
        for (i, p) in img.pixels_mut().iter_mut().enumerate() {
            *p = Rgb::new(i as u8, (i * 40) as u8, 255 - i as u8);
        }
        let raster = img.to_raster();
        match &raster {
            Raster::Nrgba(r) => assert!(r.pix().chunks_exact(4).all(|px| px[3] == 0xff)),
            other => panic!("expected nrgba export, got {other:?}"),
        }
        assert_eq!(rgb_of(&raster), img);
    }

    #[test]
    fn fill_sets_every_pixel() {
        let mut img = RgbImage::with_size(Size::new(456, 123));
        img.fill(Rgb::new(1, 2, 3));
        assert!(img.pixels().iter().all(|&p| p == Rgb::new(1, 2, 3)));
        assert_eq!(img.to_string(), "[rgb-image]456x123");
    }
}

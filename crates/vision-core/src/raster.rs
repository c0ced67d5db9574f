//! Generic decoded raster.
//!
//! A [`Raster`] is what a codec hands over after decoding: either one of the
//! concrete encodings the conversion engine has fast paths for, or an opaque
//! [`ColorSource`] that can only be queried pixel by pixel. Every variant
//! answers [`Raster::rgba64`], the alpha-premultiplied 16-bit color query the
//! fallback conversion path relies on.

use crate::Size;
use std::fmt;

/// Errors produced when wrapping raw planes into a raster.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("stride {stride} is shorter than a row of {row_len} elements")]
    BadStride { stride: usize, row_len: usize },
    #[error("plane buffer too small (expected at least {expected} bytes, got {got})")]
    BufferTooSmall { expected: usize, got: usize },
}

/// Per-pixel color query for rasters without a dedicated conversion path.
pub trait ColorSource: Send + Sync {
    fn size(&self) -> Size;

    /// Alpha-premultiplied RGBA at `(x, y)`, each channel in `0..=0xffff`.
    fn rgba64(&self, x: usize, y: usize) -> [u32; 4];
}

fn check_plane(
    stride: usize,
    row_len: usize,
    rows: usize,
    got: usize,
) -> Result<(), RasterError> {
    if stride < row_len {
        return Err(RasterError::BadStride { stride, row_len });
    }
    let expected = if rows == 0 {
        0
    } else {
        stride * (rows - 1) + row_len
    };
    if got < expected {
        return Err(RasterError::BufferTooSmall { expected, got });
    }
    Ok(())
}

#[inline]
fn widen(c: u8) -> u32 {
    let c = c as u32;
    c | (c << 8)
}

/// Premultiplied 16-bit query of a straight-alpha 8-bit color.
#[inline]
pub(crate) fn nrgba_to_rgba64(px: [u8; 4]) -> [u32; 4] {
    let a = px[3] as u32;
    [
        widen(px[0]) * a / 0xff,
        widen(px[1]) * a / 0xff,
        widen(px[2]) * a / 0xff,
        widen(px[3]),
    ]
}

/// Single-channel 8-bit raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayRaster {
    size: Size,
    stride: usize,
    pix: Vec<u8>,
}

impl GrayRaster {
    /// Zeroed raster with `stride == width`.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            stride: size.width,
            pix: vec![0; size.area()],
        }
    }

    pub fn from_raw(size: Size, stride: usize, pix: Vec<u8>) -> Result<Self, RasterError> {
        check_plane(stride, size.width, size.height, pix.len())?;
        Ok(Self { size, stride, pix })
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn pix(&self) -> &[u8] {
        &self.pix
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.pix[start..start + self.size.width]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        &mut self.pix[start..start + self.size.width]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pix[y * self.stride + x]
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pix
    }
}

/// Non-premultiplied 8-bit RGBA raster, four bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NrgbaRaster {
    size: Size,
    stride: usize,
    pix: Vec<u8>,
}

impl NrgbaRaster {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            stride: size.width * 4,
            pix: vec![0; size.area() * 4],
        }
    }

    /// `stride` is in bytes.
    pub fn from_raw(size: Size, stride: usize, pix: Vec<u8>) -> Result<Self, RasterError> {
        check_plane(stride, size.width * 4, size.height, pix.len())?;
        Ok(Self { size, stride, pix })
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn pix(&self) -> &[u8] {
        &self.pix
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.pix[start..start + self.size.width * 4]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.stride;
        &mut self.pix[start..start + self.size.width * 4]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 4] {
        let i = y * self.stride + x * 4;
        [self.pix[i], self.pix[i + 1], self.pix[i + 2], self.pix[i + 3]]
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pix
    }
}

/// Palette-indexed raster. Palette entries are straight-alpha RGBA.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PalettedRaster {
    size: Size,
    stride: usize,
    pix: Vec<u8>,
    palette: Vec<[u8; 4]>,
}

impl PalettedRaster {
    pub fn from_raw(
        size: Size,
        stride: usize,
        pix: Vec<u8>,
        palette: Vec<[u8; 4]>,
    ) -> Result<Self, RasterError> {
        check_plane(stride, size.width, size.height, pix.len())?;
        Ok(Self {
            size,
            stride,
            pix,
            palette,
        })
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn pix(&self) -> &[u8] {
        &self.pix
    }

    #[inline]
    pub fn palette(&self) -> &[[u8; 4]] {
        &self.palette
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.pix[start..start + self.size.width]
    }

    /// Palette color at `(x, y)`; indices past the palette read as transparent black.
    #[inline]
    pub fn color_at(&self, x: usize, y: usize) -> [u8; 4] {
        let idx = self.pix[y * self.stride + x] as usize;
        self.palette.get(idx).copied().unwrap_or([0; 4])
    }
}

/// Chroma plane resolution relative to the luma plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChromaSubsampling {
    #[default]
    S444,
    S422,
    S420,
    S440,
}

impl ChromaSubsampling {
    /// Chroma plane size for a luma plane of `size`.
    pub fn chroma_size(self, size: Size) -> Size {
        let half = |v: usize| v.div_ceil(2);
        match self {
            Self::S444 => size,
            Self::S422 => Size::new(half(size.width), size.height),
            Self::S420 => Size::new(half(size.width), half(size.height)),
            Self::S440 => Size::new(size.width, half(size.height)),
        }
    }

    #[inline]
    fn chroma_coords(self, x: usize, y: usize) -> (usize, usize) {
        match self {
            Self::S444 => (x, y),
            Self::S422 => (x / 2, y),
            Self::S420 => (x / 2, y / 2),
            Self::S440 => (x, y / 2),
        }
    }
}

/// Luma plane plus two (possibly subsampled) chroma planes, JFIF full range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YCbCrRaster {
    size: Size,
    subsampling: ChromaSubsampling,
    y_stride: usize,
    c_stride: usize,
    y: Vec<u8>,
    cb: Vec<u8>,
    cr: Vec<u8>,
}

impl YCbCrRaster {
    pub fn from_planes(
        size: Size,
        subsampling: ChromaSubsampling,
        (y, y_stride): (Vec<u8>, usize),
        (cb, cr, c_stride): (Vec<u8>, Vec<u8>, usize),
    ) -> Result<Self, RasterError> {
        check_plane(y_stride, size.width, size.height, y.len())?;
        let c = subsampling.chroma_size(size);
        check_plane(c_stride, c.width, c.height, cb.len())?;
        check_plane(c_stride, c.width, c.height, cr.len())?;
        Ok(Self {
            size,
            subsampling,
            y_stride,
            c_stride,
            y,
            cb,
            cr,
        })
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn subsampling(&self) -> ChromaSubsampling {
        self.subsampling
    }

    #[inline]
    pub fn y_stride(&self) -> usize {
        self.y_stride
    }

    #[inline]
    pub fn c_stride(&self) -> usize {
        self.c_stride
    }

    #[inline]
    pub fn y_plane(&self) -> &[u8] {
        &self.y
    }

    #[inline]
    pub fn cb_plane(&self) -> &[u8] {
        &self.cb
    }

    #[inline]
    pub fn cr_plane(&self) -> &[u8] {
        &self.cr
    }

    #[inline]
    pub fn luma_row(&self, y: usize) -> &[u8] {
        let start = y * self.y_stride;
        &self.y[start..start + self.size.width]
    }

    /// `(Y, Cb, Cr)` sample at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let (cx, cy) = self.subsampling.chroma_coords(x, y);
        let ci = cy * self.c_stride + cx;
        (self.y[y * self.y_stride + x], self.cb[ci], self.cr[ci])
    }
}

/// Full-range YCbCr to 16-bit RGB, 16.16 fixed point.
fn ycbcr_to_rgba64(y: u8, cb: u8, cr: u8) -> [u32; 4] {
    let yy = y as i32 * 0x10101;
    let cb = cb as i32 - 128;
    let cr = cr as i32 - 128;
    let clamp = |v: i32| -> u32 {
        if (v as u32) & 0xff00_0000 == 0 {
            (v >> 8) as u32
        } else if v < 0 {
            0
        } else {
            0xffff
        }
    };
    [
        clamp(yy + 91881 * cr),
        clamp(yy - 22554 * cb - 46802 * cr),
        clamp(yy + 116130 * cb),
        0xffff,
    ]
}

/// Pixel encoding tag, mostly for logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RasterKind {
    Gray,
    Nrgba,
    Paletted,
    YCbCr,
    Other,
}

impl fmt::Display for RasterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RasterKind::Gray => "gray",
            RasterKind::Nrgba => "nrgba",
            RasterKind::Paletted => "paletted",
            RasterKind::YCbCr => "ycbcr",
            RasterKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Decoded image in one of the encodings the conversion engine understands.
pub enum Raster {
    Gray(GrayRaster),
    Nrgba(NrgbaRaster),
    Paletted(PalettedRaster),
    YCbCr(YCbCrRaster),
    Other(Box<dyn ColorSource>),
}

impl Raster {
    pub fn kind(&self) -> RasterKind {
        match self {
            Raster::Gray(_) => RasterKind::Gray,
            Raster::Nrgba(_) => RasterKind::Nrgba,
            Raster::Paletted(_) => RasterKind::Paletted,
            Raster::YCbCr(_) => RasterKind::YCbCr,
            Raster::Other(_) => RasterKind::Other,
        }
    }

    pub fn size(&self) -> Size {
        match self {
            Raster::Gray(r) => r.size(),
            Raster::Nrgba(r) => r.size(),
            Raster::Paletted(r) => r.size(),
            Raster::YCbCr(r) => r.size(),
            Raster::Other(src) => src.size(),
        }
    }

    /// Alpha-premultiplied 16-bit RGBA at `(x, y)`.
    pub fn rgba64(&self, x: usize, y: usize) -> [u32; 4] {
        match self {
            Raster::Gray(r) => {
                let v = widen(r.get(x, y));
                [v, v, v, 0xffff]
            }
            Raster::Nrgba(r) => nrgba_to_rgba64(r.get(x, y)),
            Raster::Paletted(r) => nrgba_to_rgba64(r.color_at(x, y)),
            Raster::YCbCr(r) => {
                let (yy, cb, cr) = r.get(x, y);
                ycbcr_to_rgba64(yy, cb, cr)
            }
            Raster::Other(src) => src.rgba64(x, y),
        }
    }
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("kind", &self.kind())
            .field("size", &self.size())
            .finish()
    }
}

impl From<GrayRaster> for Raster {
    fn from(r: GrayRaster) -> Self {
        Raster::Gray(r)
    }
}

impl From<NrgbaRaster> for Raster {
    fn from(r: NrgbaRaster) -> Self {
        Raster::Nrgba(r)
    }
}

impl From<PalettedRaster> for Raster {
    fn from(r: PalettedRaster) -> Self {
        Raster::Paletted(r)
    }
}

impl From<YCbCrRaster> for Raster {
    fn from(r: YCbCrRaster) -> Self {
        Raster::YCbCr(r)
    }
}

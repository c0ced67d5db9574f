use crate::{GrayImage, PixelBuffer};
use std::fmt;

/// Single-channel wide-integer image.
///
/// No range is enforced, which makes it a target for sums and other
/// accumulations over a [`GrayImage`]. There is no raster conversion.
pub type IntGrayImage = PixelBuffer<i64>;

impl PixelBuffer<i64> {
    /// Resize to `gray`'s size and widen every byte.
    pub fn set_from_gray(&mut self, gray: &GrayImage) {
        self.resize(gray.size());
        for (dst, &v) in self.pixels_mut().iter_mut().zip(gray.pixels()) {
            *dst = i64::from(v);
        }
    }
}

impl fmt::Display for PixelBuffer<i64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[int-gray-image]{}", self.size())
    }
}

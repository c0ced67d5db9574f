//! Owned row-major pixel storage shared by all buffer types.
//!
//! `PixelBuffer<T>` keeps `pixels.len() == size.area()` after every mutating
//! call. Shrinking keeps the allocation so a buffer reused across frames of
//! varying size settles at its largest footprint instead of reallocating.

use crate::Size;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelBuffer<T> {
    size: Size,
    pixels: Vec<T>,
}

impl<T: Copy + Default> PixelBuffer<T> {
    /// Empty buffer (0x0, no allocation).
    pub fn new() -> Self {
        Self {
            size: Size::default(),
            pixels: Vec::new(),
        }
    }

    /// Buffer of `size` filled with `T::default()`.
    pub fn with_size(size: Size) -> Self {
        let mut buf = Self::new();
        buf.resize(size);
        buf
    }

    /// Set the size, reusing the current allocation when it is large enough.
    ///
    /// Pixel contents after a resize are unspecified; callers overwrite them.
    pub fn resize(&mut self, size: Size) {
        let area = size.area();
        self.size = size;
        if self.pixels.capacity() >= area {
            // Stays within the allocation in both directions.
            self.pixels.resize(area, T::default());
        } else {
            log::trace!(
                "pixel buffer realloc: {} -> {} elements",
                self.pixels.capacity(),
                area
            );
            let mut pixels = Vec::with_capacity(area);
            pixels.resize(area, T::default());
            self.pixels = pixels;
        }
    }

    /// Overwrite every visible pixel with `value`.
    pub fn fill(&mut self, value: T) {
        self.pixels.fill(value);
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Allocated element capacity; never less than `size().area()`.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.pixels.capacity()
    }

    #[inline]
    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.pixels[y * self.size.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let w = self.size.width;
        self.pixels[y * w + x] = value;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[T] {
        let w = self.size.width;
        &self.pixels[y * w..(y + 1) * w]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [T] {
        let w = self.size.width;
        &mut self.pixels[y * w..(y + 1) * w]
    }

    /// Consume the buffer and hand out its pixels.
    pub fn into_pixels(self) -> Vec<T> {
        self.pixels
    }
}

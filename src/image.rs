use std::num::NonZeroU32;

use crate::{DifferentDimensionsError, ImageBufferError};

/// Single-channel image with `f32` pixels stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: NonZeroU32,
    height: NonZeroU32,
    pixels: Vec<f32>,
}

impl Image {
    /// Create image with given dimensions and all pixels set to zero.
    ///
    /// # Panics
    /// Panics if count of pixels overflows `usize` (possible only on
    /// targets with 32-bit pointers).
    pub fn new(width: NonZeroU32, height: NonZeroU32) -> Self {
        let size = width.get() as usize * height.get() as usize;
        Self {
            width,
            height,
            pixels: vec![0.; size],
        }
    }

    pub fn from_vec(
        width: NonZeroU32,
        height: NonZeroU32,
        pixels: Vec<f32>,
    ) -> Result<Self, ImageBufferError> {
        let size = (width.get() as usize).checked_mul(height.get() as usize);
        if size != Some(pixels.len()) {
            return Err(ImageBufferError::InvalidBufferSize);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create image with the same dimensions as `self` and all pixels set to zero.
    pub(crate) fn new_like(&self) -> Self {
        Self::new(self.width, self.height)
    }

    #[inline(always)]
    pub fn width(&self) -> NonZeroU32 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> NonZeroU32 {
        self.height
    }

    /// Returns value of pixel at given row and column.
    ///
    /// # Panics
    /// Panics if position is out of image boundaries.
    #[inline]
    pub fn get(&self, row: u32, col: u32) -> f32 {
        self.pixels[self.index(row, col)]
    }

    /// Sets value of pixel at given row and column.
    ///
    /// # Panics
    /// Panics if position is out of image boundaries.
    #[inline]
    pub fn set(&mut self, row: u32, col: u32, value: f32) {
        let index = self.index(row, col);
        self.pixels[index] = value;
    }

    #[inline(always)]
    fn index(&self, row: u32, col: u32) -> usize {
        assert!(
            row < self.height.get() && col < self.width.get(),
            "pixel ({row}, {col}) is out of image boundaries"
        );
        row as usize * self.width.get() as usize + col as usize
    }

    /// Buffer with image pixels.
    #[inline(always)]
    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    #[inline(always)]
    pub fn pixels_mut(&mut self) -> &mut [f32] {
        &mut self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.pixels.chunks_exact(self.width.get() as usize)
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.pixels.chunks_exact_mut(self.width.get() as usize)
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.pixels
    }

    /// Replaces all pixels of the image by pixels of other image with
    /// the same dimensions in one step.
    pub fn replace_pixels(&mut self, other: Image) -> Result<(), DifferentDimensionsError> {
        if self.width != other.width || self.height != other.height {
            return Err(DifferentDimensionsError);
        }
        self.pixels = other.pixels;
        Ok(())
    }
}

use crate::{Image, ImageTooSmallError, InvalidKernelShape, InvalidSigmaError};

/// Convolution kernel with odd width and height.
///
/// Weights are stored row by row and never change after the kernel was created.
/// The kernel is not normalised, sum of weights is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: usize,
    height: usize,
    weights: Vec<f32>,
}

impl Kernel {
    /// Create a kernel from rows of weights.
    pub fn new(rows: Vec<Vec<f32>>) -> Result<Self, InvalidKernelShape> {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(InvalidKernelShape::Empty);
        }
        if rows.iter().any(|r| r.len() != width) {
            return Err(InvalidKernelShape::Ragged);
        }
        let weights = rows.into_iter().flatten().collect();
        Self::from_vec(width, height, weights)
    }

    /// Create a kernel from weights stored row by row.
    pub fn from_vec(
        width: usize,
        height: usize,
        weights: Vec<f32>,
    ) -> Result<Self, InvalidKernelShape> {
        if width == 0 || height == 0 {
            return Err(InvalidKernelShape::Empty);
        }
        if height % 2 == 0 {
            return Err(InvalidKernelShape::EvenHeight);
        }
        if width % 2 == 0 {
            return Err(InvalidKernelShape::EvenWidth);
        }
        let cells = cells_count(width, height).ok_or(InvalidKernelShape::TooLarge)?;
        if weights.len() != cells {
            return Err(InvalidKernelShape::Ragged);
        }
        Ok(Self {
            width,
            height,
            weights,
        })
    }

    /// Square kernel where every weight is equal to `1 / (size * size)`.
    pub fn box_filter(size: usize) -> Result<Self, InvalidKernelShape> {
        let cells = cells_count(size, size).ok_or(InvalidKernelShape::TooLarge)?;
        let weight = 1. / cells as f32;
        Self::from_vec(size, size, vec![weight; cells])
    }

    /// Normalised square gaussian kernel.
    ///
    /// Size of the kernel is `8 * sigma + 1` rounded down and then up
    /// to the nearest odd number, so the kernel covers four sigmas
    /// on every side of the center.
    pub fn gaussian(sigma: f32) -> Result<Self, InvalidSigmaError> {
        let denominator = 2. * sigma * sigma;
        // Also rejects NaN, infinities and sigmas whose square underflows.
        if !(sigma > 0. && denominator.is_normal()) {
            return Err(InvalidSigmaError(sigma));
        }
        let size = 8. * sigma + 1.;
        if size > MAX_SIDE as f32 {
            return Err(InvalidSigmaError(sigma));
        }
        let mut size = size as usize;
        if size % 2 == 0 {
            size += 1;
        }
        let cells = cells_count(size, size).ok_or(InvalidSigmaError(sigma))?;
        let center = (size / 2) as f32;
        let mut weights: Vec<f32> = (0..cells)
            .map(|i| {
                let dy = (i / size) as f32 - center;
                let dx = (i % size) as f32 - center;
                (-(dx * dx + dy * dy) / denominator).exp()
            })
            .collect();
        let sum: f32 = weights.iter().sum();
        weights.iter_mut().for_each(|w| *w /= sum);
        Ok(Self {
            width: size,
            height: size,
            weights,
        })
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    pub fn half_width(&self) -> usize {
        self.width / 2
    }

    #[inline(always)]
    pub fn half_height(&self) -> usize {
        self.height / 2
    }

    /// Number of weights in the kernel.
    #[inline(always)]
    pub fn cell_count(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.weights[row * self.width + col]
    }

    #[inline(always)]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.weights.chunks_exact(self.width)
    }

    /// Returns error if the image is smaller than the kernel along any axis.
    pub fn check_fits(&self, image: &Image) -> Result<(), ImageTooSmallError> {
        let image_width = image.width().get();
        let image_height = image.height().get();
        if (image_width as usize) < self.width || (image_height as usize) < self.height {
            return Err(ImageTooSmallError {
                image_width,
                image_height,
                kernel_width: self.width,
                kernel_height: self.height,
            });
        }
        Ok(())
    }
}

/// Kernel can't be wider or higher than the largest image.
const MAX_SIDE: usize = u32::MAX as usize;

fn cells_count(width: usize, height: usize) -> Option<usize> {
    if width > MAX_SIDE || height > MAX_SIDE {
        return None;
    }
    width.checked_mul(height)
}

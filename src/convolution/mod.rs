pub use spatial::spatial_convolution;
pub use spectral::{embed_kernel, spectral_convolution_complex, spectral_convolution_polar};

use crate::fourier::{FourierProvider, RustFftProvider};
use crate::{for_each_row_mut, Image, ImageTooSmallError, Kernel};

mod spatial;
mod spectral;

/// Kernels with fewer weights than this are applied in the spatial domain
/// by [ConvolutionAlg::Auto].
pub const DEFAULT_NAIVE_CELL_THRESHOLD: usize = 49;

/// Way to multiply spectra of the image and the kernel.
/// Both variants give the same result up to floating point rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpectralMultiply {
    /// Multiplication of real and imaginary parts as complex numbers.
    Complex,
    /// Multiplication of magnitudes and addition of phases.
    #[default]
    Polar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConvolutionAlg {
    /// Spatial convolution for small kernels or if spectral convolution
    /// is not allowed, spectral convolution with given multiplication
    /// otherwise.
    Auto(SpectralMultiply),
    /// Always use direct summation in the spatial domain.
    Spatial,
    /// Always use multiplication in the frequency domain.
    Spectral(SpectralMultiply),
}

impl Default for ConvolutionAlg {
    fn default() -> Self {
        Self::Auto(SpectralMultiply::default())
    }
}

/// Immutable settings of convolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvolutionConfig {
    kernel: Kernel,
    pub algorithm: ConvolutionAlg,
    /// Allows [ConvolutionAlg::Auto] to choose spectral convolution.
    /// Default is `true`.
    pub allow_spectral: bool,
    /// Minimal number of kernel weights for which [ConvolutionAlg::Auto]
    /// chooses spectral convolution.
    /// Default is [DEFAULT_NAIVE_CELL_THRESHOLD].
    pub naive_cell_threshold: usize,
}

impl ConvolutionConfig {
    pub fn new(kernel: Kernel) -> Self {
        Self {
            kernel,
            algorithm: ConvolutionAlg::default(),
            allow_spectral: true,
            naive_cell_threshold: DEFAULT_NAIVE_CELL_THRESHOLD,
        }
    }

    pub fn algorithm(mut self, algorithm: ConvolutionAlg) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn allow_spectral(mut self, allow_spectral: bool) -> Self {
        self.allow_spectral = allow_spectral;
        self
    }

    pub fn naive_cell_threshold(mut self, threshold: usize) -> Self {
        self.naive_cell_threshold = threshold;
        self
    }

    #[inline(always)]
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Returns the algorithm that will be used to apply the kernel.
    /// The result is never [ConvolutionAlg::Auto].
    pub fn selected_algorithm(&self) -> ConvolutionAlg {
        match self.algorithm {
            ConvolutionAlg::Auto(multiply) => {
                if !self.allow_spectral || self.kernel.cell_count() < self.naive_cell_threshold {
                    ConvolutionAlg::Spatial
                } else {
                    ConvolutionAlg::Spectral(multiply)
                }
            }
            algorithm => algorithm,
        }
    }
}

/// Applies a kernel to images.
///
/// `Convolver` keeps no state between calls, so one instance may be used
/// to process different images from many threads.
#[derive(Debug, Clone)]
pub struct Convolver<F = RustFftProvider> {
    config: ConvolutionConfig,
    provider: F,
}

impl Convolver<RustFftProvider> {
    pub fn new(config: ConvolutionConfig) -> Self {
        Self::with_provider(config, RustFftProvider)
    }
}

impl<F: FourierProvider> Convolver<F> {
    pub fn with_provider(config: ConvolutionConfig, provider: F) -> Self {
        Self { config, provider }
    }

    #[inline(always)]
    pub fn config(&self) -> &ConvolutionConfig {
        &self.config
    }

    /// Returns the result of convolution of the image with the kernel.
    ///
    /// Pixels closer to an edge of the image than half of the kernel size
    /// are zero whatever algorithm was used.
    pub fn convolve(&self, image: &Image) -> Result<Image, ImageTooSmallError> {
        let kernel = &self.config.kernel;
        let multiply = match self.config.selected_algorithm() {
            ConvolutionAlg::Spectral(multiply) => multiply,
            _ => return spatial_convolution(image, kernel),
        };
        let mut buffer = match multiply {
            SpectralMultiply::Complex => {
                spectral_convolution_complex(image, kernel, &self.provider)?
            }
            SpectralMultiply::Polar => spectral_convolution_polar(image, kernel, &self.provider)?,
        };
        apply_zero_border(&mut buffer, kernel);
        Ok(buffer)
    }

    /// Replaces pixels of the image by the result of convolution.
    ///
    /// The image is left untouched if an error is returned.
    pub fn process(&self, image: &mut Image) -> Result<(), ImageTooSmallError> {
        let buffer = self.convolve(image)?;
        *image = buffer;
        Ok(())
    }
}

/// Sets to zero all pixels closer to an edge of the image
/// than half of the kernel size.
///
/// Spectral convolution calculates these pixels with pixels from
/// the opposite edge. After this the result has the same border as
/// the result of [spatial_convolution].
pub fn apply_zero_border(image: &mut Image, kernel: &Kernel) {
    test_log!("apply zero border");
    let width = image.width().get() as usize;
    let height = image.height().get() as usize;
    let min_y = kernel.half_height().min(height);
    let min_x = kernel.half_width().min(width);
    let max_y = height.saturating_sub(kernel.half_height());
    let max_x = width.saturating_sub(kernel.half_width());

    for_each_row_mut(image.pixels_mut(), width, |y, row| {
        if y < min_y || y >= max_y {
            row.fill(0.);
        } else {
            row[..min_x].fill(0.);
            row[max_x..].fill(0.);
        }
    });
}

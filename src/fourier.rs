//! Forward and inverse 2D discrete Fourier transform of images.
//!
//! Frequency data is stored in two images of the same size as the transformed
//! image: real and imaginary parts ([ComplexSpectrum]) or magnitude and
//! phase ([PolarSpectrum]). Both forms hold the same values:
//! `real = magnitude * cos(phase)` and `imag = magnitude * sin(phase)`.
use std::num::NonZeroU32;

use num_traits::Zero;
use rustfft::num_complex::Complex;
use rustfft::{FftDirection, FftPlanner};

use crate::Image;

/// Frequency representation with real and imaginary parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSpectrum {
    pub real: Image,
    pub imag: Image,
}

/// Frequency representation with magnitudes and phases.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarSpectrum {
    pub magnitude: Image,
    pub phase: Image,
}

impl ComplexSpectrum {
    pub fn width(&self) -> NonZeroU32 {
        self.real.width()
    }

    pub fn height(&self) -> NonZeroU32 {
        self.real.height()
    }

    pub fn to_polar(&self) -> PolarSpectrum {
        let mut magnitude = self.real.new_like();
        let mut phase = self.real.new_like();
        let src = self.real.pixels().iter().zip(self.imag.pixels());
        let dst = magnitude.pixels_mut().iter_mut().zip(phase.pixels_mut());
        for ((&re, &im), (m, p)) in src.zip(dst) {
            *m = re.hypot(im);
            *p = im.atan2(re);
        }
        PolarSpectrum { magnitude, phase }
    }
}

impl PolarSpectrum {
    pub fn width(&self) -> NonZeroU32 {
        self.magnitude.width()
    }

    pub fn height(&self) -> NonZeroU32 {
        self.magnitude.height()
    }

    pub fn to_complex(&self) -> ComplexSpectrum {
        let mut real = self.magnitude.new_like();
        let mut imag = self.magnitude.new_like();
        let src = self.magnitude.pixels().iter().zip(self.phase.pixels());
        let dst = real.pixels_mut().iter_mut().zip(imag.pixels_mut());
        for ((&m, &p), (re, im)) in src.zip(dst) {
            let (sin, cos) = p.sin_cos();
            *re = m * cos;
            *im = m * sin;
        }
        ComplexSpectrum { real, imag }
    }
}

/// Source of 2D Fourier transforms.
///
/// Implementations must use the same normalisation convention for forward
/// and inverse transforms, so that `inverse(forward(x)) == x` within floating
/// point tolerance. Dimensions of images are preserved by all transforms.
pub trait FourierProvider {
    fn forward_complex(&self, image: &Image) -> ComplexSpectrum;

    fn inverse_complex(&self, spectrum: &ComplexSpectrum) -> Image;

    fn forward_polar(&self, image: &Image) -> PolarSpectrum {
        self.forward_complex(image).to_polar()
    }

    fn inverse_polar(&self, spectrum: &PolarSpectrum) -> Image {
        self.inverse_complex(&spectrum.to_complex())
    }
}

impl<T: FourierProvider + ?Sized> FourierProvider for &T {
    fn forward_complex(&self, image: &Image) -> ComplexSpectrum {
        (**self).forward_complex(image)
    }

    fn inverse_complex(&self, spectrum: &ComplexSpectrum) -> Image {
        (**self).inverse_complex(spectrum)
    }

    fn forward_polar(&self, image: &Image) -> PolarSpectrum {
        (**self).forward_polar(image)
    }

    fn inverse_polar(&self, spectrum: &PolarSpectrum) -> Image {
        (**self).inverse_polar(spectrum)
    }
}

/// [FourierProvider] based on [rustfft].
///
/// The 2D transform is computed as 1D transforms of all rows followed
/// by 1D transforms of all columns, in `f64` precision. Forward transform
/// is not scaled, inverse transform is scaled by `1 / (width * height)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RustFftProvider;

impl RustFftProvider {
    pub fn new() -> Self {
        Self
    }

    fn transform(
        &self,
        buffer: &mut [Complex<f64>],
        width: usize,
        height: usize,
        direction: FftDirection,
    ) {
        let mut planner = FftPlanner::<f64>::new();
        let row_fft = planner.plan_fft(width, direction);
        let col_fft = planner.plan_fft(height, direction);

        for row in buffer.chunks_exact_mut(width) {
            row_fft.process(row);
        }

        let mut column = vec![Complex::zero(); height];
        for x in 0..width {
            for (y, value) in column.iter_mut().enumerate() {
                *value = buffer[y * width + x];
            }
            col_fft.process(&mut column);
            for (y, &value) in column.iter().enumerate() {
                buffer[y * width + x] = value;
            }
        }
    }
}

impl FourierProvider for RustFftProvider {
    fn forward_complex(&self, image: &Image) -> ComplexSpectrum {
        let width = image.width().get() as usize;
        let height = image.height().get() as usize;
        let mut buffer: Vec<Complex<f64>> = image
            .pixels()
            .iter()
            .map(|&v| Complex::new(v as f64, 0.))
            .collect();
        self.transform(&mut buffer, width, height, FftDirection::Forward);

        let mut real = image.new_like();
        let mut imag = image.new_like();
        let dst = real.pixels_mut().iter_mut().zip(imag.pixels_mut());
        for (value, (re, im)) in buffer.iter().zip(dst) {
            *re = value.re as f32;
            *im = value.im as f32;
        }
        ComplexSpectrum { real, imag }
    }

    fn inverse_complex(&self, spectrum: &ComplexSpectrum) -> Image {
        let width = spectrum.width().get() as usize;
        let height = spectrum.height().get() as usize;
        let mut buffer: Vec<Complex<f64>> = spectrum
            .real
            .pixels()
            .iter()
            .zip(spectrum.imag.pixels())
            .map(|(&re, &im)| Complex::new(re as f64, im as f64))
            .collect();
        self.transform(&mut buffer, width, height, FftDirection::Inverse);

        let scale = 1. / (width * height) as f64;
        let mut image = spectrum.real.new_like();
        for (value, dst) in buffer.iter().zip(image.pixels_mut()) {
            *dst = (value.re * scale) as f32;
        }
        image
    }
}

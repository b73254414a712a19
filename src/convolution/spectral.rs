use std::num::NonZeroU32;

use crate::fourier::{ComplexSpectrum, FourierProvider, PolarSpectrum};
use crate::{Image, ImageTooSmallError, Kernel};

/// Places the kernel into an image of given size for multiplication
/// in the frequency domain.
///
/// The center of the kernel lands at position (0, 0). Other weights keep
/// their offsets from the center and wrap around edges of the image.
/// All remaining pixels are zero.
pub fn embed_kernel(kernel: &Kernel, width: NonZeroU32, height: NonZeroU32) -> Image {
    let rows = height.get() as isize;
    let cols = width.get() as isize;
    let khh = kernel.half_height() as isize;
    let khw = kernel.half_width() as isize;

    let mut embedded = Image::new(width, height);
    let pixels = embedded.pixels_mut();
    for (y, kernel_row) in kernel.rows().enumerate() {
        let dst_y = (y as isize - khh).rem_euclid(rows);
        for (x, &weight) in kernel_row.iter().enumerate() {
            let dst_x = (x as isize - khw).rem_euclid(cols);
            pixels[(dst_y * cols + dst_x) as usize] = weight;
        }
    }
    embedded
}

/// Circular convolution through multiplication of real and imaginary
/// parts of the spectra of the image and the kernel.
///
/// Edges of the result are mixed with pixels from the opposite edges.
pub fn spectral_convolution_complex(
    image: &Image,
    kernel: &Kernel,
    provider: &impl FourierProvider,
) -> Result<Image, ImageTooSmallError> {
    kernel.check_fits(image)?;
    test_log!("spectral convolution (complex)");

    let embedded = embed_kernel(kernel, image.width(), image.height());
    let kernel_spectrum = provider.forward_complex(&embedded);
    let image_spectrum = provider.forward_complex(image);

    let mut real = image.new_like();
    let mut imag = image.new_like();
    let kernel_bins = kernel_spectrum
        .real
        .pixels()
        .iter()
        .zip(kernel_spectrum.imag.pixels());
    let image_bins = image_spectrum
        .real
        .pixels()
        .iter()
        .zip(image_spectrum.imag.pixels());
    let dst_bins = real.pixels_mut().iter_mut().zip(imag.pixels_mut());
    for (((&kr, &ki), (&ir, &ii)), (dst_re, dst_im)) in kernel_bins.zip(image_bins).zip(dst_bins)
    {
        *dst_re = kr * ir - ki * ii;
        *dst_im = ki * ir + kr * ii;
    }

    Ok(provider.inverse_complex(&ComplexSpectrum { real, imag }))
}

/// The same as [spectral_convolution_complex] but spectra are multiplied
/// in the polar form: magnitudes are multiplied and phases are added.
pub fn spectral_convolution_polar(
    image: &Image,
    kernel: &Kernel,
    provider: &impl FourierProvider,
) -> Result<Image, ImageTooSmallError> {
    kernel.check_fits(image)?;
    test_log!("spectral convolution (polar)");

    let embedded = embed_kernel(kernel, image.width(), image.height());
    let kernel_spectrum = provider.forward_polar(&embedded);
    let image_spectrum = provider.forward_polar(image);

    let magnitude = zip_map(
        &kernel_spectrum.magnitude,
        &image_spectrum.magnitude,
        |k, i| k * i,
    );
    let phase = zip_map(&kernel_spectrum.phase, &image_spectrum.phase, |k, i| k + i);

    Ok(provider.inverse_polar(&PolarSpectrum { magnitude, phase }))
}

fn zip_map(a: &Image, b: &Image, f: impl Fn(f32, f32) -> f32) -> Image {
    let mut res = a.new_like();
    let src = a.pixels().iter().zip(b.pixels());
    for ((&a, &b), dst) in src.zip(res.pixels_mut()) {
        *dst = f(a, b);
    }
    res
}

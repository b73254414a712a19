use std::cell::Cell;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fast_image_convolve as fc;
use fast_image_convolve::testing::{clear_log, logs_contain, messages};
use fast_image_convolve::{
    ComplexSpectrum, ConvolutionAlg, ConvolutionConfig, Convolver, FourierProvider, Image,
    ImageTooSmallError, Kernel, RustFftProvider, SpectralMultiply,
};

use utils::{assert_close, filled_image, is_border, random_image, random_kernel};

mod utils;

const ALL_ALGORITHMS: [ConvolutionAlg; 3] = [
    ConvolutionAlg::Spatial,
    ConvolutionAlg::Spectral(SpectralMultiply::Complex),
    ConvolutionAlg::Spectral(SpectralMultiply::Polar),
];

fn convolver(kernel: Kernel, algorithm: ConvolutionAlg) -> Convolver {
    Convolver::new(ConvolutionConfig::new(kernel).algorithm(algorithm))
}

#[test]
fn box_kernel_on_uniform_image() {
    let mut image = filled_image(5, 5, 10.);
    let kernel = Kernel::new(vec![vec![1. / 9.; 3]; 3]).unwrap();
    convolver(kernel, ConvolutionAlg::Spatial)
        .process(&mut image)
        .unwrap();

    assert!((image.get(2, 2) - 10.).abs() < 1e-5);
    let mut border_count = 0;
    for row in 0..5 {
        for col in 0..5 {
            if row == 0 || row == 4 || col == 0 || col == 4 {
                assert_eq!(image.get(row, col), 0.);
                border_count += 1;
            }
        }
    }
    assert_eq!(border_count, 16);
}

#[test]
fn box_kernel_on_uniform_image_in_frequency_domain() {
    for multiply in [SpectralMultiply::Complex, SpectralMultiply::Polar] {
        let mut image = filled_image(5, 5, 10.);
        let kernel = Kernel::box_filter(3).unwrap();
        convolver(kernel, ConvolutionAlg::Spectral(multiply))
            .process(&mut image)
            .unwrap();
        for row in 1..4 {
            for col in 1..4 {
                assert!((image.get(row, col) - 10.).abs() < 1e-3, "{multiply:?}");
            }
        }
        assert_eq!(image.get(0, 2), 0.);
        assert_eq!(image.get(4, 2), 0.);
        assert_eq!(image.get(2, 0), 0.);
        assert_eq!(image.get(2, 4), 0.);
    }
}

#[test]
fn identity_kernel_multiplies_every_pixel() {
    let mut rng = StdRng::seed_from_u64(1);
    let image = random_image(&mut rng, 13, 7);
    for c in [1., 0.5, -3.] {
        let kernel = Kernel::new(vec![vec![c]]).unwrap();
        let res = convolver(kernel, ConvolutionAlg::Spatial)
            .convolve(&image)
            .unwrap();
        for (&src, &dst) in image.pixels().iter().zip(res.pixels()) {
            assert_eq!(dst, src * c);
        }
    }
}

#[test]
fn image_smaller_than_kernel() {
    let kernel = Kernel::box_filter(5).unwrap();
    for (width, height) in [(4, 9), (9, 4), (4, 4)] {
        let image = filled_image(width, height, 1.);
        for algorithm in ALL_ALGORITHMS {
            let mut processed = image.clone();
            let res = convolver(kernel.clone(), algorithm).process(&mut processed);
            assert_eq!(
                res.unwrap_err(),
                ImageTooSmallError {
                    image_width: width,
                    image_height: height,
                    kernel_width: 5,
                    kernel_height: 5,
                }
            );
            assert_eq!(processed, image);
        }
    }

    let image = filled_image(4, 9, 1.);
    let provider = RustFftProvider;
    assert!(fc::spatial_convolution(&image, &kernel).is_err());
    assert!(fc::spectral_convolution_complex(&image, &kernel, &provider).is_err());
    assert!(fc::spectral_convolution_polar(&image, &kernel, &provider).is_err());
}

#[test]
fn image_equal_to_kernel_is_accepted() {
    let kernel = Kernel::box_filter(7).unwrap();
    let image = filled_image(7, 7, 2.);
    for algorithm in ALL_ALGORITHMS {
        let res = convolver(kernel.clone(), algorithm).convolve(&image).unwrap();
        assert!((res.get(3, 3) - 2.).abs() < 1e-3, "{algorithm:?}");
    }
}

#[test]
fn all_algorithms_agree_inside_border() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let kernel = random_kernel(&mut rng, 9);
        let width = rng.gen_range(kernel.width() as u32..40);
        let height = rng.gen_range(kernel.height() as u32..40);
        let image = random_image(&mut rng, width, height);

        let spatial = convolver(kernel.clone(), ConvolutionAlg::Spatial)
            .convolve(&image)
            .unwrap();
        for multiply in [SpectralMultiply::Complex, SpectralMultiply::Polar] {
            let spectral = convolver(kernel.clone(), ConvolutionAlg::Spectral(multiply))
                .convolve(&image)
                .unwrap();
            assert_close(&spatial, &spectral, 1e-3, Some(&kernel));
        }
    }
}

#[test]
fn polar_and_complex_multiplications_agree() {
    let mut rng = StdRng::seed_from_u64(7);
    let provider = RustFftProvider;
    for _ in 0..20 {
        let kernel = random_kernel(&mut rng, 11);
        let width = rng.gen_range(kernel.width() as u32..48);
        let height = rng.gen_range(kernel.height() as u32..48);
        let image = random_image(&mut rng, width, height);

        let complex = fc::spectral_convolution_complex(&image, &kernel, &provider).unwrap();
        let polar = fc::spectral_convolution_polar(&image, &kernel, &provider).unwrap();
        // Whole images are compared, including wrapped edges.
        assert_close(&complex, &polar, 1e-3, None);
    }
}

#[test]
fn border_is_zero_for_all_algorithms() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..10 {
        let kernel = random_kernel(&mut rng, 9);
        let width = rng.gen_range(kernel.width() as u32..32);
        let height = rng.gen_range(kernel.height() as u32..32);
        // Avoid zero pixels to be sure border was zeroed by the convolver
        let image = filled_image(width, height, 1.);
        let kernel = Kernel::from_vec(
            kernel.width(),
            kernel.height(),
            vec![1.; kernel.cell_count()],
        )
        .unwrap();

        for algorithm in ALL_ALGORITHMS {
            let res = convolver(kernel.clone(), algorithm).convolve(&image).unwrap();
            for row in 0..height {
                for col in 0..width {
                    let value = res.get(row, col);
                    if is_border(&image, &kernel, row, col) {
                        assert_eq!(value, 0., "{algorithm:?} ({row}, {col})");
                    } else {
                        assert!(value > 0., "{algorithm:?} ({row}, {col})");
                    }
                }
            }
        }
    }
}

#[test]
fn small_kernels_always_use_spatial_convolution() {
    let mut rng = StdRng::seed_from_u64(5);
    let image = random_image(&mut rng, 32, 32);
    // 45 weights
    let kernel = Kernel::from_vec(9, 5, vec![0.02; 45]).unwrap();
    for allow_spectral in [false, true] {
        let config = ConvolutionConfig::new(kernel.clone()).allow_spectral(allow_spectral);
        assert_eq!(config.selected_algorithm(), ConvolutionAlg::Spatial);

        clear_log();
        Convolver::new(config).convolve(&image).unwrap();
        assert_eq!(messages(), vec!["spatial convolution".to_string()]);
    }
}

#[test]
fn big_kernels_depend_on_spectral_flag() {
    let mut rng = StdRng::seed_from_u64(6);
    let image = random_image(&mut rng, 32, 32);
    // 49 weights
    let kernel = Kernel::box_filter(7).unwrap();

    let config = ConvolutionConfig::new(kernel.clone()).allow_spectral(false);
    assert_eq!(config.selected_algorithm(), ConvolutionAlg::Spatial);
    clear_log();
    let spatial = Convolver::new(config).convolve(&image).unwrap();
    assert!(logs_contain("spatial convolution"));
    assert!(!logs_contain("spectral convolution"));

    let config = ConvolutionConfig::new(kernel.clone());
    assert_eq!(
        config.selected_algorithm(),
        ConvolutionAlg::Spectral(SpectralMultiply::Polar)
    );
    clear_log();
    let spectral = Convolver::new(config).convolve(&image).unwrap();
    assert!(logs_contain("spectral convolution (polar)"));
    assert!(logs_contain("apply zero border"));
    assert!(!logs_contain("spatial convolution"));

    let config = ConvolutionConfig::new(kernel)
        .algorithm(ConvolutionAlg::Auto(SpectralMultiply::Complex));
    clear_log();
    Convolver::new(config).convolve(&image).unwrap();
    assert!(logs_contain("spectral convolution (complex)"));

    assert_close(&spatial, &spectral, 1e-3, None);
}

#[test]
fn convolver_is_shared_between_threads() {
    let mut rng = StdRng::seed_from_u64(8);
    let images: Vec<Image> = (0..4).map(|_| random_image(&mut rng, 24, 20)).collect();
    let convolver = Convolver::new(ConvolutionConfig::new(Kernel::gaussian(1.).unwrap()));
    let expected: Vec<Image> = images
        .iter()
        .map(|image| convolver.convolve(image).unwrap())
        .collect();

    std::thread::scope(|s| {
        let handles: Vec<_> = images
            .iter()
            .map(|image| {
                let mut image = image.clone();
                let convolver = &convolver;
                s.spawn(move || {
                    convolver.process(&mut image).unwrap();
                    image
                })
            })
            .collect();
        for (handle, expected) in handles.into_iter().zip(&expected) {
            assert_eq!(&handle.join().unwrap(), expected);
        }
    });
}

/// Counts calls of forward transforms.
struct CountingProvider {
    forward_calls: Cell<usize>,
}

impl FourierProvider for CountingProvider {
    fn forward_complex(&self, image: &Image) -> ComplexSpectrum {
        self.forward_calls.set(self.forward_calls.get() + 1);
        RustFftProvider.forward_complex(image)
    }

    fn inverse_complex(&self, spectrum: &ComplexSpectrum) -> Image {
        RustFftProvider.inverse_complex(spectrum)
    }
}

#[test]
fn custom_fourier_provider() {
    let provider = CountingProvider {
        forward_calls: Cell::new(0),
    };
    let config = ConvolutionConfig::new(Kernel::box_filter(7).unwrap());
    let convolver = Convolver::with_provider(config, &provider);
    let image = filled_image(16, 16, 1.);
    let res = convolver.convolve(&image).unwrap();

    // Kernel and image
    assert_eq!(provider.forward_calls.get(), 2);
    assert!((res.get(8, 8) - 1.).abs() < 1e-4);
}

#![allow(dead_code)]

use std::num::NonZeroU32;

use rand::rngs::StdRng;
use rand::Rng;

use fast_image_convolve::{Image, Kernel};

pub fn nonzero(v: u32) -> NonZeroU32 {
    NonZeroU32::new(v).unwrap()
}

pub fn filled_image(width: u32, height: u32, value: f32) -> Image {
    Image::from_vec(
        nonzero(width),
        nonzero(height),
        vec![value; (width * height) as usize],
    )
    .unwrap()
}

pub fn random_image(rng: &mut StdRng, width: u32, height: u32) -> Image {
    let pixels = (0..width * height).map(|_| rng.gen::<f32>()).collect();
    Image::from_vec(nonzero(width), nonzero(height), pixels).unwrap()
}

/// Kernel with random odd dimensions not bigger than `max_size`.
pub fn random_kernel(rng: &mut StdRng, max_size: usize) -> Kernel {
    let width = rng.gen_range(0..=max_size / 2) * 2 + 1;
    let height = rng.gen_range(0..=max_size / 2) * 2 + 1;
    let weights = (0..width * height)
        .map(|_| rng.gen_range(-1f32..1f32))
        .collect();
    Kernel::from_vec(width, height, weights).unwrap()
}

/// Returns `true` if pixel is closer to an edge than half of the kernel size.
pub fn is_border(image: &Image, kernel: &Kernel, row: u32, col: u32) -> bool {
    let khh = kernel.half_height() as u32;
    let khw = kernel.half_width() as u32;
    row < khh
        || col < khw
        || row >= image.height().get() - khh
        || col >= image.width().get() - khw
}

pub fn assert_close(left: &Image, right: &Image, tolerance: f32, skip_border_of: Option<&Kernel>) {
    assert_eq!(left.width(), right.width());
    assert_eq!(left.height(), right.height());
    for row in 0..left.height().get() {
        for col in 0..left.width().get() {
            if let Some(kernel) = skip_border_of {
                if is_border(left, kernel, row, col) {
                    continue;
                }
            }
            let l = left.get(row, col);
            let r = right.get(row, col);
            assert!(
                (l - r).abs() <= tolerance,
                "pixels at ({row}, {col}) differ: {l} != {r}"
            );
        }
    }
}

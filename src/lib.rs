#![doc = include_str!("../README.md")]
//!
//! ## Feature flags
#![doc = document_features::document_features!()]

pub use convolution::{
    apply_zero_border, embed_kernel, spatial_convolution, spectral_convolution_complex,
    spectral_convolution_polar, ConvolutionAlg, ConvolutionConfig, Convolver, SpectralMultiply,
    DEFAULT_NAIVE_CELL_THRESHOLD,
};
pub use errors::*;
pub use fourier::{ComplexSpectrum, FourierProvider, PolarSpectrum, RustFftProvider};
#[cfg(feature = "image")]
pub use image_crate::{merge_channels, split_channels, MergeChannelsError};
pub use kernel::Kernel;

pub use crate::image::Image;

#[macro_use]
mod utils;

mod convolution;
mod errors;
pub mod fourier;
mod image;
#[cfg(feature = "image")]
mod image_crate;
mod kernel;
#[cfg(feature = "for_testing")]
pub mod testing;

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        mod threading;
        pub(crate) use threading::for_each_row_mut;
    } else {
        pub(crate) use utils::for_each_row_mut;
    }
}

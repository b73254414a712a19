use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageBufferError {
    #[error("Size of buffer don't match to image dimensions")]
    InvalidBufferSize,
    #[error("Width and height of image must be greater than zero")]
    ZeroDimensions,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error(
    "The dimensions of the source image are not equal to the dimensions of the destination image"
)]
pub struct DifferentDimensionsError;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidKernelShape {
    #[error("Kernel cannot be empty")]
    Empty,
    #[error("All rows of kernel must have the same length")]
    Ragged,
    #[error("Kernel must have an odd length along the y-axis")]
    EvenHeight,
    #[error("Kernel must have an odd length along the x-axis")]
    EvenWidth,
    #[error("Kernel is larger than any image can be")]
    TooLarge,
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[error("Sigma of gaussian kernel is too small, too large or not a number: {0}")]
pub struct InvalidSigmaError(pub f32);

/// Image is smaller than the convolution kernel along some axis.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error(
    "Image {image_width}x{image_height} must not be smaller than kernel {kernel_width}x{kernel_height}"
)]
pub struct ImageTooSmallError {
    pub image_width: u32,
    pub image_height: u32,
    pub kernel_width: usize,
    pub kernel_height: usize,
}

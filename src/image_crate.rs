//! Conversion between [Image] and buffers of the `image` crate.
//!
//! Convolution works with one channel, so multichannel images are split
//! into planes, every plane is processed separately and then the planes
//! are merged back.
use std::num::NonZeroU32;

use image::{ImageBuffer, Luma, Pixel};

use crate::{Image, ImageBufferError};

impl TryFrom<ImageBuffer<Luma<f32>, Vec<f32>>> for Image {
    type Error = ImageBufferError;

    fn try_from(buffer: ImageBuffer<Luma<f32>, Vec<f32>>) -> Result<Self, Self::Error> {
        let (width, height) = non_zero_dimensions(buffer.width(), buffer.height())?;
        Image::from_vec(width, height, buffer.into_raw())
    }
}

impl From<Image> for ImageBuffer<Luma<f32>, Vec<f32>> {
    fn from(image: Image) -> Self {
        let width = image.width().get();
        let height = image.height().get();
        match ImageBuffer::from_raw(width, height, image.into_vec()) {
            Some(buffer) => buffer,
            // Image keeps length of its buffer equal to width * height.
            None => unreachable!(),
        }
    }
}

fn non_zero_dimensions(
    width: u32,
    height: u32,
) -> Result<(NonZeroU32, NonZeroU32), ImageBufferError> {
    match (NonZeroU32::new(width), NonZeroU32::new(height)) {
        (Some(width), Some(height)) => Ok((width, height)),
        _ => Err(ImageBufferError::ZeroDimensions),
    }
}

/// Splits an image with `f32` components into separate planes,
/// one [Image] for every channel.
pub fn split_channels<P>(buffer: &ImageBuffer<P, Vec<f32>>) -> Result<Vec<Image>, ImageBufferError>
where
    P: Pixel<Subpixel = f32>,
{
    let (width, height) = non_zero_dimensions(buffer.width(), buffer.height())?;
    let channels = P::CHANNEL_COUNT as usize;
    let mut planes = vec![Image::new(width, height); channels];
    for (i, pixel) in buffer.as_raw().chunks_exact(channels).enumerate() {
        for (plane, &component) in planes.iter_mut().zip(pixel) {
            plane.pixels_mut()[i] = component;
        }
    }
    Ok(planes)
}

/// Merges planes created by [split_channels] back into one image.
pub fn merge_channels<P>(planes: &[Image]) -> Result<ImageBuffer<P, Vec<f32>>, MergeChannelsError>
where
    P: Pixel<Subpixel = f32>,
{
    let channels = P::CHANNEL_COUNT as usize;
    if planes.len() != channels {
        return Err(MergeChannelsError::InvalidChannelsCount);
    }
    let width = planes[0].width();
    let height = planes[0].height();
    if planes
        .iter()
        .any(|p| p.width() != width || p.height() != height)
    {
        return Err(MergeChannelsError::DifferentDimensions);
    }

    let mut buffer = vec![0f32; planes[0].pixels().len() * channels];
    for (c, plane) in planes.iter().enumerate() {
        for (pixel, &component) in buffer.chunks_exact_mut(channels).zip(plane.pixels()) {
            pixel[c] = component;
        }
    }
    ImageBuffer::from_raw(width.get(), height.get(), buffer)
        .ok_or(MergeChannelsError::DifferentDimensions)
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeChannelsError {
    #[error("Count of planes don't match to count of channels of pixel")]
    InvalidChannelsCount,
    #[error("The dimensions of planes are not equal")]
    DifferentDimensions,
}

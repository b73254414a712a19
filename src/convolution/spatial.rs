use crate::{for_each_row_mut, Image, ImageTooSmallError, Kernel};

/// Convolution in the spatial domain by direct summation.
///
/// Value of every pixel where the whole kernel fits into the image is
/// a sum of products of the kernel weights and the source pixels, with
/// the kernel flipped along both axes. Other pixels of the result are
/// set to zero.
pub fn spatial_convolution(image: &Image, kernel: &Kernel) -> Result<Image, ImageTooSmallError> {
    kernel.check_fits(image)?;
    test_log!("spatial convolution");

    let width = image.width().get() as usize;
    let height = image.height().get() as usize;
    let khh = kernel.half_height();
    let khw = kernel.half_width();
    let src_pixels = image.pixels();

    let mut dst_image = image.new_like();
    for_each_row_mut(dst_image.pixels_mut(), width, |y, dst_row| {
        if y < khh || y >= height - khh {
            return;
        }
        for x in khw..width - khw {
            let mut val = 0f32;
            for (ky, kernel_row) in kernel.rows().enumerate() {
                let src_y = y + khh - ky;
                let src_row = &src_pixels[src_y * width..(src_y + 1) * width];
                for (kx, &k) in kernel_row.iter().enumerate() {
                    val += src_row[x + khw - kx] * k;
                }
            }
            dst_row[x] = val;
        }
    });
    Ok(dst_image)
}

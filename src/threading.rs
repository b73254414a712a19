use rayon::current_num_threads;
use rayon::prelude::*;

/// Calls `f` for every row of the buffer with index of the row.
/// Rows are processed in the `rayon` thread pool if the image is big enough.
#[inline]
pub(crate) fn for_each_row_mut<F>(pixels: &mut [f32], width: usize, f: F)
where
    F: Fn(usize, &mut [f32]) + Sync + Send,
{
    let height = pixels.len() / width;
    let max_num_parts = calculate_max_h_parts_number(width, height);
    if current_num_threads() > 1 && max_num_parts > 1 {
        let rows_per_part = height.div_ceil(max_num_parts.min(current_num_threads()));
        pixels
            .par_chunks_mut(width * rows_per_part)
            .enumerate()
            .for_each(|(part, chunk)| {
                let first_row = part * rows_per_part;
                for (y, row) in chunk.chunks_exact_mut(width).enumerate() {
                    f(first_row + y, row);
                }
            });
    } else {
        for (y, row) in pixels.chunks_exact_mut(width).enumerate() {
            f(y, row);
        }
    }
}

/// It is not optimal to split images on too small parts.
/// We have to calculate minimal height of one part.
/// For small images, it is equal to `constant / area`.
/// For tall images, it is equal to `height / 256`.
fn calculate_max_h_parts_number(width: usize, height: usize) -> usize {
    if width == 0 || height == 0 {
        return 1;
    }
    let area = height * height.max(width);
    let min_height = ((1 << 14) / area).max(height / 256);
    height / min_height.max(1)
}

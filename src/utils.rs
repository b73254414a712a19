/// Records a message about the chosen processing path.
///
/// Messages are always passed to [log::trace] and also collected
/// by [testing](crate::testing) if the `for_testing` feature is enabled.
macro_rules! test_log {
    ($s:expr) => {
        log::trace!("{}", $s);
        #[cfg(feature = "for_testing")]
        {
            $crate::testing::log_message($s);
        }
    };
}

/// Calls `f` for every row of the buffer with index of the row.
#[cfg(not(feature = "rayon"))]
#[inline]
pub(crate) fn for_each_row_mut<F>(pixels: &mut [f32], width: usize, f: F)
where
    F: Fn(usize, &mut [f32]),
{
    for (y, row) in pixels.chunks_exact_mut(width).enumerate() {
        f(y, row);
    }
}

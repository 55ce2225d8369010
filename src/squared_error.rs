mod rust;
#[cfg(target_arch = "x86_64")]
mod sse2;


use std::num::NonZeroUsize;

use cfg_if::cfg_if;

use crate::util::Pixel;

/// Fills a padded squared error map from a reference and a predicted block.
///
/// For every pixel `(row, col)` of the `width`x`height` block this writes
/// `(src - pred)^2` to `dest[row * dest_pitch + SSE_PAD + col]`. The first
/// `SSE_PAD` columns of each destination row are reserved for the window
/// smoother and are never written. The difference is taken in 32-bit
/// arithmetic, so the result is exact for any 16-bit input.
///
/// # Parameters
/// - `dest`: Padded squared error buffer
/// - `dest_pitch`: Number of values per row in `dest`, at least `width + 2 * SSE_PAD`
/// - `src`: Reference block
/// - `src_pitch`: Number of pixels per row in `src`
/// - `pred`: Motion compensated prediction of the block
/// - `pred_pitch`: Number of pixels per row in `pred`
/// - `width`: Block width, a multiple of 8
/// - `height`: Block height
pub fn squared_error<T: Pixel>(
    dest: &mut [u32],
    dest_pitch: NonZeroUsize,
    src: &[T],
    src_pitch: NonZeroUsize,
    pred: &[T],
    pred_pitch: NonZeroUsize,
    width: NonZeroUsize,
    height: NonZeroUsize,
) {
    cfg_if! {
        if #[cfg(all(target_arch = "x86_64", not(feature = "no_simd")))] {
            if crate::util::has_sse2() {
                // SAFETY: We check for SSE2 first
                unsafe {
                    sse2::squared_error(dest, dest_pitch, src, src_pitch, pred, pred_pitch, width, height);
                }
                return;
            }
        }
    }

    rust::squared_error(dest, dest_pitch, src, src_pitch, pred, pred_pitch, width, height);
}

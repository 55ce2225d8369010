mod rust;
#[cfg(target_arch = "x86_64")]
mod sse2;


use std::num::NonZeroUsize;

use cfg_if::cfg_if;

use crate::params::WINDOW_LENGTH;

/// Lane masks for the horizontal 5-tap sum over 4 output columns.
///
/// A group of 4 output columns starting at `col` sees 8 consecutive column
/// sums, `col - 2` through `col + 5`, split over two 4-lane vectors. Output
/// column `col + phase` needs lanes `phase..=phase + 4` of those 8, so
/// `WINDOW_MASKS[phase][half][lane]` is all ones exactly when
/// `half * 4 + lane` falls inside that range.
#[cfg_attr(
    not(all(target_arch = "x86_64", not(feature = "no_simd"))),
    allow(dead_code)
)]
pub(crate) const WINDOW_MASKS: [[[u32; 4]; 2]; 4] = window_masks();

const fn window_masks() -> [[[u32; 4]; 2]; 4] {
    let mut masks = [[[0u32; 4]; 2]; 4];
    let mut phase = 0;
    while phase < 4 {
        let mut lane = phase;
        while lane < phase + WINDOW_LENGTH {
            masks[phase][lane / 4][lane % 4] = u32::MAX;
            lane += 1;
        }
        phase += 1;
    }
    masks
}

/// Computes the 5x5 neighborhood sum of a padded squared error map.
///
/// Each output value is the sum of the 25 squared errors centered on that
/// pixel, where rows and columns outside the block take the value of the
/// nearest row or column inside it. The result is identical to padding the
/// map by replication and applying a plain 5x5 box filter. Sums wrap on
/// `u32` overflow in every implementation.
///
/// # Parameters
/// - `dest`: Output grid of window sums
/// - `dest_pitch`: Number of values per row in `dest`
/// - `src`: Squared error map as written by `squared_error`, with `SSE_PAD`
///   reserved columns on the left of each row
/// - `src_pitch`: Number of values per row in `src`, at least `width + 2 * SSE_PAD`
/// - `width`: Block width, a multiple of 4
/// - `height`: Block height
pub fn window_sums(
    dest: &mut [u32],
    dest_pitch: NonZeroUsize,
    src: &[u32],
    src_pitch: NonZeroUsize,
    width: NonZeroUsize,
    height: NonZeroUsize,
) {
    cfg_if! {
        if #[cfg(all(target_arch = "x86_64", not(feature = "no_simd")))] {
            if crate::util::has_sse2() {
                // SAFETY: We check for SSE2 first
                unsafe {
                    sse2::window_sums(dest, dest_pitch, src, src_pitch, width, height);
                }
                return;
            }
        }
    }

    rust::window_sums(dest, dest_pitch, src, src_pitch, width, height);
}

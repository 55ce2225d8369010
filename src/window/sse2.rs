#![allow(clippy::undocumented_unsafe_blocks)]

use std::{arch::x86_64::*, num::NonZeroUsize};

use crate::params::{SSE_PAD, WINDOW_LENGTH, WINDOW_RADIUS};

use super::WINDOW_MASKS;

#[target_feature(enable = "sse2")]
pub(super) unsafe fn window_sums(
    dest: &mut [u32],
    dest_pitch: NonZeroUsize,
    src: &[u32],
    src_pitch: NonZeroUsize,
    width: NonZeroUsize,
    height: NonZeroUsize,
) {
    let (w, h) = (width.get(), height.get());
    let src_pitch = src_pitch.get();
    let dest_pitch = dest_pitch.get();
    // Check the array bounds once at the start of the loop.
    assert!(w % 4 == 0, "block width must be a multiple of 4");
    assert!(src_pitch >= w + 2 * SSE_PAD);
    assert!(src.len() >= src_pitch * (h - 1) + w + 2 * SSE_PAD);
    assert!(dest.len() >= dest_pitch * (h - 1) + w);

    let masks = load_masks();
    let src = src.as_ptr();
    let dest = dest.as_mut_ptr();

    // Traverse 4 columns at a time
    for col in (0..w).step_by(4) {
        let column = src.add(col);

        // Rows -2 and -1 replicate row 0.
        let top = load_row(column, 0, src_pitch, col, w, h);
        let mut rows = [top; WINDOW_LENGTH];
        for (offset, slot) in rows.iter_mut().enumerate().skip(WINDOW_RADIUS + 1) {
            *slot = load_row(column, offset - WINDOW_RADIUS, src_pitch, col, w, h);
        }

        let mut sum = [_mm_setzero_si128(); 2];
        for loaded in &rows {
            sum[0] = _mm_add_epi32(sum[0], loaded[0]);
            sum[1] = _mm_add_epi32(sum[1], loaded[1]);
        }

        for row in 0..h {
            let dest_row = dest.add(row * dest_pitch + col);
            for (phase, mask) in masks.iter().enumerate() {
                *dest_row.add(phase) = mask_and_hadd(sum[0], sum[1], mask);
            }

            if row + 1 < h {
                // Drop the oldest row from the running sum and add the next one.
                let entering = load_row(column, row + WINDOW_RADIUS + 1, src_pitch, col, w, h);
                sum[0] = _mm_add_epi32(_mm_sub_epi32(sum[0], rows[0][0]), entering[0]);
                sum[1] = _mm_add_epi32(_mm_sub_epi32(sum[1], rows[0][1]), entering[1]);
                rows.rotate_left(1);
                rows[WINDOW_LENGTH - 1] = entering;
            }
        }
    }
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn load_masks() -> [[__m128i; 2]; 4] {
    let mut masks = [[_mm_setzero_si128(); 2]; 4];
    for (loaded, mask) in masks.iter_mut().zip(&WINDOW_MASKS) {
        loaded[0] = _mm_loadu_si128(mask[0].as_ptr() as *const __m128i);
        loaded[1] = _mm_loadu_si128(mask[1].as_ptr() as *const __m128i);
    }
    masks
}

/// Loads the 8 values around a group of 4 columns from row `row`, clamped
/// to the last row of the block.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn load_row(
    column: *const u32,
    row: usize,
    pitch: usize,
    col: usize,
    width: usize,
    height: usize,
) -> [__m128i; 2] {
    load_and_pad(column.add(row.min(height - 1) * pitch), col, width)
}

/// `src` points at the padded position of column `col - 2`.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn load_and_pad(src: *const u32, col: usize, width: usize) -> [__m128i; 2] {
    let left = _mm_loadu_si128(src as *const __m128i);
    let right = _mm_loadu_si128(src.add(4) as *const __m128i);
    [
        // For the first column, replicate the first element twice to the left
        if col == 0 {
            _mm_shuffle_epi32(left, 0xEA)
        } else {
            left
        },
        // For the last column, replicate the last element twice to the right
        if col + 4 >= width {
            _mm_shuffle_epi32(right, 0x54)
        } else {
            right
        },
    ]
}

/// Sums the 5 of the 8 lanes selected by `mask`.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn mask_and_hadd(lo: __m128i, hi: __m128i, mask: &[__m128i; 2]) -> u32 {
    // A = [A0+B0, A1+B1, A2+B2, A3+B3]
    let a = _mm_add_epi32(_mm_and_si128(lo, mask[0]), _mm_and_si128(hi, mask[1]));
    // A = [A0+B0+A2+B2, A1+B1+A3+B3, X, X]
    let a = _mm_add_epi32(a, _mm_srli_si128(a, 8));
    // A = [A0+B0+A2+B2+A1+B1+A3+B3, X, X, X]
    let a = _mm_add_epi32(a, _mm_srli_si128(a, 4));
    _mm_cvtsi128_si32(a) as u32
}

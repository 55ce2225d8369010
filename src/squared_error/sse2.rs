#![allow(clippy::undocumented_unsafe_blocks)]

use std::{arch::x86_64::*, num::NonZeroUsize};

use crate::{params::SSE_PAD, util::Pixel};

#[target_feature(enable = "sse2")]
pub(super) unsafe fn squared_error<T: Pixel>(
    dest: &mut [u32],
    dest_pitch: NonZeroUsize,
    src: &[T],
    src_pitch: NonZeroUsize,
    pred: &[T],
    pred_pitch: NonZeroUsize,
    width: NonZeroUsize,
    height: NonZeroUsize,
) {
    let (w, h) = (width.get(), height.get());
    // Check the array bounds once at the start of the loop.
    assert!(w % 8 == 0, "block width must be a multiple of 8");
    assert!(src.len() >= src_pitch.get() * (h - 1) + w);
    assert!(pred.len() >= pred_pitch.get() * (h - 1) + w);
    assert!(dest.len() >= dest_pitch.get() * (h - 1) + SSE_PAD + w);

    match size_of::<T>() {
        1 => squared_error_u8(
            dest.as_mut_ptr(),
            dest_pitch.get(),
            src.as_ptr().cast(),
            src_pitch.get(),
            pred.as_ptr().cast(),
            pred_pitch.get(),
            w,
            h,
        ),
        2 => squared_error_u16(
            dest.as_mut_ptr(),
            dest_pitch.get(),
            src.as_ptr().cast(),
            src_pitch.get(),
            pred.as_ptr().cast(),
            pred_pitch.get(),
            w,
            h,
        ),
        _ => unreachable!(),
    }
}

#[target_feature(enable = "sse2")]
unsafe fn squared_error_u8(
    dest: *mut u32,
    dest_pitch: usize,
    src: *const u8,
    src_pitch: usize,
    pred: *const u8,
    pred_pitch: usize,
    width: usize,
    height: usize,
) {
    let zero = _mm_setzero_si128();

    for j in 0..height {
        let src_row = src.add(j * src_pitch);
        let pred_row = pred.add(j * pred_pitch);
        let dest_row = dest.add(j * dest_pitch + SSE_PAD);

        let mut i = 0;
        while i < width {
            let a = _mm_unpacklo_epi8(_mm_loadl_epi64(src_row.add(i) as *const __m128i), zero);
            let b = _mm_unpacklo_epi8(_mm_loadl_epi64(pred_row.add(i) as *const __m128i), zero);
            store_squared_diff(dest_row.add(i), a, b);
            i += 8;
        }
    }
}

#[target_feature(enable = "sse2")]
unsafe fn squared_error_u16(
    dest: *mut u32,
    dest_pitch: usize,
    src: *const u16,
    src_pitch: usize,
    pred: *const u16,
    pred_pitch: usize,
    width: usize,
    height: usize,
) {
    for j in 0..height {
        let src_row = src.add(j * src_pitch);
        let pred_row = pred.add(j * pred_pitch);
        let dest_row = dest.add(j * dest_pitch + SSE_PAD);

        let mut i = 0;
        while i < width {
            let a = _mm_loadu_si128(src_row.add(i) as *const __m128i);
            let b = _mm_loadu_si128(pred_row.add(i) as *const __m128i);
            store_squared_diff(dest_row.add(i), a, b);
            i += 8;
        }
    }
}

/// Squares the differences of 8 unsigned 16-bit lanes into 8 `u32` values.
#[inline]
#[target_feature(enable = "sse2")]
unsafe fn store_squared_diff(dest: *mut u32, a: __m128i, b: __m128i) {
    // |a - b| stays within u16 for any pair of 16-bit samples
    let diff = _mm_or_si128(_mm_subs_epu16(a, b), _mm_subs_epu16(b, a));
    let lo = _mm_mullo_epi16(diff, diff);
    let hi = _mm_mulhi_epu16(diff, diff);

    _mm_storeu_si128(dest as *mut __m128i, _mm_unpacklo_epi16(lo, hi));
    _mm_storeu_si128(dest.add(4) as *mut __m128i, _mm_unpackhi_epi16(lo, hi));
}

use std::num::NonZeroUsize;

use crate::{params::SSE_PAD, util::Pixel};

pub(super) fn squared_error<T: Pixel>(
    dest: &mut [u32],
    dest_pitch: NonZeroUsize,
    src: &[T],
    src_pitch: NonZeroUsize,
    pred: &[T],
    pred_pitch: NonZeroUsize,
    width: NonZeroUsize,
    height: NonZeroUsize,
) {
    let width = width.get();

    for j in 0..height.get() {
        let src_row = &src[j * src_pitch.get()..][..width];
        let pred_row = &pred[j * pred_pitch.get()..][..width];
        let dest_row = &mut dest[j * dest_pitch.get() + SSE_PAD..][..width];

        for ((out, &a), &b) in dest_row.iter_mut().zip(src_row).zip(pred_row) {
            let a: i32 = a.into();
            let b: i32 = b.into();
            *out = (a - b).unsigned_abs().pow(2);
        }
    }
}

use std::num::NonZeroUsize;

use crate::params::{MAX_BLOCK_WIDTH, SSE_PAD, WINDOW_LENGTH, WINDOW_RADIUS};

pub(super) fn window_sums(
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
    assert!(w <= MAX_BLOCK_WIDTH);

    // Vertical sums of the current 5-row window, with the edge columns
    // replicated into `WINDOW_RADIUS` extra slots on each side.
    let mut col_sums = [0u32; MAX_BLOCK_WIDTH + 2 * WINDOW_RADIUS];
    let col_sums = &mut col_sums[..w + 2 * WINDOW_RADIUS];

    // Rows -2 and -1 replicate row 0.
    for offset in 0..WINDOW_LENGTH {
        let row = sse_row(src, src_pitch, offset.saturating_sub(WINDOW_RADIUS), w, h);
        for (sum, &v) in col_sums[WINDOW_RADIUS..].iter_mut().zip(row) {
            *sum = sum.wrapping_add(v);
        }
    }

    for row in 0..h {
        let first = col_sums[WINDOW_RADIUS];
        let last = col_sums[WINDOW_RADIUS + w - 1];
        col_sums[..WINDOW_RADIUS].fill(first);
        col_sums[WINDOW_RADIUS + w..].fill(last);

        let dest_row = &mut dest[row * dest_pitch..][..w];
        let mut sum = col_sums[..WINDOW_LENGTH]
            .iter()
            .fold(0u32, |acc, &v| acc.wrapping_add(v));
        dest_row[0] = sum;
        for col in 1..w {
            sum = sum
                .wrapping_add(col_sums[col + WINDOW_LENGTH - 1])
                .wrapping_sub(col_sums[col - 1]);
            dest_row[col] = sum;
        }

        if row + 1 < h {
            let leaving = sse_row(src, src_pitch, row.saturating_sub(WINDOW_RADIUS), w, h);
            let entering = sse_row(src, src_pitch, row + WINDOW_RADIUS + 1, w, h);
            for ((sum, &out), &inc) in col_sums[WINDOW_RADIUS..]
                .iter_mut()
                .zip(leaving)
                .zip(entering)
            {
                *sum = sum.wrapping_sub(out).wrapping_add(inc);
            }
        }
    }
}

/// The in-block part of a squared error row, clamping `row` to the last row.
fn sse_row(src: &[u32], pitch: usize, row: usize, width: usize, height: usize) -> &[u32] {
    &src[row.min(height - 1) * pitch + SSE_PAD..][..width]
}


use std::num::NonZeroUsize;

use tracing::{trace, warn};

use crate::{
    error::TemporalFilterError,
    frame::FrameBuffer,
    params::{BlockSize, DecayParams, MAX_BLOCK_PELS, MAX_PLANES, SSE_LEN, SSE_STRIDE, SubblockStats},
    squared_error::squared_error,
    util::{Pixel, simd_level},
    weight::{Decay, LumaBorrow, PlaneWeighting},
    window::window_sums,
};

/// Transient buffers of one filter invocation.
///
/// The luma squared error map has to outlive the chroma passes, which borrow
/// from it, so each chroma plane writes its own map into `chroma_sse`.
struct Scratch {
    luma_sse: [u32; SSE_LEN],
    chroma_sse: Vec<u32>,
    sums: [u32; MAX_BLOCK_PELS],
}

impl Scratch {
    fn acquire<R>(num_planes: usize, reserve: R) -> Result<Self, TemporalFilterError>
    where
        R: FnOnce(usize) -> Result<Vec<u32>, TemporalFilterError>,
    {
        let chroma_sse = if num_planes > 1 {
            reserve(SSE_LEN)?
        } else {
            Vec::new()
        };

        Ok(Self {
            luma_sse: [0; SSE_LEN],
            chroma_sse,
            sums: [0; MAX_BLOCK_PELS],
        })
    }
}

/// Allocates a zeroed chroma squared error buffer of `len` values.
pub(crate) fn reserve_chroma_scratch(len: usize) -> Result<Vec<u32>, TemporalFilterError> {
    let mut buf = Vec::new();
    if let Err(source) = buf.try_reserve_exact(len) {
        warn!(len, "chroma scratch allocation failed");
        return Err(TemporalFilterError::ScratchAllocation { len, source });
    }
    buf.resize(len, 0);
    Ok(buf)
}

/// Adds the weighted prediction of one block into a temporal accumulator.
///
/// For every pixel of the first `num_planes` planes of the block at
/// (`mb_row`, `mb_col`) this computes how far the motion compensated
/// prediction `pred` can be trusted against `frame`, then adds the weight to
/// `count` and the weighted predicted sample to `accum`. Calling this once
/// per reference frame of a temporal window and dividing `accum` by `count`
/// yields the filtered block.
///
/// `pred`, `accum` and `count` hold one `block_size.pels()` sized region per
/// plane, in plane order, each laid out row by row with the plane's block
/// width as pitch. Existing values in `accum` and `count` are kept and added to.
///
/// # Errors
/// Returns `TemporalFilterError::ScratchAllocation` if the chroma scratch
/// buffer cannot be allocated. `accum` and `count` are left untouched then.
///
/// # Panics
/// - If `num_planes` is not in `1..=MAX_PLANES` or exceeds the planes of `frame`
/// - If `pred`, `accum` or `count` are shorter than `num_planes * block_size.pels()`
/// - If the block does not lie inside the planes of `frame`
/// - In debug builds, if an entry of `count` or `accum` overflows. A `count`
///   entry holds at most 65 full weight additions.
pub fn apply_temporal_filter<T: Pixel>(
    frame: &FrameBuffer<'_, T>,
    block_size: BlockSize,
    mb_row: usize,
    mb_col: usize,
    num_planes: usize,
    pred: &[T],
    stats: &SubblockStats,
    params: &DecayParams,
    accum: &mut [u32],
    count: &mut [u16],
) -> Result<(), TemporalFilterError> {
    filter_block(
        frame,
        block_size,
        mb_row,
        mb_col,
        num_planes,
        pred,
        stats,
        params,
        accum,
        count,
        reserve_chroma_scratch,
    )
}

/// `apply_temporal_filter` with the chroma scratch allocator passed in.
fn filter_block<T: Pixel, R>(
    frame: &FrameBuffer<'_, T>,
    block_size: BlockSize,
    mb_row: usize,
    mb_col: usize,
    num_planes: usize,
    pred: &[T],
    stats: &SubblockStats,
    params: &DecayParams,
    accum: &mut [u32],
    count: &mut [u16],
    reserve: R,
) -> Result<(), TemporalFilterError>
where
    R: FnOnce(usize) -> Result<Vec<u32>, TemporalFilterError>,
{
    assert!(
        (1..=MAX_PLANES).contains(&num_planes),
        "num_planes must be between 1 and {MAX_PLANES}"
    );
    assert!(num_planes <= frame.plane_count());

    let mb_width = block_size.width();
    let mb_height = block_size.height();
    let mb_pels = block_size.pels();
    assert!(pred.len() >= mb_pels * num_planes);
    assert!(accum.len() >= mb_pels * num_planes);
    assert!(count.len() >= mb_pels * num_planes);

    trace!(
        mb_row,
        mb_col,
        num_planes,
        ?block_size,
        simd = ?simd_level(),
        "temporal filter block"
    );

    let mut scratch = Scratch::acquire(num_planes, reserve)?;
    let bit_depth = frame.bit_depth();
    let min_frame_size = frame.min_dimension();
    let luma_ss = frame.subsampling(0);
    // SAFETY: non-zero constant
    let sse_stride = unsafe { NonZeroUsize::new_unchecked(SSE_STRIDE) };

    for plane in 0..num_planes {
        let ss = frame.subsampling(plane);
        // SAFETY: subsampling is at most 1 and blocks are at least 16 wide
        let plane_w = unsafe { NonZeroUsize::new_unchecked(mb_width.get() >> ss.x) };
        // SAFETY: subsampling is at most 1 and blocks are at least 16 tall
        let plane_h = unsafe { NonZeroUsize::new_unchecked(mb_height.get() >> ss.y) };
        let stride = frame.stride(plane);
        let offset = mb_row * plane_h.get() * stride.get() + mb_col * plane_w.get();

        let src = &frame.plane(plane)[offset..];
        let plane_pred = &pred[mb_pels * plane..][..plane_w.get() * plane_h.get()];

        {
            let sse: &mut [u32] = if plane == 0 {
                &mut scratch.luma_sse
            } else {
                assert!(scratch.chroma_sse.len() >= SSE_LEN);
                &mut scratch.chroma_sse
            };

            squared_error(sse, sse_stride, src, stride, plane_pred, plane_w, plane_w, plane_h);
            window_sums(&mut scratch.sums, plane_w, sse, sse_stride, plane_w, plane_h);
        }

        let luma = (plane > 0).then(|| LumaBorrow {
            sse: &scratch.luma_sse,
            pitch: sse_stride,
            ss_x: ss.x - luma_ss.x,
            ss_y: ss.y - luma_ss.y,
        });
        let decay = Decay::new(params.noise_levels[plane], params.q_factor, params.filter_strength);
        let weighting = PlaneWeighting::new(
            plane_w,
            plane_h,
            bit_depth,
            min_frame_size,
            stats,
            decay,
            luma,
        );

        let plane_accum = &mut accum[mb_pels * plane..][..plane_w.get() * plane_h.get()];
        let plane_count = &mut count[mb_pels * plane..][..plane_w.get() * plane_h.get()];
        let sums = &scratch.sums[..plane_w.get() * plane_h.get()];

        for (k, ((acc, cnt), (&sum, &pixel))) in plane_accum
            .iter_mut()
            .zip(plane_count.iter_mut())
            .zip(sums.iter().zip(plane_pred))
            .enumerate()
        {
            let (i, j) = (k / plane_w.get(), k % plane_w.get());
            let weight = weighting.weight(i, j, sum);
            let pixel: u32 = pixel.into();

            *cnt += weight;
            *acc += u32::from(weight) * pixel;
        }
    }

    Ok(())
}

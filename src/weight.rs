#[cfg(test)]
mod tests;

use std::num::{NonZeroU8, NonZeroUsize};

use crate::params::{
    MAX_SCALED_ERROR,
    MotionVector,
    Q_DECAY_THRESHOLD,
    SEARCH_DISTANCE_THRESHOLD,
    SEARCH_ERROR_NORM_WEIGHT,
    SSE_PAD,
    STRENGTH_THRESHOLD,
    SubblockStats,
    WEIGHT_SCALE,
    WINDOW_BLOCK_BALANCE_WEIGHT,
    WINDOW_LENGTH,
};

const MIN_DECAY: f64 = 1e-5;

/// The three decay terms of the weighting curve for one plane.
///
/// Larger decay values shrink the effective error and so raise the weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decay {
    pub noise: f64,
    pub quality: f64,
    pub strength: f64,
}

impl Decay {
    #[must_use]
    pub fn new(noise_level: f64, q_factor: i32, filter_strength: i32) -> Self {
        Self {
            noise: 0.5 + (2.0 * noise_level + 5.0).ln(),
            quality: (f64::from(q_factor) / Q_DECAY_THRESHOLD)
                .powi(2)
                .clamp(MIN_DECAY, 1.0),
            strength: (f64::from(filter_strength) / STRENGTH_THRESHOLD)
                .powi(2)
                .clamp(MIN_DECAY, 1.0),
        }
    }

    #[must_use]
    pub fn product(&self) -> f64 {
        self.noise * self.quality * self.strength
    }
}

/// How much a motion vector amplifies the error of its subblock.
///
/// Vectors shorter than a tenth of the smaller frame dimension leave the
/// error untouched; longer ones scale it linearly with their length.
#[must_use]
pub fn distance_factor(mv: MotionVector, min_frame_size: NonZeroUsize) -> f64 {
    let threshold = (min_frame_size.get() as f64 * SEARCH_DISTANCE_THRESHOLD).max(1.0);
    (mv.magnitude() / threshold).max(1.0)
}

/// Blends the local window error with the block error from motion search.
#[must_use]
pub fn combined_error(window_error: f64, block_error: f64) -> f64 {
    (WINDOW_BLOCK_BALANCE_WEIGHT * window_error + block_error)
        / (WINDOW_BLOCK_BALANCE_WEIGHT + 1.0)
        / SEARCH_ERROR_NORM_WEIGHT
}

/// Mean squared error of a window, scaled back to the 8-bit range.
#[must_use]
pub fn window_error(sum: u32, num_ref_pixels: u32, bit_depth: NonZeroU8) -> f64 {
    let scaled = sum >> ((u32::from(bit_depth.get()) - 8) * 2);
    f64::from(scaled) / f64::from(num_ref_pixels)
}

/// Maps an error to a weight in `0..=WEIGHT_SCALE`.
#[must_use]
pub fn error_to_weight(combined_error: f64, d_factor: f64, decay: &Decay) -> u16 {
    let scaled_error = (combined_error * d_factor / decay.product()).clamp(0.0, MAX_SCALED_ERROR);
    ((-scaled_error).exp() * f64::from(WEIGHT_SCALE)).round() as u16
}

/// Luma squared errors shared with a chroma plane of the same block.
#[derive(Debug, Clone, Copy)]
pub struct LumaBorrow<'a> {
    /// Padded luma squared error map of the current block.
    pub sse: &'a [u32],
    pub pitch: NonZeroUsize,
    /// Chroma subsampling relative to luma.
    pub ss_x: u8,
    pub ss_y: u8,
}

impl LumaBorrow<'_> {
    /// Sums the luma squared errors covering chroma pixel `(row, col)`.
    ///
    /// Returns the sum and the number of luma samples it covers.
    #[must_use]
    pub fn gather(&self, row: usize, col: usize) -> (u32, u32) {
        let mut sum = 0u32;
        let mut count = 0u32;
        for ii in 0..(1usize << self.ss_y) {
            let yy = (row << self.ss_y) + ii;
            let luma_row = &self.sse[yy * self.pitch.get() + SSE_PAD..];
            for jj in 0..(1usize << self.ss_x) {
                let xx = (col << self.ss_x) + jj;
                sum = sum.wrapping_add(luma_row[xx]);
                count += 1;
            }
        }
        (sum, count)
    }
}

/// Per-plane state for turning window sums into weights.
#[derive(Debug, Clone)]
pub struct PlaneWeighting<'a> {
    width: NonZeroUsize,
    height: NonZeroUsize,
    bit_depth: NonZeroU8,
    block_errors: [f64; 4],
    d_factors: [f64; 4],
    decay: Decay,
    luma: Option<LumaBorrow<'a>>,
}

impl<'a> PlaneWeighting<'a> {
    /// `luma` must be set for chroma planes and left empty for luma.
    #[must_use]
    pub fn new(
        width: NonZeroUsize,
        height: NonZeroUsize,
        bit_depth: NonZeroU8,
        min_frame_size: NonZeroUsize,
        stats: &SubblockStats,
        decay: Decay,
        luma: Option<LumaBorrow<'a>>,
    ) -> Self {
        Self {
            width,
            height,
            bit_depth,
            block_errors: stats.mses.map(f64::from),
            d_factors: stats.mvs.map(|mv| distance_factor(mv, min_frame_size)),
            decay,
            luma,
        }
    }

    /// Squared error sum and sample count feeding the weight of `(row, col)`.
    #[must_use]
    pub fn reference_error(&self, row: usize, col: usize, window_sum: u32) -> (u32, u32) {
        let mut sum = window_sum;
        let mut num_ref_pixels = (WINDOW_LENGTH * WINDOW_LENGTH) as u32;

        // Motion search only runs on luma, so chroma leans on the luma error.
        if let Some(luma) = &self.luma {
            let (luma_sum, luma_count) = luma.gather(row, col);
            sum = sum.wrapping_add(luma_sum);
            num_ref_pixels += luma_count;
        }

        (sum, num_ref_pixels)
    }

    /// Weight of pixel `(row, col)` given its 5x5 window sum.
    #[must_use]
    pub fn weight(&self, row: usize, col: usize, window_sum: u32) -> u16 {
        let (sum, num_ref_pixels) = self.reference_error(row, col, window_sum);
        let window_error = window_error(sum, num_ref_pixels, self.bit_depth);

        let subblock = SubblockStats::quadrant(row, col, self.width, self.height);
        let combined = combined_error(window_error, self.block_errors[subblock]);

        error_to_weight(combined, self.d_factors[subblock], &self.decay)
    }
}

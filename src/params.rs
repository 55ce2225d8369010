
use bitflags::bitflags;
use std::num::NonZeroUsize;

use anyhow::{Result, bail};

/// Luma plus two chroma planes.
pub const MAX_PLANES: usize = 3;

/// Side length of the square error window around each pixel.
pub const WINDOW_LENGTH: usize = 5;
/// Samples on each side of the window center.
pub const WINDOW_RADIUS: usize = WINDOW_LENGTH / 2;

/// How much more the local window error counts than the block error
/// from motion search when the two are blended.
pub const WINDOW_BLOCK_BALANCE_WEIGHT: f64 = 5.0;
pub const SEARCH_ERROR_NORM_WEIGHT: f64 = 20.0;
/// Fraction of the smaller frame dimension a motion vector may span before
/// it starts to amplify the error.
pub const SEARCH_DISTANCE_THRESHOLD: f64 = 0.1;
pub const Q_DECAY_THRESHOLD: f64 = 20.0;
pub const STRENGTH_THRESHOLD: f64 = 4.0;
/// Weight given to a perfectly trusted sample.
pub const WEIGHT_SCALE: u16 = 1000;
pub const MAX_SCALED_ERROR: f64 = 7.0;

pub const MAX_BLOCK_WIDTH: usize = 32;
pub const MAX_BLOCK_HEIGHT: usize = 32;
pub const MAX_BLOCK_PELS: usize = MAX_BLOCK_WIDTH * MAX_BLOCK_HEIGHT;

/// Columns reserved on the left of each squared error row for the box filter.
pub const SSE_PAD: usize = WINDOW_RADIUS;
/// Row pitch of a squared error buffer: the widest block plus padding
/// columns on either side.
pub const SSE_STRIDE: usize = MAX_BLOCK_WIDTH + 2 * SSE_PAD;
pub const SSE_LEN: usize = SSE_STRIDE * MAX_BLOCK_HEIGHT;

/// Block sizes the temporal filter operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockSize {
    Block16x16,
    Block32x32,
}

impl BlockSize {
    #[must_use]
    pub const fn width(self) -> NonZeroUsize {
        match self {
            // SAFETY: non-zero constant
            Self::Block16x16 => unsafe { NonZeroUsize::new_unchecked(16) },
            // SAFETY: non-zero constant
            Self::Block32x32 => unsafe { NonZeroUsize::new_unchecked(32) },
        }
    }

    #[must_use]
    pub const fn height(self) -> NonZeroUsize {
        self.width()
    }

    /// Samples per plane at full (luma) resolution.
    #[must_use]
    pub const fn pels(self) -> usize {
        self.width().get() * self.height().get()
    }
}

impl TryFrom<(usize, usize)> for BlockSize {
    type Error = anyhow::Error;

    fn try_from((width, height): (usize, usize)) -> Result<Self> {
        Ok(match (width, height) {
            (16, 16) => Self::Block16x16,
            (32, 32) => Self::Block32x32,
            _ => bail!("Invalid block size {width}x{height}, must be 16x16 or 32x32."),
        })
    }
}

impl TryFrom<i64> for BlockSize {
    type Error = anyhow::Error;

    fn try_from(val: i64) -> Result<Self> {
        Ok(match val {
            16 => Self::Block16x16,
            32 => Self::Block32x32,
            _ => bail!("Invalid value for 'blksize', must be 16 or 32, got {val}."),
        })
    }
}

/// A motion vector as produced by motion search, in motion vector units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MotionVector {
    pub row: i16,
    pub col: i16,
}

impl MotionVector {
    pub const ZERO: Self = Self { row: 0, col: 0 };

    #[must_use]
    pub const fn new(row: i16, col: i16) -> Self {
        Self { row, col }
    }

    /// Euclidean length of the vector.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        f64::from(self.row).hypot(f64::from(self.col))
    }
}

/// Motion search results for the four quadrants of a block.
///
/// Quadrants are ordered top-left, top-right, bottom-left, bottom-right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubblockStats {
    pub mvs: [MotionVector; 4],
    pub mses: [u32; 4],
}

impl SubblockStats {
    #[must_use]
    pub const fn new(mvs: [MotionVector; 4], mses: [u32; 4]) -> Self {
        Self { mvs, mses }
    }

    /// Index of the quadrant containing `(row, col)` in a `width`x`height` block.
    #[must_use]
    pub fn quadrant(row: usize, col: usize, width: NonZeroUsize, height: NonZeroUsize) -> usize {
        usize::from(row >= height.get() / 2) * 2 + usize::from(col >= width.get() / 2)
    }
}

/// Rate-control and noise inputs that shape the weighting curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayParams {
    pub noise_levels: [f64; MAX_PLANES],
    pub q_factor: i32,
    pub filter_strength: i32,
}

impl DecayParams {
    pub fn new(noise_levels: [f64; MAX_PLANES], q_factor: i32, filter_strength: i32) -> Result<Self> {
        for (plane, &sigma) in noise_levels.iter().enumerate() {
            if !sigma.is_finite() || sigma < 0.0 {
                bail!("Invalid noise level {sigma} for plane {plane}, must be finite and non-negative.");
            }
        }

        Ok(Self {
            noise_levels,
            q_factor,
            filter_strength,
        })
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FrameFlags: u32 {
        const HIGH_BITDEPTH = 0x00000008;
    }
}

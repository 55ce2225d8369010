
use std::num::{NonZeroU8, NonZeroUsize};

use anyhow::{Result, bail};
use smallvec::SmallVec;

use crate::{
    params::{FrameFlags, MAX_PLANES},
    util::Pixel,
};

/// Subsampling shifts of one plane relative to full resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Subsampling {
    pub x: u8,
    pub y: u8,
}

impl Subsampling {
    pub const NONE: Self = Self { x: 0, y: 0 };
    pub const YUV420: Self = Self { x: 1, y: 1 };
    pub const YUV422: Self = Self { x: 1, y: 0 };
}

/// Read-only view of the frame being filtered.
///
/// Luma uses its own stride; both chroma planes share the chroma stride and
/// subsampling. The crop size is the visible luma size of the frame.
#[derive(Debug, Clone)]
pub struct FrameBuffer<'a, T: Pixel> {
    planes: SmallVec<[&'a [T]; MAX_PLANES]>,
    luma_stride: NonZeroUsize,
    chroma_stride: NonZeroUsize,
    crop_width: NonZeroUsize,
    crop_height: NonZeroUsize,
    chroma_subsampling: Subsampling,
    bit_depth: NonZeroU8,
}

impl<'a, T: Pixel> FrameBuffer<'a, T> {
    pub fn new(
        planes: &[&'a [T]],
        luma_stride: NonZeroUsize,
        chroma_stride: NonZeroUsize,
        crop_width: NonZeroUsize,
        crop_height: NonZeroUsize,
        chroma_subsampling: Subsampling,
        bit_depth: NonZeroU8,
        flags: FrameFlags,
    ) -> Result<Self> {
        if planes.is_empty() || planes.len() > MAX_PLANES {
            bail!(
                "Frame must have between 1 and {MAX_PLANES} planes, got {}.",
                planes.len()
            );
        }
        if bit_depth.get() < 8 || bit_depth.get() > T::MAX_BIT_DEPTH {
            bail!(
                "Bit depth {} is not representable in {}-bit samples.",
                bit_depth,
                T::MAX_BIT_DEPTH
            );
        }
        if flags.contains(FrameFlags::HIGH_BITDEPTH) != T::is_high_bitdepth() {
            bail!("High bit depth flag does not match the sample type of the frame.");
        }
        if chroma_subsampling.x > 1 || chroma_subsampling.y > 1 {
            bail!(
                "Unsupported chroma subsampling {}x{}.",
                chroma_subsampling.x,
                chroma_subsampling.y
            );
        }

        let luma_rows = crop_height.get();
        if planes[0].len() < luma_stride.get() * (luma_rows - 1) + crop_width.get() {
            bail!("Luma plane is smaller than its stride and crop size.");
        }

        Ok(Self {
            planes: planes.iter().copied().collect(),
            luma_stride,
            chroma_stride,
            crop_width,
            crop_height,
            chroma_subsampling,
            bit_depth,
        })
    }

    #[must_use]
    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    #[must_use]
    pub fn plane(&self, plane: usize) -> &'a [T] {
        self.planes[plane]
    }

    #[must_use]
    pub fn stride(&self, plane: usize) -> NonZeroUsize {
        if plane == 0 {
            self.luma_stride
        } else {
            self.chroma_stride
        }
    }

    #[must_use]
    pub fn subsampling(&self, plane: usize) -> Subsampling {
        if plane == 0 {
            Subsampling::NONE
        } else {
            self.chroma_subsampling
        }
    }

    /// The smaller of the two luma crop dimensions.
    #[must_use]
    pub fn min_dimension(&self) -> NonZeroUsize {
        self.crop_width.min(self.crop_height)
    }

    #[must_use]
    pub fn bit_depth(&self) -> NonZeroU8 {
        self.bit_depth
    }
}

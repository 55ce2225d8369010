
use std::fmt::Debug;

#[cfg(target_arch = "x86_64")]
cpufeatures::new!(cpuid_sse2, "sse2");

#[cfg(target_arch = "x86_64")]
pub use cpuid_sse2::get as has_sse2;

/// A single sample of a plane.
///
/// 8-bit frames store samples as `u8`, high bit depth frames (9 to 16 bits)
/// store them as `u16`. The kernels only ever widen samples, so the trait is
/// limited to lossless conversions into the integer types they compute in.
pub trait Pixel:
    Clone
    + Copy
    + Debug
    + Default
    + Send
    + Sync
    + Into<u16>
    + Into<i32>
    + Into<u32>
    + Into<u64>
    + From<u8>
    + PartialOrd
    + Ord
    + PartialEq
    + Eq
    + 'static
{
    /// The highest bit depth this storage type can carry.
    const MAX_BIT_DEPTH: u8;

    /// Whether frames of this sample type carry the high bit depth flag.
    #[must_use]
    fn is_high_bitdepth() -> bool {
        Self::MAX_BIT_DEPTH > 8
    }
}

impl Pixel for u8 {
    const MAX_BIT_DEPTH: u8 = 8;
}

impl Pixel for u16 {
    const MAX_BIT_DEPTH: u8 = 16;
}

/// The kernel variant that the runtime dispatch will pick on this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimdLevel {
    Scalar,
    Sse2,
}

#[must_use]
pub fn simd_level() -> SimdLevel {
    cfg_if::cfg_if! {
        if #[cfg(all(target_arch = "x86_64", not(feature = "no_simd")))] {
            if has_sse2() {
                return SimdLevel::Sse2;
            }
        }
    }

    SimdLevel::Scalar
}

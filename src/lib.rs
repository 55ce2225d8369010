// Performance
#![warn(clippy::imprecise_flops)]
#![warn(clippy::inline_always)]
#![warn(clippy::large_types_passed_by_value)]
#![allow(clippy::manual_div_ceil)]
#![warn(clippy::needless_collect)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::non_zero_suggestions)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::redundant_clone)]
#![warn(clippy::suboptimal_flops)]
#![warn(clippy::trivially_copy_pass_by_ref)]
// Readability/Code Intention
#![warn(clippy::checked_conversions)]
#![warn(clippy::cloned_instead_of_copied)]
#![warn(clippy::enum_glob_use)]
#![warn(clippy::if_then_some_else_none)]
#![warn(clippy::inconsistent_struct_constructor)]
#![warn(clippy::invalid_upcast_comparisons)]
#![warn(clippy::manual_assert)]
#![warn(clippy::manual_let_else)]
#![warn(clippy::map_unwrap_or)]
#![warn(clippy::match_bool)]
#![warn(clippy::mod_module_files)]
#![warn(clippy::needless_continue)]
#![warn(clippy::needless_pass_by_ref_mut)]
#![warn(clippy::range_minus_one)]
#![warn(clippy::range_plus_one)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::tests_outside_test_module)]
#![warn(clippy::unused_rounding)]
#![warn(clippy::verbose_bit_mask)]
// Correctness/Safety
#![deny(clippy::cfg_not_test)]
#![warn(clippy::dbg_macro)]
#![deny(clippy::debug_assert_with_mut_call)]
#![warn(clippy::large_stack_arrays)]
#![warn(clippy::large_stack_frames)]
#![warn(clippy::mixed_read_write_in_expression)]
#![warn(clippy::suspicious_operation_groupings)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::unwrap_used)]
// Annoyances
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::uninlined_format_args)]
#![allow(unsafe_op_in_unsafe_fn)]

//! Motion compensated temporal filtering of a single block.
//!
//! [`apply_temporal_filter`] weighs a motion compensated prediction against
//! the frame being filtered and adds it into per-pixel accumulators. Run it
//! once per reference frame of a temporal window, then divide the
//! accumulated samples by the accumulated weights.

pub mod error;
pub mod filter;
pub mod frame;
pub mod params;

#[cfg(feature = "bench")]
pub mod squared_error;
#[cfg(feature = "bench")]
pub mod util;
#[cfg(feature = "bench")]
pub mod weight;
#[cfg(feature = "bench")]
pub mod window;

#[cfg(not(feature = "bench"))]
mod squared_error;
#[cfg(not(feature = "bench"))]
mod util;
#[cfg(not(feature = "bench"))]
mod weight;
#[cfg(not(feature = "bench"))]
mod window;

pub use error::TemporalFilterError;
pub use filter::apply_temporal_filter;
pub use frame::{FrameBuffer, Subsampling};
pub use params::{BlockSize, DecayParams, FrameFlags, MotionVector, SubblockStats};
pub use util::{Pixel, SimdLevel, simd_level};

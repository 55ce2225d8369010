#![allow(clippy::unwrap_used, reason = "allow in test files")]

use std::num::{NonZeroU8, NonZeroUsize};

use quickcheck::TestResult;
use quickcheck_macros::quickcheck;

use super::*;
use crate::params::{SSE_LEN, SSE_STRIDE};

fn nz(v: usize) -> NonZeroUsize {
    NonZeroUsize::new(v).unwrap()
}

fn bd(v: u8) -> NonZeroU8 {
    NonZeroU8::new(v).unwrap()
}

fn still_stats() -> SubblockStats {
    SubblockStats::new([MotionVector::ZERO; 4], [0; 4])
}

#[test]
fn test_decay_terms() {
    let decay = Decay::new(1.0, 60, 5);
    assert!((decay.noise - (0.5 + 7f64.ln())).abs() < 1e-12);
    // Both ratios exceed 1 and clamp down.
    assert_eq!(decay.quality, 1.0);
    assert_eq!(decay.strength, 1.0);

    let decay = Decay::new(0.0, 10, 2);
    assert!((decay.noise - (0.5 + 5f64.ln())).abs() < 1e-12);
    assert!((decay.quality - 0.25).abs() < 1e-12);
    assert!((decay.strength - 0.25).abs() < 1e-12);

    let decay = Decay::new(0.0, 0, 0);
    assert_eq!(decay.quality, 1e-5);
    assert_eq!(decay.strength, 1e-5);
}

#[test]
fn test_distance_factor() {
    let min_size = nz(1080);
    // Threshold is 108 units.
    assert_eq!(distance_factor(MotionVector::ZERO, min_size), 1.0);
    assert_eq!(distance_factor(MotionVector::new(60, 80), min_size), 1.0);
    assert!((distance_factor(MotionVector::new(0, 216), min_size) - 2.0).abs() < 1e-12);

    // Tiny frames never divide by less than one.
    assert_eq!(distance_factor(MotionVector::new(3, 4), nz(4)), 5.0);
}

#[test]
fn test_combined_error() {
    assert_eq!(combined_error(0.0, 0.0), 0.0);
    assert!((combined_error(12.0, 0.0) - 0.5).abs() < 1e-12);
    assert!((combined_error(0.0, 120.0) - 1.0).abs() < 1e-12);
}

#[test]
fn test_window_error_bit_depth_shift() {
    assert_eq!(window_error(250, 25, bd(8)), 10.0);
    // Each extra bit quadruples the squared error.
    assert_eq!(window_error(250 * 16, 25, bd(10)), 10.0);
    assert_eq!(window_error(250 * 256, 25, bd(12)), 10.0);
    // The shift truncates like an integer shift.
    assert_eq!(window_error(15, 1, bd(9)), 3.0);
}

#[quickcheck]
fn test_window_error_8bit_is_unshifted(sum: u32, num_ref_pixels: u32) -> TestResult {
    if num_ref_pixels == 0 {
        return TestResult::discard();
    }
    TestResult::from_bool(
        window_error(sum, num_ref_pixels, bd(8)) == f64::from(sum) / f64::from(num_ref_pixels),
    )
}

#[test]
fn test_maximum_trust() {
    let decay = Decay::new(1.0, 60, 5);
    assert_eq!(error_to_weight(0.0, 1.0, &decay), WEIGHT_SCALE);
}

#[test]
fn test_saturated_error() {
    let decay = Decay::new(1.0, 60, 5);
    let floor = ((-MAX_SCALED_ERROR).exp() * f64::from(WEIGHT_SCALE)).round() as u16;
    assert_eq!(floor, 1);
    assert_eq!(error_to_weight(1e9, 1.0, &decay), floor);
    assert_eq!(error_to_weight(f64::MAX, 1e9, &decay), floor);
}

#[quickcheck]
fn test_weight_bounds(error: f64, d: f64, sigma: f64, q: i32, s: i32) -> TestResult {
    if !error.is_finite() || !d.is_finite() || !sigma.is_finite() {
        return TestResult::discard();
    }
    let decay = Decay::new(sigma.abs(), q, s);
    let weight = error_to_weight(error.abs(), d.abs().max(1.0), &decay);
    TestResult::from_bool(weight <= WEIGHT_SCALE)
}

#[quickcheck]
fn test_weight_monotonic_in_distance(error: u16, a: (i16, i16), b: (i16, i16)) -> bool {
    let decay = Decay::new(1.0, 30, 3);
    let min_size = nz(240);
    let near = MotionVector::new(a.0, a.1);
    let far = MotionVector::new(b.0, b.1);
    let (near, far) = if near.magnitude() <= far.magnitude() {
        (near, far)
    } else {
        (far, near)
    };
    let error = f64::from(error) / 100.0;

    error_to_weight(error, distance_factor(near, min_size), &decay)
        >= error_to_weight(error, distance_factor(far, min_size), &decay)
}

#[quickcheck]
fn test_weight_monotonic_in_error(a: u32, b: u32) -> bool {
    let decay = Decay::new(2.5, 40, 4);
    let (low, high) = (a.min(b), a.max(b));
    error_to_weight(f64::from(low) / 1000.0, 1.0, &decay)
        >= error_to_weight(f64::from(high) / 1000.0, 1.0, &decay)
}

#[test]
fn test_luma_borrow_counts() {
    let sse = vec![1u32; SSE_LEN];
    for (ss_x, ss_y) in [(0u8, 0u8), (1, 0), (0, 1), (1, 1)] {
        let borrow = LumaBorrow {
            sse: &sse,
            pitch: nz(SSE_STRIDE),
            ss_x,
            ss_y,
        };
        let expected = (1u32 << ss_x) * (1u32 << ss_y);
        assert_eq!(borrow.gather(3, 5), (expected, expected));
    }
}

#[test]
fn test_luma_borrow_reads_covering_samples() {
    let mut sse = vec![0u32; SSE_LEN];
    // Chroma pixel (1, 2) in 4:2:0 covers luma rows 2..4 and columns 4..6.
    for (row, col, v) in [(2, 4, 1), (2, 5, 10), (3, 4, 100), (3, 5, 1000)] {
        sse[row * SSE_STRIDE + SSE_PAD + col] = v;
    }
    // Neighbors that must not be read.
    sse[2 * SSE_STRIDE + SSE_PAD + 6] = 5000;
    sse[4 * SSE_STRIDE + SSE_PAD + 4] = 5000;

    let borrow = LumaBorrow {
        sse: &sse,
        pitch: nz(SSE_STRIDE),
        ss_x: 1,
        ss_y: 1,
    };
    assert_eq!(borrow.gather(1, 2), (1111, 4));
}

#[test]
fn test_chroma_num_ref_pixels() {
    let sse = vec![0u32; SSE_LEN];
    let stats = still_stats();
    for (ss_x, ss_y) in [(0u8, 0u8), (1, 0), (1, 1)] {
        let weighting = PlaneWeighting::new(
            nz(16 >> ss_x),
            nz(16 >> ss_y),
            bd(8),
            nz(480),
            &stats,
            Decay::new(1.0, 60, 5),
            Some(LumaBorrow {
                sse: &sse,
                pitch: nz(SSE_STRIDE),
                ss_x,
                ss_y,
            }),
        );
        let (_, num_ref_pixels) = weighting.reference_error(0, 0, 0);
        assert_eq!(num_ref_pixels, 25 + (1 << ss_x) * (1 << ss_y));
    }

    let luma = PlaneWeighting::new(
        nz(16),
        nz(16),
        bd(8),
        nz(480),
        &stats,
        Decay::new(1.0, 60, 5),
        None,
    );
    assert_eq!(luma.reference_error(4, 4, 77), (77, 25));
}

#[test]
fn test_plane_weighting_uses_quadrant_stats() {
    let stats = SubblockStats::new(
        [
            MotionVector::ZERO,
            MotionVector::ZERO,
            MotionVector::ZERO,
            MotionVector::new(400, 300),
        ],
        [0, 120, 0, 0],
    );
    let weighting = PlaneWeighting::new(
        nz(16),
        nz(16),
        bd(8),
        nz(100),
        &stats,
        Decay::new(1.0, 60, 5),
        None,
    );

    // Top-left: no error, no motion.
    assert_eq!(weighting.weight(0, 0, 0), WEIGHT_SCALE);
    // Top-right: block error of 120 gives a combined error of 1.
    let decay = Decay::new(1.0, 60, 5);
    assert_eq!(weighting.weight(0, 15, 0), error_to_weight(1.0, 1.0, &decay));
    assert!(weighting.weight(0, 15, 0) < WEIGHT_SCALE);
    // Bottom-right: motion alone cannot lower the weight without error.
    assert_eq!(weighting.weight(15, 15, 0), WEIGHT_SCALE);
    // With some error, the long vector lowers the weight.
    assert!(weighting.weight(15, 15, 2500) < weighting.weight(15, 0, 2500));
}

#[test]
fn test_plane_weighting_bit_depth_identity() {
    let stats = still_stats();
    let decay = Decay::new(1.0, 20, 4);
    let low = PlaneWeighting::new(nz(16), nz(16), bd(8), nz(480), &stats, decay, None);
    let high = PlaneWeighting::new(nz(16), nz(16), bd(10), nz(480), &stats, decay, None);

    for sum in [0u32, 25, 250, 2500, 25_000] {
        assert_eq!(low.weight(3, 3, sum), high.weight(3, 3, sum * 16));
    }
}

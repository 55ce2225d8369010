use std::{
    hint::black_box,
    num::{NonZeroU8, NonZeroUsize},
};

use criterion::{Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro128StarStar;
use zoomtf::{
    BlockSize,
    DecayParams,
    FrameBuffer,
    FrameFlags,
    MotionVector,
    Subsampling,
    SubblockStats,
    apply_temporal_filter,
};

const WIDTH: usize = 256;
const HEIGHT: usize = 128;

fn stats() -> SubblockStats {
    SubblockStats::new(
        [
            MotionVector::new(1, -2),
            MotionVector::new(4, 0),
            MotionVector::new(-3, 3),
            MotionVector::new(0, 9),
        ],
        [12, 40, 3, 77],
    )
}

pub fn bench_apply_temporal_filter_8bit_420(c: &mut Criterion) {
    c.bench_function("apply_temporal_filter 8-bit 4:2:0 32x32", |b| {
        let mut rng = Xoshiro128StarStar::from_seed(*b"deadbeeflolcakes");
        let mut luma = vec![0u8; WIDTH * HEIGHT];
        let mut chroma = vec![0u8; WIDTH * HEIGHT / 4];
        let mut pred = vec![0u8; 32 * 32 * 3];
        for p in luma.iter_mut().chain(chroma.iter_mut()).chain(pred.iter_mut()) {
            *p = rng.random();
        }

        let frame = FrameBuffer::new(
            &[&luma, &chroma, &chroma],
            NonZeroUsize::new(WIDTH).unwrap(),
            NonZeroUsize::new(WIDTH / 2).unwrap(),
            NonZeroUsize::new(WIDTH).unwrap(),
            NonZeroUsize::new(HEIGHT).unwrap(),
            Subsampling::YUV420,
            NonZeroU8::new(8).unwrap(),
            FrameFlags::empty(),
        )
        .unwrap();
        let stats = stats();
        let params = DecayParams::new([1.0, 1.0, 1.0], 40, 4).unwrap();
        let mut accum = vec![0u32; 32 * 32 * 3];
        let mut count = vec![0u16; 32 * 32 * 3];

        b.iter(|| {
            accum.fill(0);
            count.fill(0);
            apply_temporal_filter(
                black_box(&frame),
                black_box(BlockSize::Block32x32),
                black_box(1),
                black_box(2),
                black_box(3),
                black_box(&pred),
                black_box(&stats),
                black_box(&params),
                black_box(&mut accum),
                black_box(&mut count),
            )
            .unwrap()
        })
    });
}

pub fn bench_apply_temporal_filter_10bit_444(c: &mut Criterion) {
    c.bench_function("apply_temporal_filter 10-bit 4:4:4 16x16", |b| {
        let mut rng = Xoshiro128StarStar::from_seed(*b"deadbeeflolcakes");
        let mut planes = vec![vec![0u16; WIDTH * HEIGHT]; 3];
        let mut pred = vec![0u16; 16 * 16 * 3];
        for p in planes.iter_mut().flatten().chain(pred.iter_mut()) {
            *p = rng.random_range(0..1024);
        }

        let frame = FrameBuffer::new(
            &[&planes[0], &planes[1], &planes[2]],
            NonZeroUsize::new(WIDTH).unwrap(),
            NonZeroUsize::new(WIDTH).unwrap(),
            NonZeroUsize::new(WIDTH).unwrap(),
            NonZeroUsize::new(HEIGHT).unwrap(),
            Subsampling::NONE,
            NonZeroU8::new(10).unwrap(),
            FrameFlags::HIGH_BITDEPTH,
        )
        .unwrap();
        let stats = stats();
        let params = DecayParams::new([1.5, 1.0, 1.0], 40, 4).unwrap();
        let mut accum = vec![0u32; 16 * 16 * 3];
        let mut count = vec![0u16; 16 * 16 * 3];

        b.iter(|| {
            accum.fill(0);
            count.fill(0);
            apply_temporal_filter(
                black_box(&frame),
                black_box(BlockSize::Block16x16),
                black_box(3),
                black_box(5),
                black_box(3),
                black_box(&pred),
                black_box(&stats),
                black_box(&params),
                black_box(&mut accum),
                black_box(&mut count),
            )
            .unwrap()
        })
    });
}

criterion_group!(
    bench_apply_temporal_filter,
    bench_apply_temporal_filter_8bit_420,
    bench_apply_temporal_filter_10bit_444
);
criterion_main!(bench_apply_temporal_filter);

extern crate num;
extern crate parbrot;
extern crate rand;

use num::Complex;
use parbrot::dispatch::{fill_parallel, ranges};
use parbrot::{
    render, ComplexPlane, IntegralPlane, Mandelbrot, Mode, ParallelRenderer, Partition,
    PlaneMapper, SequentialRenderer,
};
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};

fn demo_plane() -> ComplexPlane {
    ComplexPlane(Complex::new(-2.1, -1.2), Complex::new(0.6, 1.2))
}

fn parallel(threads: usize, partition: Partition) -> Mode {
    Mode::Parallel(ParallelRenderer::new(threads, partition).unwrap())
}

#[test]
fn parallel_and_sequential_agree_on_the_demo_window() {
    let size = IntegralPlane(270, 240);
    let expected = render(size, demo_plane(), 500, Mode::Sequential).unwrap();
    let actual = render(size, demo_plane(), 500, Mode::Parallel(ParallelRenderer::default())).unwrap();
    assert_eq!(actual, expected);
}

#[test]
fn parallel_and_sequential_agree_on_random_windows() {
    let mut rng = rand::thread_rng();
    let partitions = [
        Partition::Static,
        Partition::Rows(1),
        Partition::Rows(5),
        Partition::Pixels(1),
        Partition::Pixels(97),
    ];
    for _ in 0..12 {
        let width = rng.gen_range(1, 90);
        let height = rng.gen_range(1, 70);
        let re = rng.gen_range(-2.5f32, 0.5f32);
        let im = rng.gen_range(-1.5f32, 1.0f32);
        let span = rng.gen_range(0.001f32, 2.0f32);
        let plane = ComplexPlane(Complex::new(re, im), Complex::new(re + span, im + span));
        let iterations = rng.gen_range(0, 300);
        let threads = rng.gen_range(1, 9);
        let partition = partitions[rng.gen_range(0, partitions.len())];

        let size = IntegralPlane(width, height);
        let expected = render(size, plane, iterations, Mode::Sequential).unwrap();
        let actual = render(size, plane, iterations, parallel(threads, partition)).unwrap();
        assert_eq!(
            actual, expected,
            "{}x{} {:?} {} iterations on {} threads, {}",
            width, height, plane, iterations, threads, partition
        );
    }
}

#[test]
fn rendering_is_idempotent() {
    let size = IntegralPlane(64, 48);
    let mode = parallel(4, Partition::Rows(3));
    let first = render(size, demo_plane(), 200, mode).unwrap();
    let second = render(size, demo_plane(), 200, mode).unwrap();
    assert_eq!(first, second);
}

#[test]
fn every_pixel_is_shaded_exactly_once() {
    let plane = PlaneMapper::from_planes(IntegralPlane(37, 23), demo_plane()).unwrap();
    let job = Mandelbrot::new(plane, 100).unwrap();
    let mut expected = job.raster().unwrap();
    SequentialRenderer.render(&job, &mut expected).unwrap();

    for &partition in &[Partition::Static, Partition::Rows(2), Partition::Pixels(10)] {
        let counts: Vec<AtomicUsize> = (0..plane.len()).map(|_| AtomicUsize::new(0)).collect();
        let mut raster = job.raster().unwrap();
        fill_parallel(raster.as_raw_mut(), plane.cols(), 6, partition, |offset| {
            counts[offset].fetch_add(1, Ordering::SeqCst);
            job.offset(offset)
        })
        .unwrap();
        assert!(counts.iter().all(|c| c.load(Ordering::SeqCst) == 1));
        assert_eq!(raster, expected);
    }
}

#[test]
fn row_partitions_split_on_row_boundaries() {
    let cols = 37;
    for range in ranges(37 * 23, cols, 4, Partition::Rows(3)).unwrap() {
        assert_eq!(range.start % cols, 0);
    }
}

#[test]
fn bad_inputs_fail_before_rendering() {
    assert!(render(IntegralPlane(0, 10), demo_plane(), 10, Mode::Sequential).is_err());
    assert!(render(IntegralPlane(10, 0), demo_plane(), 10, Mode::Sequential).is_err());
    assert!(render(IntegralPlane(10, 10), demo_plane(), -1, Mode::Sequential).is_err());
    let flipped = ComplexPlane(demo_plane().1, demo_plane().0);
    assert!(render(IntegralPlane(10, 10), flipped, 10, Mode::Sequential).is_err());
    assert!(ParallelRenderer::new(0, Partition::Static).is_err());
    assert!(render(IntegralPlane(10, 10), demo_plane(), 10, parallel(2, Partition::Pixels(0))).is_err());
}

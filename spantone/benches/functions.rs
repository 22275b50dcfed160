use criterion::{
	black_box, criterion_group, criterion_main, measurement::WallTime, BatchSize, BenchmarkGroup, BenchmarkId,
	Criterion, SamplingMode,
};
use palette::Srgb;
use spantone::PixelGrid;
use std::time::Duration;

/// Levels per channel for the color lattices under test,
/// giving 216, 1000, and 4096 distinct colors
const LATTICE_LEVELS: [u32; 3] = [6, 10, 16];

/// A grid tiled with an evenly spaced lattice of `levels^3` distinct colors
fn lattice_grid(width: u32, height: u32, levels: u32) -> PixelGrid {
	let step = 255 / (levels - 1).max(1);
	let colors = (0..levels.pow(3))
		.map(|index| {
			let r = (index % levels) * step;
			let g = (index / levels % levels) * step;
			let b = (index / levels / levels % levels) * step;
			Srgb::new(r as u8, g as u8, b as u8)
		})
		.collect::<Vec<_>>();

	let pixels = (0..(width as usize) * (height as usize))
		.map(|offset| colors[offset % colors.len()])
		.collect();

	PixelGrid::from_pixels(width, height, pixels).expect("valid bench grid")
}

fn create_group<'a>(c: &'a mut Criterion, name: &'a str) -> BenchmarkGroup<'a, WallTime> {
	let mut group = c.benchmark_group(name);
	group
		.sample_size(30)
		.noise_threshold(0.05)
		.sampling_mode(SamplingMode::Flat)
		.warm_up_time(Duration::from_millis(500));
	group
}

fn distinct_colors(c: &mut Criterion) {
	let mut group = create_group(c, "distinct_colors");

	for levels in LATTICE_LEVELS {
		let grid = lattice_grid(1920, 1080, levels);
		group.bench_with_input(BenchmarkId::from_parameter(levels.pow(3)), &grid, |b, grid| {
			b.iter(|| spantone::count_distinct_colors(black_box(grid)));
		});
	}
}

fn build_mst(c: &mut Criterion) {
	let mut group = create_group(c, "build_mst");

	for levels in LATTICE_LEVELS {
		let grid = lattice_grid(480, 270, levels);
		group.bench_with_input(BenchmarkId::from_parameter(levels.pow(3)), &grid, |b, grid| {
			b.iter(|| spantone::build_mst(black_box(grid)).expect("spanned colors"));
		});
	}
}

fn extract_palette(c: &mut Criterion) {
	let mut group = create_group(c, "extract_palette");

	let grid = lattice_grid(480, 270, 16);
	let mst = spantone::build_mst(&grid).expect("spanned colors");

	for k in [4, 16, 64, 256] {
		group.bench_with_input(BenchmarkId::from_parameter(k), &mst, |b, mst| {
			b.iter(|| spantone::extract_palette(black_box(mst), black_box(k)).expect("k is in range"));
		});
	}
}

fn reduce(c: &mut Criterion) {
	let mut group = create_group(c, "reduce");

	for levels in LATTICE_LEVELS {
		let grid = lattice_grid(480, 270, levels);
		group.bench_with_input(BenchmarkId::from_parameter(levels.pow(3)), &grid, |b, grid| {
			b.iter_batched_ref(
				|| grid.clone(),
				|grid| spantone::reduce(grid, black_box(8)).expect("k is in range"),
				BatchSize::SmallInput,
			);
		});
	}
}

criterion_group!(benches, distinct_colors, build_mst, extract_palette, reduce);
criterion_main!(benches);

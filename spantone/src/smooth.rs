//! Separable Gaussian smoothing over a pixel grid

use crate::grid::PixelGrid;
use crate::remap::round_to_srgb;
use palette::Srgb;

/// Blur the grid with a separable 1-D Gaussian kernel
///
/// Smoothing before quantization merges speckle colors into their
/// surroundings, which can shrink the distinct-color count considerably.
/// `filter_size` taps are centered on each pixel (an even size is widened by
/// one) and taps falling outside the grid are skipped. Both passes run in
/// floating point; channels are rounded back to 8 bits once at the end,
/// halves away from zero.
#[must_use]
pub fn gaussian_smooth(grid: &PixelGrid, filter_size: usize, sigma: f64) -> PixelGrid {
	let kernel = gaussian_kernel(filter_size, sigma);

	let plane: Vec<Srgb<f64>> = grid
		.pixels()
		.iter()
		.map(|&pixel| Srgb::new(f64::from(pixel.red), f64::from(pixel.green), f64::from(pixel.blue)))
		.collect();

	let vertical = smooth_axis(grid.width(), grid.height(), &plane, &kernel, Axis::Vertical);
	let horizontal = smooth_axis(grid.width(), grid.height(), &vertical, &kernel, Axis::Horizontal);

	let pixels = horizontal.into_iter().map(round_to_srgb).collect();
	PixelGrid::from_pixels(grid.width(), grid.height(), pixels)
		.unwrap_or_else(|_| unreachable!("smoothing preserves the grid dimensions"))
}

/// The direction a smoothing pass slides its kernel along
#[derive(Clone, Copy)]
enum Axis {
	/// Taps sample the rows above and below each pixel
	Vertical,
	/// Taps sample the columns beside each pixel
	Horizontal,
}

/// The normalized 1-D Gaussian kernel with `filter_size` taps
///
/// An even `filter_size` is widened by one so the kernel stays centered.
// Kernel sizes are tiny, so the tap index casts are exact
#[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
fn gaussian_kernel(filter_size: usize, sigma: f64) -> Vec<f64> {
	let size = if filter_size % 2 == 0 { filter_size + 1 } else { filter_size };
	let half = (size / 2) as i64;

	let mut kernel = Vec::with_capacity(size);
	let mut sum = 0.0;
	for tap in -half..=half {
		let offset = tap as f64;
		let weight = (-(offset * offset) / (2.0 * sigma * sigma)).exp();
		sum += weight;
		kernel.push(weight);
	}

	for weight in &mut kernel {
		*weight /= sum;
	}

	kernel
}

/// One convolution pass along a single axis of a row-major plane
// Kernel sizes are tiny and in-bounds sample coordinates fit in usize
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn smooth_axis(width: u32, height: u32, plane: &[Srgb<f64>], kernel: &[f64], axis: Axis) -> Vec<Srgb<f64>> {
	let half = (kernel.len() / 2) as i64;
	let width = i64::from(width);
	let height = i64::from(height);

	let mut smoothed = Vec::with_capacity(plane.len());
	for y in 0..height {
		for x in 0..width {
			let (mut red, mut green, mut blue) = (0.0f64, 0.0, 0.0);

			for (tap, &weight) in kernel.iter().enumerate() {
				let offset = tap as i64 - half;
				let (sx, sy) = match axis {
					Axis::Vertical => (x, y + offset),
					Axis::Horizontal => (x + offset, y),
				};

				if sx < 0 || sx >= width || sy < 0 || sy >= height {
					continue;
				}

				let sample = plane[(sy * width + sx) as usize];
				red += weight * sample.red;
				green += weight * sample.green;
				blue += weight * sample.blue;
			}

			smoothed.push(Srgb::new(red, green, blue));
		}
	}

	smoothed
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	fn uniform_grid(width: u32, height: u32, color: Srgb<u8>) -> PixelGrid {
		let pixels = vec![color; (width * height) as usize];
		PixelGrid::from_pixels(width, height, pixels).expect("valid grid")
	}

	#[test]
	fn kernels_are_normalized_and_odd_sized() {
		for (requested, expected) in [(1, 1), (3, 3), (4, 5), (9, 9)] {
			let kernel = gaussian_kernel(requested, 1.5);
			assert_eq!(kernel.len(), expected);

			let sum: f64 = kernel.iter().sum();
			assert_relative_eq!(sum, 1.0, max_relative = 1e-12);

			// Symmetric around the center tap
			for (&near, &far) in kernel.iter().zip(kernel.iter().rev()) {
				assert_relative_eq!(near, far, max_relative = 1e-12);
			}
		}
	}

	#[test]
	fn single_tap_kernel_is_the_identity() {
		let pixels = (0..12u8).map(|value| Srgb::new(value, 2 * value, 255 - value)).collect();
		let grid = PixelGrid::from_pixels(4, 3, pixels).expect("valid grid");

		assert_eq!(gaussian_smooth(&grid, 1, 2.0), grid);
	}

	#[test]
	fn uniform_interior_is_unchanged() {
		let grid = uniform_grid(9, 9, Srgb::new(120, 64, 200));
		let smoothed = gaussian_smooth(&grid, 3, 1.0);

		for y in 1..8 {
			for x in 1..8 {
				assert_eq!(smoothed.get(x, y), Srgb::new(120, 64, 200));
			}
		}
	}

	#[test]
	fn border_taps_outside_the_grid_are_skipped() {
		// Corner pixels lose kernel mass to out-of-bounds taps and darken
		let grid = uniform_grid(9, 9, Srgb::new(200, 200, 200));
		let smoothed = gaussian_smooth(&grid, 3, 1.0);

		let corner = smoothed.get(0, 0);
		assert!(corner.red < 200);
		assert_eq!(corner.red, corner.green);
		assert_eq!(corner.green, corner.blue);
	}

	#[test]
	fn smoothing_pulls_an_outlier_toward_its_neighbors() {
		let mut grid = uniform_grid(9, 9, Srgb::new(0, 0, 0));
		grid.set(4, 4, Srgb::new(255, 255, 255));

		let smoothed = gaussian_smooth(&grid, 3, 1.0);

		// The outlier sheds intensity into the surrounding pixels
		assert!(smoothed.get(4, 4).red < 255);
		assert!(smoothed.get(3, 4).red > 0);
		assert!(smoothed.get(4, 3).red > 0);
	}
}

//! The palette produced by clustering and the pixel remapping pass

use crate::grid::PixelGrid;
use crate::pack;
use palette::Srgb;
use std::collections::HashMap;

/// Maps every distinct color of an image to the mean color of its cluster
///
/// Means are kept in floating point and only rounded when written to pixels.
#[derive(Debug, Clone)]
pub struct Palette {
	/// Packed sRGB color -> cluster index
	pub(crate) lookup: HashMap<u32, u32>,
	/// The mean color of each cluster, in cluster discovery order
	pub(crate) means: Vec<Srgb<f64>>,
}

impl Palette {
	/// The mean color for `color`, or `None` if it was not in the clustered image
	#[must_use]
	pub fn get(&self, color: Srgb<u8>) -> Option<Srgb<f64>> {
		self.lookup.get(&pack(color)).map(|&cluster| self.means[cluster as usize])
	}

	/// The number of distinct colors the palette maps
	#[must_use]
	pub fn len(&self) -> usize {
		self.lookup.len()
	}

	/// Whether the palette maps no colors
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.lookup.is_empty()
	}

	/// The number of clusters
	#[must_use]
	pub fn num_clusters(&self) -> usize {
		self.means.len()
	}

	/// The rounded mean color of each cluster, in cluster discovery order
	pub fn representatives(&self) -> impl Iterator<Item = Srgb<u8>> + '_ {
		self.means.iter().map(|&mean| round_to_srgb(mean))
	}
}

/// Round a floating-point color to 8-bit channels, halves away from zero
// Means of u8 channel values stay within 0.0..=255.0, so the casts cannot truncate
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn round_to_srgb(color: Srgb<f64>) -> Srgb<u8> {
	Srgb::new(color.red.round() as u8, color.green.round() as u8, color.blue.round() as u8)
}

/// Replace every pixel with its palette entry, rounded to the nearest channel value
///
/// # Panics
///
/// Panics if the grid holds a color the palette does not map.
/// A palette extracted from the same grid maps every one of its colors.
pub fn quantize(grid: &mut PixelGrid, palette: &Palette) {
	for pixel in grid.pixels_mut() {
		let mean = palette
			.get(*pixel)
			.unwrap_or_else(|| unreachable!("the palette maps every color of the grid it was built from"));
		*pixel = round_to_srgb(mean);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn palette_of(entries: &[((u8, u8, u8), u32)], means: &[(f64, f64, f64)]) -> Palette {
		Palette {
			lookup: entries
				.iter()
				.map(|&((r, g, b), cluster)| (pack(Srgb::new(r, g, b)), cluster))
				.collect(),
			means: means.iter().map(|&(r, g, b)| Srgb::new(r, g, b)).collect(),
		}
	}

	#[test]
	fn rounding_is_half_away_from_zero() {
		assert_eq!(round_to_srgb(Srgb::new(0.0, 127.5, 255.0)), Srgb::new(0, 128, 255));
		assert_eq!(round_to_srgb(Srgb::new(7.49, 7.5, 7.51)), Srgb::new(7, 8, 8));
	}

	#[test]
	fn quantize_rewrites_every_pixel_through_the_palette() {
		let palette = palette_of(
			&[((0, 0, 0), 0), ((4, 0, 0), 0), ((200, 200, 200), 1)],
			&[(2.0, 0.0, 0.0), (200.5, 200.0, 200.0)],
		);

		let pixels = vec![
			Srgb::new(0, 0, 0),
			Srgb::new(4, 0, 0),
			Srgb::new(200, 200, 200),
			Srgb::new(4, 0, 0),
		];
		let mut grid = PixelGrid::from_pixels(2, 2, pixels).expect("valid grid");

		quantize(&mut grid, &palette);

		assert_eq!(
			grid.pixels(),
			&[
				Srgb::new(2, 0, 0),
				Srgb::new(2, 0, 0),
				Srgb::new(201, 200, 200),
				Srgb::new(2, 0, 0),
			]
		);
	}

	#[test]
	#[should_panic(expected = "the palette maps every color")]
	fn quantize_panics_on_an_unmapped_color() {
		let palette = palette_of(&[((0, 0, 0), 0)], &[(0.0, 0.0, 0.0)]);

		let mut grid = PixelGrid::from_pixels(1, 1, vec![Srgb::new(9, 9, 9)]).expect("valid grid");
		quantize(&mut grid, &palette);
	}

	#[test]
	fn representatives_round_the_means_in_cluster_order() {
		let palette = palette_of(
			&[((0, 0, 0), 0), ((10, 10, 10), 1)],
			&[(1.2, 3.5, 250.9), (9.49, 0.0, 128.5)],
		);

		let representatives: Vec<Srgb<u8>> = palette.representatives().collect();
		assert_eq!(representatives, vec![Srgb::new(1, 4, 251), Srgb::new(9, 0, 129)]);

		assert_eq!(palette.len(), 2);
		assert_eq!(palette.num_clusters(), 2);
		assert!(!palette.is_empty());
	}
}

//! Reduce an image to a small set of representative colors.
//!
//! The distinct colors of an image are treated as the vertices of a complete
//! graph weighted by Euclidean RGB distance. A minimum spanning tree of that
//! graph is built with a lazy variant of Prim's algorithm, the `k - 1`
//! heaviest tree edges are cut, and each remaining connected component is
//! averaged into one representative color. Finally every pixel is remapped to
//! the representative of its cluster.
//!
//! The whole pipeline is deterministic: the same pixels and the same `k`
//! always produce the same tree, the same palette, and the same output image.
//!
//! # Examples
//!
//! ## Quantize an image down to 8 colors.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = image::open("photo.png")?.into_rgb8();
//! let mut grid = spantone::PixelGrid::from_image(&image)?;
//!
//! let palette = spantone::reduce(&mut grid, 8)?;
//!
//! grid.into_image().save("quantized.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Build the tree once and compare several cluster counts.
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = image::open("photo.png")?.into_rgb8();
//! let grid = spantone::PixelGrid::from_image(&image)?;
//!
//! let mst = spantone::build_mst(&grid)?;
//! println!("{} distinct colors, tree weight {:.2}", mst.num_colors(), mst.total_weight);
//!
//! let coarse = spantone::extract_palette(&mst, 4)?;
//! let fine = spantone::extract_palette(&mst, 16)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Choosing k
//!
//! `k` is the number of clusters the spanning tree is cut into, and therefore
//! the number of colors in the output. It must be between 1 and the number of
//! distinct colors; anything else is rejected with
//! [`Error::InvalidClusterCount`] rather than clamped. Use
//! [`count_distinct_colors`] (or [`Mst::num_colors`]) to find the upper
//! bound for a given image.
//!
//! # Cost
//!
//! Tree construction dominates: it relaxes every remaining color once per
//! finalized color, which is quadratic in the number of *distinct* colors.
//! Photographs routinely hold hundreds of thousands of distinct colors, so
//! consider pre-smoothing with [`gaussian_smooth`] or downscaling before
//! quantizing. With the `threads` feature (enabled by default) the
//! relaxation scan is spread over a rayon thread pool without changing any
//! result bit.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::cargo)]
#![warn(clippy::use_debug, clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![warn(clippy::unwrap_used, clippy::unwrap_in_result)]
#![warn(clippy::unneeded_field_pattern, clippy::rest_pat_in_fully_bound_structs)]
#![warn(clippy::unnecessary_self_imports)]
#![warn(clippy::str_to_string, clippy::string_to_string, clippy::string_slice)]
#![warn(missing_docs, clippy::missing_docs_in_private_items, rustdoc::all)]
#![warn(clippy::float_cmp_const, clippy::lossy_float_literal)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::unreadable_literal)]

use palette::Srgb;
use std::collections::HashSet;

mod cluster;
mod error;
mod grid;
mod heap;
mod mst;
mod remap;
mod smooth;

pub use cluster::extract_palette;
pub use error::Error;
pub use grid::PixelGrid;
pub use heap::EmptyHeapError;
pub use mst::{Mst, TreeEdge};
pub use remap::{quantize, Palette};
pub use smooth::gaussian_smooth;

/// The distinct colors of an image, in row-major first-occurrence order
///
/// A color's position in the sequence is its dense index, the vertex id used
/// by [`TreeEdge`] and [`Mst::parent`].
#[derive(Debug, Clone)]
pub struct DistinctColors {
	/// The unique colors; a color's dense index is its position
	pub(crate) colors: Vec<Srgb<u8>>,
}

impl DistinctColors {
	/// The colors in dense-index order
	#[must_use]
	pub fn colors(&self) -> &[Srgb<u8>] {
		&self.colors
	}

	/// The number of distinct colors
	// Lossless, there are only (2^8)^3 possible colors
	#[allow(clippy::cast_possible_truncation)]
	#[must_use]
	pub fn num_colors(&self) -> u32 {
		self.colors.len() as u32
	}
}

/// Pack a color into the integer key used for hash lookups
pub(crate) fn pack(color: Srgb<u8>) -> u32 {
	color.into_u32::<palette::rgb::channels::Rgba>()
}

/// The Euclidean distance between two colors in RGB space
///
/// This is the true distance rather than the squared distance, so summed
/// tree weights reflect real color differences.
#[must_use]
pub fn color_distance(x: Srgb<u8>, y: Srgb<u8>) -> f64 {
	let dr = f64::from(x.red) - f64::from(y.red);
	let dg = f64::from(x.green) - f64::from(y.green);
	let db = f64::from(x.blue) - f64::from(y.blue);
	(dr * dr + dg * dg + db * db).sqrt()
}

/// Collect the distinct colors of the grid in row-major first-occurrence order
///
/// Membership is tracked in a hash set keyed by the packed color, so the scan
/// is a single pass over the pixels regardless of how many repeat.
#[must_use]
pub fn distinct_colors(grid: &PixelGrid) -> DistinctColors {
	let mut seen: HashSet<u32> = HashSet::new();
	let mut colors = Vec::new();

	for &pixel in grid.pixels() {
		if seen.insert(pack(pixel)) {
			colors.push(pixel);
		}
	}

	DistinctColors { colors }
}

/// Count the distinct colors of the grid
#[must_use]
pub fn count_distinct_colors(grid: &PixelGrid) -> u32 {
	distinct_colors(grid).num_colors()
}

/// Build the minimum spanning tree over the grid's distinct colors
///
/// The tree connects every distinct color with minimal total Euclidean RGB
/// distance. Build it once and re-cut it with [`extract_palette`] to compare
/// several cluster counts cheaply.
///
/// # Errors
///
/// Returns [`Error::EmptyHeap`] if the frontier heap drains before every
/// color is spanned, which the complete color graph rules out.
pub fn build_mst(grid: &PixelGrid) -> Result<Mst, Error> {
	mst::build(distinct_colors(grid))
}

/// Quantize the grid down to `k` representative colors in place
///
/// Runs the full pipeline and returns the palette that was applied, whose
/// [`representatives`](Palette::representatives) are the `k` colors now
/// present in the grid.
///
/// # Errors
///
/// Returns [`Error::InvalidClusterCount`] unless `k` is in
/// `1..=count_distinct_colors(grid)`.
pub fn reduce(grid: &mut PixelGrid, k: u32) -> Result<Palette, Error> {
	let mst = build_mst(grid)?;
	let palette = extract_palette(&mst, k)?;
	quantize(grid, &palette);
	Ok(palette)
}

//! Minimum spanning tree construction over the distinct colors of an image
//!
//! The distinct colors form a complete graph weighted by Euclidean RGB
//! distance, so the tree is built with a lazy variant of Prim's algorithm:
//! the frontier heap never rewrites a candidate in place, it inserts the
//! improved record and discards the superseded one when it is popped.

use crate::heap::{MinHeap, Priority};
use crate::{color_distance, DistinctColors, Error};
use palette::Srgb;
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// The edge that attached one distinct color to the growing spanning tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeEdge {
	/// The index of the already spanned color this edge extends from,
	/// or `None` for the root sentinel
	pub from: Option<u32>,
	/// The index of the color this edge attached
	pub to: u32,
	/// The Euclidean RGB distance between the endpoint colors
	pub weight: f64,
}

impl Priority for TreeEdge {
	fn priority(&self) -> f64 {
		self.weight
	}
}

/// A minimum spanning tree over the distinct colors of an image
#[derive(Debug, Clone)]
pub struct Mst {
	/// The sum of all edge weights
	pub total_weight: f64,
	/// One edge per color in finalization order;
	/// `edges[0]` is the zero-weight root sentinel
	pub edges: Vec<TreeEdge>,
	/// The tree predecessor of each color index, or `None` for the root
	pub parent: Vec<Option<u32>>,
	/// The distinct colors the tree spans
	pub colors: DistinctColors,
}

impl Mst {
	/// The number of distinct colors the tree spans
	#[must_use]
	pub fn num_colors(&self) -> u32 {
		self.colors.num_colors()
	}
}

/// Relaxation bookkeeping for every color, scoped to one [`build`] call
struct Frontier {
	/// Whether each color has been attached to the tree
	finalized: Vec<bool>,
	/// The cheapest known distance from each color to the tree
	best_distance: Vec<f64>,
	/// The spanned color each best distance was measured against
	attached_via: Vec<Option<u32>>,
}

impl Frontier {
	/// Nothing spanned yet: the root sits at distance zero and every other color at infinity
	fn new(num_colors: usize) -> Self {
		let mut best_distance = vec![f64::INFINITY; num_colors];
		best_distance[0] = 0.0;

		Self {
			finalized: vec![false; num_colors],
			best_distance,
			attached_via: vec![None; num_colors],
		}
	}
}

/// Build the minimum spanning tree over the given colors
///
/// The heap is seeded with the root sentinel. Every pop either finalizes its
/// target color and relaxes the remaining ones, or is a stale record from a
/// lazy decrease-key and is discarded. A complete graph finalizes all `V`
/// colors after exactly `V` non-stale pops, so the heap drains on its own.
pub(crate) fn build(colors: DistinctColors) -> Result<Mst, Error> {
	let num_colors = colors.colors().len();
	debug_assert!(num_colors > 0);

	let mut frontier = Frontier::new(num_colors);
	let mut heap = MinHeap::with_capacity(num_colors);
	let mut edges = Vec::with_capacity(num_colors);

	heap.insert(TreeEdge { from: None, to: 0, weight: 0.0 });

	while !heap.is_empty() {
		let edge = heap.extract_min()?;
		let spanned = edge.to as usize;

		// A stale record whose target was finalized by a lighter edge
		if frontier.finalized[spanned] {
			continue;
		}

		frontier.finalized[spanned] = true;
		edges.push(edge);
		relax(colors.colors(), spanned, &mut frontier, &mut heap);
	}

	debug_assert_eq!(edges.len(), num_colors);
	let total_weight = edges.iter().map(|edge| edge.weight).sum();

	Ok(Mst {
		total_weight,
		edges,
		parent: frontier.attached_via,
		colors,
	})
}

/// Offer the newly `spanned` color as an attachment point to every unfinalized color
///
/// A strict improvement updates the frontier and inserts a fresh heap record,
/// leaving any superseded record behind as a stale entry.
#[cfg(not(feature = "threads"))]
fn relax(colors: &[Srgb<u8>], spanned: usize, frontier: &mut Frontier, heap: &mut MinHeap<TreeEdge>) {
	let origin = colors[spanned];

	// Lossless, there are only (2^8)^3 possible colors
	#[allow(clippy::cast_possible_truncation)]
	let from = spanned as u32;

	for (to, &color) in colors.iter().enumerate() {
		if frontier.finalized[to] {
			continue;
		}

		let weight = color_distance(origin, color);
		if weight < frontier.best_distance[to] {
			frontier.best_distance[to] = weight;
			frontier.attached_via[to] = Some(from);

			#[allow(clippy::cast_possible_truncation)]
			let to = to as u32;
			heap.insert(TreeEdge { from: Some(from), to, weight });
		}
	}
}

/// Offer the newly `spanned` color as an attachment point to every unfinalized color
///
/// Each target color owns its own frontier slots, so the scan parallelizes
/// cleanly. Improvements are collected in index order and inserted
/// sequentially, which keeps the heap state identical to the sequential path.
#[cfg(feature = "threads")]
fn relax(colors: &[Srgb<u8>], spanned: usize, frontier: &mut Frontier, heap: &mut MinHeap<TreeEdge>) {
	let origin = colors[spanned];

	// Lossless, there are only (2^8)^3 possible colors
	#[allow(clippy::cast_possible_truncation)]
	let from = spanned as u32;

	let chunk_size = (colors.len() / rayon::current_num_threads()).max(1);

	let improved = frontier
		.best_distance
		.par_iter_mut()
		.zip(frontier.attached_via.par_iter_mut())
		.zip(frontier.finalized.par_iter())
		.zip(colors.par_iter())
		.enumerate()
		.with_min_len(chunk_size)
		.filter_map(|(to, (((best_distance, attached_via), &finalized), &color))| {
			if finalized {
				return None;
			}

			let weight = color_distance(origin, color);
			if weight < *best_distance {
				*best_distance = weight;
				*attached_via = Some(from);

				#[allow(clippy::cast_possible_truncation)]
				let to = to as u32;
				Some(TreeEdge { from: Some(from), to, weight })
			} else {
				None
			}
		})
		.collect::<Vec<_>>();

	for edge in improved {
		heap.insert(edge);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	fn distinct(colors: &[(u8, u8, u8)]) -> DistinctColors {
		DistinctColors {
			colors: colors.iter().map(|&(r, g, b)| Srgb::new(r, g, b)).collect(),
		}
	}

	#[test]
	#[allow(clippy::float_cmp)]
	fn single_color_tree_is_the_sentinel_alone() {
		let mst = build(distinct(&[(12, 200, 57)])).expect("tree over one color");

		assert_eq!(mst.edges, vec![TreeEdge { from: None, to: 0, weight: 0.0 }]);
		assert_eq!(mst.parent, vec![None]);
		assert_eq!(mst.total_weight, 0.0);
	}

	#[test]
	#[allow(clippy::float_cmp)]
	fn right_triangle_attaches_both_legs_to_the_root() {
		// Pairwise distances are 3, 4, and 5, so the hypotenuse is never used
		let mst = build(distinct(&[(0, 0, 0), (3, 0, 0), (0, 4, 0)])).expect("tree over three colors");

		assert_eq!(
			mst.edges,
			vec![
				TreeEdge { from: None, to: 0, weight: 0.0 },
				TreeEdge { from: Some(0), to: 1, weight: 3.0 },
				TreeEdge { from: Some(0), to: 2, weight: 4.0 },
			]
		);
		assert_eq!(mst.parent, vec![None, Some(0), Some(0)]);
		assert_eq!(mst.total_weight, 7.0);
	}

	#[test]
	#[allow(clippy::float_cmp)]
	fn collinear_colors_chain_through_their_neighbor() {
		// The direct edge 0-2 (weight 10) is inserted first and must be
		// superseded by the relaxation through color 1 (weight 5)
		let mst = build(distinct(&[(0, 0, 0), (5, 0, 0), (10, 0, 0)])).expect("tree over three colors");

		assert_eq!(
			mst.edges,
			vec![
				TreeEdge { from: None, to: 0, weight: 0.0 },
				TreeEdge { from: Some(0), to: 1, weight: 5.0 },
				TreeEdge { from: Some(1), to: 2, weight: 5.0 },
			]
		);
		assert_eq!(mst.parent, vec![None, Some(0), Some(1)]);
		assert_eq!(mst.total_weight, 10.0);
	}

	#[test]
	#[allow(clippy::cast_possible_truncation)]
	fn every_color_is_spanned_exactly_once() {
		let colors: Vec<(u8, u8, u8)> = (0..40u32)
			.map(|i| {
				let scrambled = i.wrapping_mul(2654435761);
				((scrambled >> 16) as u8, (scrambled >> 8) as u8, scrambled as u8)
			})
			.collect();
		let num_colors = colors.len();

		let mst = build(distinct(&colors)).expect("tree over generated colors");

		assert_eq!(mst.edges.len(), num_colors);
		assert_eq!(mst.edges[0], TreeEdge { from: None, to: 0, weight: 0.0 });

		let mut spanned: Vec<u32> = mst.edges.iter().map(|edge| edge.to).collect();
		spanned.sort_unstable();
		let expected: Vec<u32> = (0..num_colors as u32).collect();
		assert_eq!(spanned, expected);

		assert!(mst.edges[1..].iter().all(|edge| edge.from.is_some()));
	}

	#[test]
	fn parents_match_the_finalizing_edges() {
		let colors = [(0, 0, 0), (90, 12, 3), (14, 200, 77), (255, 255, 255), (1, 2, 3), (80, 80, 80)];
		let mst = build(distinct(&colors)).expect("tree over six colors");

		for edge in &mst.edges {
			assert_eq!(mst.parent[edge.to as usize], edge.from);
		}
	}

	#[test]
	#[allow(clippy::float_cmp)]
	fn total_weight_sums_the_non_sentinel_edges() {
		let colors = [(0, 0, 0), (90, 12, 3), (14, 200, 77), (255, 255, 255), (1, 2, 3), (80, 80, 80)];
		let mst = build(distinct(&colors)).expect("tree over six colors");

		let sum: f64 = mst.edges[1..].iter().map(|edge| edge.weight).sum();
		assert_relative_eq!(mst.total_weight, sum, max_relative = 1e-12);

		// Every non-sentinel weight is the distance between its endpoints
		for edge in &mst.edges[1..] {
			let from = edge.from.expect("non-sentinel edge") as usize;
			let expected = color_distance(mst.colors.colors()[from], mst.colors.colors()[edge.to as usize]);
			assert_eq!(edge.weight, expected);
		}
	}
}

//! Cuts the spanning tree into clusters and averages each one into a palette entry

use crate::remap::Palette;
use crate::{pack, DistinctColors, Error, Mst, TreeEdge};
use palette::Srgb;
use std::collections::{HashMap, VecDeque};

/// Cut the tree into `k` clusters and map every distinct color to its cluster mean
///
/// The `k - 1` heaviest edges are removed first; when weights tie, the edge
/// encountered earliest in finalization order wins. Each remaining connected
/// component is then averaged per channel in floating point. The tree itself
/// is left untouched, so it can be re-cut at a different `k`.
///
/// # Errors
///
/// Returns [`Error::InvalidClusterCount`] unless `k` is in `1..=mst.num_colors()`.
pub fn extract_palette(mst: &Mst, k: u32) -> Result<Palette, Error> {
	let num_colors = mst.num_colors();
	if k < 1 || k > num_colors {
		return Err(Error::InvalidClusterCount { k, num_colors });
	}

	let forest = cut_heaviest_edges(&mst.edges, k);
	Ok(cluster_means(&mst.colors, &forest, k))
}

/// Remove the `k - 1` heaviest non-sentinel edges, leaving a forest of `k` components
///
/// Each removal scans the remaining edges for the maximum weight.
/// The comparison is strict, so the first maximum encountered wins ties.
fn cut_heaviest_edges(edges: &[TreeEdge], k: u32) -> Vec<TreeEdge> {
	// The root sentinel at index 0 is not a real edge
	let mut forest = edges[1..].to_vec();

	for _ in 1..k {
		let mut heaviest = 0;
		for (index, edge) in forest.iter().enumerate() {
			if edge.weight > forest[heaviest].weight {
				heaviest = index;
			}
		}

		forest.remove(heaviest);
	}

	forest
}

/// Average each component of the forest and assign its member colors to the mean
///
/// Roots are scanned in dense-index order and components are walked
/// breadth-first, so cluster numbering is deterministic. The means themselves
/// are sums over whole components and do not depend on traversal order.
fn cluster_means(colors: &DistinctColors, forest: &[TreeEdge], k: u32) -> Palette {
	let num_colors = colors.colors().len();

	let mut adjacency: Vec<Vec<u32>> = vec![Vec::new(); num_colors];
	for edge in forest {
		// The sentinel was cut away, so every forest edge has an origin
		if let Some(from) = edge.from {
			adjacency[from as usize].push(edge.to);
			adjacency[edge.to as usize].push(from);
		}
	}

	let mut visited = vec![false; num_colors];
	let mut cluster_of = vec![0u32; num_colors];
	let mut means: Vec<Srgb<f64>> = Vec::with_capacity(k as usize);

	for root in 0..num_colors {
		if visited[root] {
			continue;
		}

		// Lossless, there are only (2^8)^3 possible colors
		#[allow(clippy::cast_possible_truncation)]
		let cluster = means.len() as u32;

		let mut members = 0u32;
		let (mut red, mut green, mut blue) = (0.0f64, 0.0, 0.0);

		let mut frontier = VecDeque::new();
		visited[root] = true;
		#[allow(clippy::cast_possible_truncation)]
		frontier.push_back(root as u32);

		while let Some(index) = frontier.pop_front() {
			let color = colors.colors()[index as usize];
			red += f64::from(color.red);
			green += f64::from(color.green);
			blue += f64::from(color.blue);
			members += 1;
			cluster_of[index as usize] = cluster;

			for &next in &adjacency[index as usize] {
				if !visited[next as usize] {
					visited[next as usize] = true;
					frontier.push_back(next);
				}
			}
		}

		let count = f64::from(members);
		means.push(Srgb::new(red / count, green / count, blue / count));
	}

	// Removing k - 1 edges from a tree always leaves k components
	debug_assert_eq!(means.len(), k as usize);

	let mut lookup = HashMap::with_capacity(num_colors);
	for (index, &color) in colors.colors().iter().enumerate() {
		lookup.insert(pack(color), cluster_of[index]);
	}

	Palette { lookup, means }
}

//! Error types reported by the quantization pipeline

use crate::heap::EmptyHeapError;
use thiserror::Error;

/// An error from building a spanning tree, cutting a palette, or validating their inputs
#[derive(Debug, Error)]
pub enum Error {
	/// The pixel grid has a zero width or height
	#[error("image dimensions must be nonzero")]
	EmptyImage,

	/// The pixel buffer does not hold `width * height` pixels
	#[error("pixel buffer holds {len} pixels, but the dimensions are {width}x{height}")]
	DimensionMismatch {
		/// The number of pixels provided
		len: usize,
		/// The stated width
		width: u32,
		/// The stated height
		height: u32,
	},

	/// The requested cluster count is outside `1..=num_colors`
	#[error("cluster count must be in 1..={num_colors}, but {k} was requested")]
	InvalidClusterCount {
		/// The requested cluster count
		k: u32,
		/// The number of distinct colors available
		num_colors: u32,
	},

	/// The spanning-tree frontier heap drained before every color was finalized
	#[error(transparent)]
	EmptyHeap(#[from] EmptyHeapError),
}

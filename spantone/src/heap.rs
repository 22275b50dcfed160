//! A binary min-heap with lazy decrease-key for the spanning-tree frontier

use thiserror::Error;

/// An attempt to extract the minimum of an empty heap
///
/// During spanning-tree construction this signals a broken invariant:
/// the frontier heap over a complete graph only drains once every color is finalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot extract the minimum of an empty heap")]
pub struct EmptyHeapError;

/// The weight a [`MinHeap`] orders its records by, smallest first
pub trait Priority {
	/// The weight of this record
	fn priority(&self) -> f64;
}

/// A binary min-heap of weighted records
///
/// Decrease-key is lazy: an improved candidate is inserted as a fresh record
/// and the superseded record stays behind as a stale entry.
/// Consumers must skip popped records whose target is already finalized.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
	/// The records in array-heap order
	records: Vec<T>,
}

impl<T: Priority> MinHeap<T> {
	/// Create an empty heap
	#[must_use]
	pub const fn new() -> Self {
		Self { records: Vec::new() }
	}

	/// Create an empty heap with room for `capacity` records
	#[must_use]
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			records: Vec::with_capacity(capacity),
		}
	}

	/// Whether the heap holds no records
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Add a record, keeping the heap ordered
	pub fn insert(&mut self, record: T) {
		self.records.push(record);
		self.sift_up(self.records.len() - 1);
	}

	/// Remove and return the record with the smallest weight
	///
	/// # Errors
	///
	/// Returns an [`EmptyHeapError`] if the heap holds no records.
	pub fn extract_min(&mut self) -> Result<T, EmptyHeapError> {
		if self.records.is_empty() {
			return Err(EmptyHeapError);
		}

		let min = self.records.swap_remove(0);
		if !self.records.is_empty() {
			self.sift_down(0);
		}

		Ok(min)
	}

	/// Whether the record at `x` weighs strictly less than the record at `y`
	fn is_less(&self, x: usize, y: usize) -> bool {
		f64::total_cmp(&self.records[x].priority(), &self.records[y].priority()).is_lt()
	}

	/// Move the record at `index` up until its parent is no heavier
	fn sift_up(&mut self, mut index: usize) {
		while index > 0 {
			let parent = (index - 1) / 2;
			if !self.is_less(index, parent) {
				break;
			}

			self.records.swap(index, parent);
			index = parent;
		}
	}

	/// Move the record at `index` down until neither child is lighter
	fn sift_down(&mut self, mut index: usize) {
		loop {
			let left = 2 * index + 1;
			let right = left + 1;

			let mut smallest = index;
			if left < self.records.len() && self.is_less(left, smallest) {
				smallest = left;
			}
			if right < self.records.len() && self.is_less(right, smallest) {
				smallest = right;
			}

			if smallest == index {
				break;
			}

			self.records.swap(index, smallest);
			index = smallest;
		}
	}
}

impl<T: Priority> Default for MinHeap<T> {
	fn default() -> Self {
		Self::new()
	}
}

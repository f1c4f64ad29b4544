use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};

/// A discrete weighted distribution.
///
/// Values are kept in insertion order next to the prefix sums of their
/// weights, so one uniform draw in `[0, total_weight]` plus a binary search
/// selects a value with probability proportional to its weight.
///
/// ## Invariants
/// - `cumulative_weights[i]` is the sum of the first `i + 1` weights
/// - Every stored weight is strictly positive, so the prefix sums are
///   strictly increasing
///
/// Sets are filled by the external model builder and never change afterwards.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WeightedSet<T> {
	/// Values in insertion order.
	elements: Vec<T>,
	/// Prefix sums of the weights.
	cumulative_weights: Vec<u64>,
}

impl<T> Default for WeightedSet<T> {
	fn default() -> Self {
		Self { elements: Vec::new(), cumulative_weights: Vec::new() }
	}
}

impl<T> WeightedSet<T> {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a value with the given weight.
	///
	/// Zero-weight entries carry no probability mass and are dropped.
	pub fn push(&mut self, value: T, weight: u64) {
		if weight == 0 {
			return;
		}
		let total = self.total_weight();
		self.elements.push(value);
		self.cumulative_weights.push(total + weight);
	}

	/// Builds a set from `(value, weight)` pairs, in iteration order.
	pub fn from_pairs<I>(pairs: I) -> Self
	where
		I: IntoIterator<Item = (T, u64)>,
	{
		let mut set = Self::new();
		for (value, weight) in pairs {
			set.push(value, weight);
		}
		set
	}

	/// Number of values in the set.
	pub fn len(&self) -> usize {
		self.elements.len()
	}

	pub fn is_empty(&self) -> bool {
		self.elements.is_empty()
	}

	/// Total probability mass; 0 for an empty set.
	pub fn total_weight(&self) -> u64 {
		self.cumulative_weights.last().copied().unwrap_or(0)
	}

	/// Values in insertion order.
	pub fn values(&self) -> impl Iterator<Item = &T> {
		self.elements.iter()
	}

	/// Draws one value, weight-proportionally.
	///
	/// Advances the PRNG by exactly one draw.
	///
	/// # Errors
	/// Returns `InvalidModelState` if the set is empty; a well-formed model
	/// never hands the generator an empty distribution to sample.
	pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<&T> {
		if self.is_empty() {
			return Err(GeneratorError::InvalidModelState("sampled an empty weighted set"));
		}
		let draw = rng.random_range(0..=self.total_weight());
		Ok(self.locate(draw))
	}

	/// Value at the smallest index whose cumulative weight is >= `draw`.
	///
	/// Boundary ties resolve to the lowest matching slot.
	fn locate(&self, draw: u64) -> &T {
		let index = self.cumulative_weights.partition_point(|&weight| weight < draw);
		// Fallback clamp: draw never exceeds the total weight.
		&self.elements[index.min(self.elements.len() - 1)]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	fn letters() -> WeightedSet<&'static str> {
		WeightedSet::from_pairs([("a", 2), ("b", 3), ("c", 1)])
	}

	#[test]
	fn weights_accumulate_into_prefix_sums() {
		let set = letters();
		assert_eq!(set.len(), 3);
		assert_eq!(set.total_weight(), 6);
	}

	#[test]
	fn exact_boundary_draws_resolve_to_the_lowest_slot() {
		let set = letters();
		assert_eq!(*set.locate(0), "a");
		assert_eq!(*set.locate(2), "a");
		assert_eq!(*set.locate(3), "b");
		assert_eq!(*set.locate(5), "b");
		assert_eq!(*set.locate(6), "c");
	}

	#[test]
	fn draws_between_boundaries_select_the_covering_slot() {
		let set = letters();
		assert_eq!(*set.locate(1), "a");
		assert_eq!(*set.locate(4), "b");
	}

	#[test]
	fn zero_weight_entries_are_dropped() {
		let set = WeightedSet::from_pairs([("a", 0), ("b", 4)]);
		assert_eq!(set.len(), 1);
		assert_eq!(set.total_weight(), 4);
	}

	#[test]
	fn sampling_an_empty_set_is_a_model_error() {
		let set: WeightedSet<&str> = WeightedSet::new();
		let mut rng = ChaCha8Rng::seed_from_u64(7);
		assert!(matches!(
			set.sample(&mut rng),
			Err(GeneratorError::InvalidModelState(_))
		));
	}

	#[test]
	fn sampling_always_returns_a_member() {
		let set = letters();
		let mut rng = ChaCha8Rng::seed_from_u64(42);
		for _ in 0..100 {
			let value = *set.sample(&mut rng).unwrap();
			assert!(["a", "b", "c"].contains(&value));
		}
	}
}

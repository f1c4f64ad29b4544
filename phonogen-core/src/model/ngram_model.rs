use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::weighted_set::WeightedSet;
use crate::error::{GeneratorError, Result};

/// A single n-gram node in the model.
///
/// `children` holds the n-grams reachable by extending the current word by
/// one character mid-word; `last_children` holds the n-grams that are valid
/// word-final extensions. Either may be empty: an n-gram with both empty
/// only ever ends a word as-is.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct NGramElement {
	children: WeightedSet<String>,
	last_children: WeightedSet<String>,
}

impl NGramElement {
	pub fn new(children: WeightedSet<String>, last_children: WeightedSet<String>) -> Self {
		Self { children, last_children }
	}

	/// Mid-word continuations.
	pub fn children(&self) -> &WeightedSet<String> {
		&self.children
	}

	/// Word-final continuations.
	pub fn last_children(&self) -> &WeightedSet<String> {
		&self.last_children
	}
}

/// The read-only statistical model every generator samples from.
///
/// # Responsibilities
/// - Map n-grams to their continuation distributions
/// - Hold the word-start distributions, global and per sentence position
/// - Hold the empirical word and sentence length distributions
///
/// # Lifecycle
/// An external trainer fills the model through the `insert_*`/`set_*`
/// methods, then hands it to one or more generators behind an `Arc`. From
/// that point on nothing mutates it; sharing is lock-free by construction.
///
/// # Invariants
/// - `n >= 1`
/// - Every n-gram reachable through any distribution has an entry in
///   `elements`
/// - `sentence_elements` is keyed by nonzero positions within
///   `-number_of_sentence_elements..=number_of_sentence_elements`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NGramModel {
	/// Configured n-gram length.
	n: usize,
	/// Count of distinguished positions from each sentence boundary.
	/// 0 disables positional generation.
	number_of_sentence_elements: usize,
	/// Mapping n-gram -> continuation distributions.
	elements: HashMap<String, NGramElement>,
	/// N-grams usable as any word's start.
	first_elements: WeightedSet<String>,
	/// Word-start distributions per sentence position. Positive keys count
	/// from the sentence start, negative keys from the sentence end.
	sentence_elements: HashMap<i32, WeightedSet<String>>,
	/// Empirical word length distribution.
	word_lengths: WeightedSet<usize>,
	/// Empirical sentence length distribution, in words.
	sentence_lengths: WeightedSet<usize>,
}

impl NGramModel {
	/// Creates an empty model shell for the trainer to fill.
	///
	/// # Errors
	/// Returns `InvalidModelState` if `n` is 0.
	pub fn new(n: usize, number_of_sentence_elements: usize) -> Result<Self> {
		if n == 0 {
			return Err(GeneratorError::InvalidModelState("n-gram size must be at least 1"));
		}
		Ok(Self {
			n,
			number_of_sentence_elements,
			elements: HashMap::new(),
			first_elements: WeightedSet::new(),
			sentence_elements: HashMap::new(),
			word_lengths: WeightedSet::new(),
			sentence_lengths: WeightedSet::new(),
		})
	}

	// Build-phase surface, used by the external trainer.

	/// Registers the continuation distributions of one n-gram.
	pub fn insert_element(&mut self, ngram: impl Into<String>, element: NGramElement) {
		self.elements.insert(ngram.into(), element);
	}

	pub fn set_first_elements(&mut self, set: WeightedSet<String>) {
		self.first_elements = set;
	}

	/// Registers the word-start distribution for one sentence position.
	///
	/// # Errors
	/// Returns `InvalidPosition` if `position` is zero or outside the
	/// configured positional range.
	pub fn insert_sentence_element(&mut self, position: i32, set: WeightedSet<String>) -> Result<()> {
		let max = self.number_of_sentence_elements;
		if position == 0 || position.unsigned_abs() as usize > max {
			return Err(GeneratorError::InvalidPosition { position, max });
		}
		self.sentence_elements.insert(position, set);
		Ok(())
	}

	pub fn set_word_lengths(&mut self, set: WeightedSet<usize>) {
		self.word_lengths = set;
	}

	pub fn set_sentence_lengths(&mut self, set: WeightedSet<usize>) {
		self.sentence_lengths = set;
	}

	// Read contract, used by the generator.

	/// Configured n-gram length.
	pub fn n(&self) -> usize {
		self.n
	}

	pub fn number_of_sentence_elements(&self) -> usize {
		self.number_of_sentence_elements
	}

	/// Continuations of one n-gram, if the model knows it.
	pub fn element(&self, ngram: &str) -> Option<&NGramElement> {
		self.elements.get(ngram)
	}

	pub fn first_elements(&self) -> &WeightedSet<String> {
		&self.first_elements
	}

	/// Word-start distribution for one sentence position.
	pub fn sentence_element(&self, position: i32) -> Option<&WeightedSet<String>> {
		self.sentence_elements.get(&position)
	}

	pub fn word_lengths(&self) -> &WeightedSet<usize> {
		&self.word_lengths
	}

	pub fn sentence_lengths(&self) -> &WeightedSet<usize> {
		&self.sentence_lengths
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn n_gram_size_zero_is_rejected() {
		assert!(matches!(
			NGramModel::new(0, 0),
			Err(GeneratorError::InvalidModelState(_))
		));
	}

	#[test]
	fn inserted_elements_are_found_again() {
		let mut model = NGramModel::new(3, 0).unwrap();
		let children = WeightedSet::from_pairs([("her".to_owned(), 1)]);
		model.insert_element("the", NGramElement::new(children, WeightedSet::new()));

		let element = model.element("the").unwrap();
		assert_eq!(element.children().len(), 1);
		assert!(element.last_children().is_empty());
		assert!(model.element("xyz").is_none());
	}

	#[test]
	fn sentence_elements_are_bounded_by_the_configured_positions() {
		let mut model = NGramModel::new(3, 2).unwrap();
		let set = WeightedSet::from_pairs([("the".to_owned(), 1)]);

		model.insert_sentence_element(1, set.clone()).unwrap();
		model.insert_sentence_element(-2, set.clone()).unwrap();

		assert!(matches!(
			model.insert_sentence_element(0, set.clone()),
			Err(GeneratorError::InvalidPosition { position: 0, max: 2 })
		));
		assert!(matches!(
			model.insert_sentence_element(3, set.clone()),
			Err(GeneratorError::InvalidPosition { position: 3, max: 2 })
		));
		assert!(model.sentence_element(1).is_some());
		assert!(model.sentence_element(2).is_none());
	}
}

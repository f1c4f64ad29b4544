//! Shared test fixture playing the external-trainer role.
//!
//! Counts n-gram transitions over a small embedded corpus and fills an
//! `NGramModel` through its build-phase API, the same way the real trainer
//! collaborator would.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use phonogen_core::model::ngram_model::{NGramElement, NGramModel};
use phonogen_core::model::weighted_set::WeightedSet;

pub const N: usize = 3;

/// Training corpus; every word is at least three characters long and the
/// sentence-initial words cover the letters a, b and c.
pub const CORPUS: &[&str] = &[
	"alice followed the white rabbit down the garden path",
	"bright lanterns burned above the quiet harbor wall",
	"cold rivers carried the broken branches toward the sea",
	"the quick brown fox jumps over the lazy sleeping dog",
	"birds gathered beneath the cedar branches before dawn",
	"autumn colors covered the garden before the first frost",
];

/// Builds a model over [`CORPUS`] with the given positional depth.
pub fn model(number_of_sentence_elements: usize) -> Arc<NGramModel> {
	let sentences: Vec<Vec<&str>> = CORPUS
		.iter()
		.map(|sentence| sentence.split_whitespace().collect())
		.collect();

	let mut all_ngrams: BTreeSet<String> = BTreeSet::new();
	let mut children: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
	let mut last_children: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
	let mut first: BTreeMap<String, u64> = BTreeMap::new();
	let mut positional: BTreeMap<i32, BTreeMap<String, u64>> = BTreeMap::new();
	let mut word_lengths: BTreeMap<usize, u64> = BTreeMap::new();
	let mut sentence_lengths: BTreeMap<usize, u64> = BTreeMap::new();

	for words in &sentences {
		*sentence_lengths.entry(words.len()).or_insert(0) += 1;

		for (index, word) in words.iter().enumerate() {
			let chars: Vec<char> = word.chars().collect();
			if chars.len() < N {
				continue;
			}
			*word_lengths.entry(chars.len()).or_insert(0) += 1;

			let windows: Vec<String> = (0..=chars.len() - N)
				.map(|i| chars[i..i + N].iter().collect())
				.collect();
			for window in &windows {
				all_ngrams.insert(window.clone());
			}

			*first.entry(windows[0].clone()).or_insert(0) += 1;

			let from_start = (index + 1) as i32;
			let from_end = index as i32 - words.len() as i32;
			if from_start as usize <= number_of_sentence_elements {
				*positional
					.entry(from_start)
					.or_default()
					.entry(windows[0].clone())
					.or_insert(0) += 1;
			}
			if from_end.unsigned_abs() as usize <= number_of_sentence_elements {
				*positional
					.entry(from_end)
					.or_default()
					.entry(windows[0].clone())
					.or_insert(0) += 1;
			}

			// The shift to the word-final window is a last child, every
			// other shift is a mid-word child.
			for i in 0..windows.len().saturating_sub(1) {
				let target = if i + 1 == windows.len() - 1 {
					&mut last_children
				} else {
					&mut children
				};
				*target
					.entry(windows[i].clone())
					.or_default()
					.entry(windows[i + 1].clone())
					.or_insert(0) += 1;
			}
		}
	}

	let mut model = NGramModel::new(N, number_of_sentence_elements).unwrap();
	for ngram in &all_ngrams {
		model.insert_element(
			ngram.clone(),
			NGramElement::new(string_set(children.get(ngram)), string_set(last_children.get(ngram))),
		);
	}
	model.set_first_elements(string_set(Some(&first)));
	for (position, counts) in &positional {
		model.insert_sentence_element(*position, string_set(Some(counts))).unwrap();
	}
	model.set_word_lengths(length_set(&word_lengths));
	model.set_sentence_lengths(length_set(&sentence_lengths));

	Arc::new(model)
}

fn string_set(counts: Option<&BTreeMap<String, u64>>) -> WeightedSet<String> {
	match counts {
		Some(counts) => WeightedSet::from_pairs(counts.iter().map(|(value, weight)| (value.clone(), *weight))),
		None => WeightedSet::new(),
	}
}

fn length_set(counts: &BTreeMap<usize, u64>) -> WeightedSet<usize> {
	WeightedSet::from_pairs(counts.iter().map(|(value, weight)| (*value, *weight)))
}

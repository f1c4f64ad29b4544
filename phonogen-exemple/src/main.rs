use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use phonogen_core::model::generation_input::{EndingPunctuation, WordInput, WordStart};
use phonogen_core::model::generator::Generator;
use phonogen_core::model::ngram_model::{NGramElement, NGramModel};
use phonogen_core::model::weighted_set::WeightedSet;

const N: usize = 3;

/// A few sentences to count n-grams from. In a real setup the model comes
/// from the trainer collaborator; this demo fills one by hand through the
/// same construction API.
const CORPUS: &[&str] = &[
	"the silver river wandered past the sleeping village",
	"morning light gathered slowly over the eastern hills",
	"children carried bright paper lanterns toward the square",
	"autumn wind scattered the first leaves across the garden",
	"the old belltower counted the quiet evening hours",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt::init();

	let model = build_model();
	// An explicit seed makes the run reproducible; Generator::new would
	// pick and record one instead.
	let mut generator = Generator::with_seed(Arc::clone(&model), 42);
	println!("seed: {}", generator.seed());

	// Free-standing words
	for i in 0..5 {
		if let Some(word) = generator.word(&WordInput::default())? {
			println!("word {}: {}", i + 1, word);
		}
	}

	// A word grown from an explicit starting n-gram
	let input = WordInput {
		start: WordStart::NGram("riv".to_owned()),
		..WordInput::default()
	};
	if let Some(word) = generator.word(&input)? {
		println!("from 'riv': {}", word);
	}

	// An unknown n-gram is a normal absence, not an error
	let input = WordInput {
		start: WordStart::NGram("zzz".to_owned()),
		..WordInput::default()
	};
	match generator.word(&input)? {
		Some(word) => println!("from 'zzz': {}", word),
		None => println!("from 'zzz': no such continuation"),
	}

	// Sentences with the default '.', '!', '?' punctuation set
	println!("sentence: {}", generator.sentence(Some(8), None, None)?);

	// A paragraph and a fixed-length text with an ellipsis suffix
	println!("paragraph: {}", generator.paragraph(Some(3), None)?);
	let ending = EndingPunctuation::Fixed(".".to_owned());
	println!("text: {}", generator.text(Some(160), Some(&ending), Some("..."))?);

	// A poem in two stanzas, then an acrostic
	println!("poem:\n{}", generator.poem(Some(6), Some(3), Some(5), None)?);
	println!("acrostic:\n{}", generator.acrostic_poem("calm", Some(4), None)?);

	Ok(())
}

/// Counts transitions over [`CORPUS`] and fills a model, standing in for
/// the external trainer.
fn build_model() -> Arc<NGramModel> {
	let number_of_sentence_elements = 2;
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

	// NGramModel::new only fails for n = 0.
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

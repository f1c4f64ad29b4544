use std::sync::Arc;

use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use super::generation_input::{EndingPunctuation, WordInput, WordStart};
use super::ngram_model::NGramModel;
use super::weighted_set::WeightedSet;
use crate::error::{GeneratorError, Result};

/// Default ceiling on word growth, in characters.
pub const DEFAULT_GROWTH_LIMIT: usize = 1024;

/// High-level text generator over a shared read-only n-gram model.
///
/// # Responsibilities
/// - Assemble words by chaining n-gram lookups through the model
/// - Compose sentences, paragraphs, free text and poems on top of words
/// - Own the seeded PRNG that makes every run reproducible
///
/// # Invariants
/// - The model is never mutated; any number of generators may share one `Arc`
/// - Every sampling operation advances the owned PRNG
/// - Same seed + same model + same call sequence produces identical output
///
/// The generator is deliberately single-threaded: the PRNG is its only
/// mutable state and is not shared. Concurrent callers use one generator
/// each, over the same model.
#[derive(Debug)]
pub struct Generator {
	model: Arc<NGramModel>,
	rng: ChaCha8Rng,
	seed: u64,
	growth_limit: usize,
}

impl Generator {
	/// Creates a generator with a self-selected seed.
	///
	/// The seed is recorded and can be read back with [`Self::seed`], so a
	/// run can always be replayed later with [`Self::with_seed`].
	pub fn new(model: Arc<NGramModel>) -> Self {
		Self::with_seed(model, rand::rng().random())
	}

	/// Creates a generator with an explicit seed.
	pub fn with_seed(model: Arc<NGramModel>, seed: u64) -> Self {
		debug!(seed, "seeding generator");
		Self {
			model,
			rng: ChaCha8Rng::seed_from_u64(seed),
			seed,
			growth_limit: DEFAULT_GROWTH_LIMIT,
		}
	}

	/// The seed this generator was built with.
	pub fn seed(&self) -> u64 {
		self.seed
	}

	/// The shared model this generator reads from.
	pub fn model(&self) -> &NGramModel {
		&self.model
	}

	/// Sets the ceiling on word growth, in characters.
	///
	/// A model whose chains never reach a word-final extension would grow a
	/// word forever; at the ceiling the call fails with
	/// `GrowthLimitExceeded` instead.
	pub fn set_growth_limit(&mut self, limit: usize) {
		self.growth_limit = limit;
	}

	/// Generates a single word.
	///
	/// # Parameters
	/// - `input.length_hint`: soft stopping length; sampled from the model's
	///   word lengths when unset.
	/// - `input.position`: constrains the word start to a sentence position.
	/// - `input.start`: initial n-gram selection mode.
	///
	/// # Returns
	/// `Ok(None)` when the requested start has no match in the model: an
	/// unknown explicit n-gram, or a prefix with no candidate. That is a
	/// normal outcome, not an error, and callers composing sentences must
	/// treat it distinctly from a real word.
	///
	/// # Errors
	/// - `InvalidNGramLength` for an explicit n-gram of the wrong length
	/// - `InvalidPosition` for a zero or out-of-range position
	/// - `InvalidModelState` for a malformed model
	/// - `GrowthLimitExceeded` when the growth ceiling is hit
	pub fn word(&mut self, input: &WordInput) -> Result<Option<String>> {
		self.check_starting_ngram(&input.start)?;
		self.check_position(input.position)?;

		let model = Arc::clone(&self.model);

		// An unknown explicit n-gram is "no such continuation", not an error.
		if let WordStart::NGram(ngram) = &input.start {
			if model.element(ngram).is_none() {
				return Ok(None);
			}
		}

		let length_hint = match input.length_hint {
			Some(hint) => hint,
			None => *model.word_lengths().sample(&mut self.rng)?,
		};

		let ngram = match &input.start {
			WordStart::NGram(ngram) => ngram.clone(),
			WordStart::Prefix(prefix) => {
				match self.prefix_candidate(&model, prefix, input.position)? {
					Some(ngram) => ngram,
					None => return Ok(None),
				}
			}
			WordStart::Sampled => match input.position {
				Some(position) => positional_set(&model, position)?.sample(&mut self.rng)?.clone(),
				None => model.first_elements().sample(&mut self.rng)?.clone(),
			},
		};

		self.grow_word(&model, ngram, length_hint).map(Some)
	}

	/// Generates multiple independent words with the same parameters.
	///
	/// The count defaults to a draw from the sentence length distribution.
	/// Repeats are not excluded, and absent words are preserved as `None`.
	pub fn words(&mut self, number_of_words: Option<usize>, input: &WordInput) -> Result<Vec<Option<String>>> {
		let count = match number_of_words {
			Some(count) => count,
			None => self.sample_sentence_length()?,
		};

		let mut words = Vec::with_capacity(count);
		for _ in 0..count {
			words.push(self.word(input)?);
		}
		Ok(words)
	}

	/// Generates one sentence.
	///
	/// With positional data in the model, the outermost word slots are
	/// filled from the per-position distributions, counting inward from
	/// both sentence boundaries; the rest are unpositioned fillers. The
	/// first word honors `starts_with` when given. Words that come back
	/// absent are omitted from the assembly.
	///
	/// The result is space-joined, upper-cased on its first character, and
	/// closed with the resolved punctuation.
	pub fn sentence(
		&mut self,
		number_of_words: Option<usize>,
		starts_with: Option<&str>,
		ending: Option<&EndingPunctuation>,
	) -> Result<String> {
		let mut remaining = match number_of_words {
			Some(count) => count,
			None => self.sample_sentence_length()?,
		};

		let mut starting_words: Vec<Option<String>> = Vec::new();
		let mut ending_words: Vec<Option<String>> = Vec::new();

		let positioned = match self.model.number_of_sentence_elements() {
			0 => 0,
			max => max.min(remaining / 2),
		};

		for i in 1..=positioned {
			let start = match starts_with {
				Some(prefix) if i == 1 => WordStart::Prefix(prefix.to_owned()),
				_ => WordStart::Sampled,
			};
			starting_words.push(self.word(&WordInput {
				length_hint: None,
				position: Some(i as i32),
				start,
			})?);
			ending_words.push(self.word(&WordInput {
				length_hint: None,
				position: Some(i as i32 - (positioned as i32 + 1)),
				start: WordStart::Sampled,
			})?);
		}
		remaining -= positioned * 2;

		// Without positioned words the prefix falls through to the first
		// filler, so constrained sentences also work on flat models.
		let mut prefix_pending = if positioned == 0 { starts_with } else { None };

		let mut filler_words: Vec<Option<String>> = Vec::new();
		for _ in 0..remaining {
			let start = match prefix_pending.take() {
				Some(prefix) => WordStart::Prefix(prefix.to_owned()),
				None => WordStart::Sampled,
			};
			filler_words.push(self.word(&WordInput { length_hint: None, position: None, start })?);
		}

		let joined = starting_words
			.into_iter()
			.chain(filler_words)
			.chain(ending_words)
			.flatten()
			.collect::<Vec<_>>()
			.join(" ");

		let mut sentence = capitalize(&joined);
		let punctuation = self.pick_punctuation(ending);
		sentence.push_str(&punctuation);
		Ok(sentence)
	}

	/// Generates multiple sentences, each re-sampling its own word count.
	pub fn sentences(
		&mut self,
		number_of_sentences: Option<usize>,
		starts_with: Option<&str>,
		ending: Option<&EndingPunctuation>,
	) -> Result<Vec<String>> {
		let count = match number_of_sentences {
			Some(count) => count,
			None => self.sample_sentence_length()?,
		};

		let mut sentences = Vec::with_capacity(count);
		for _ in 0..count {
			sentences.push(self.sentence(None, starts_with, ending)?);
		}
		Ok(sentences)
	}

	/// Generates a paragraph: space-joined sentences.
	pub fn paragraph(
		&mut self,
		number_of_sentences: Option<usize>,
		ending: Option<&EndingPunctuation>,
	) -> Result<String> {
		Ok(self.sentences(number_of_sentences, None, ending)?.join(" "))
	}

	/// Generates multiple paragraphs.
	///
	/// There is no dedicated paragraph count distribution; the sentence
	/// length distribution stands in when the count is unset.
	pub fn paragraphs(
		&mut self,
		number_of_paragraphs: Option<usize>,
		number_of_sentences: Option<usize>,
		ending: Option<&EndingPunctuation>,
	) -> Result<Vec<String>> {
		let count = match number_of_paragraphs {
			Some(count) => count,
			None => self.sample_sentence_length()?,
		};

		let mut paragraphs = Vec::with_capacity(count);
		for _ in 0..count {
			paragraphs.push(self.paragraph(number_of_sentences, ending)?);
		}
		Ok(paragraphs)
	}

	/// Generates free text of an exact character length.
	///
	/// Sentences accumulate until their combined length exceeds the budget,
	/// then the space-joined text is cut to exactly `max_characters`
	/// characters. With a suffix, the cut leaves room for it so the total
	/// still lands on `max_characters`. An unset budget is derived as 100
	/// times a sentence length draw.
	pub fn text(
		&mut self,
		max_characters: Option<usize>,
		ending: Option<&EndingPunctuation>,
		suffix: Option<&str>,
	) -> Result<String> {
		let max_characters = match max_characters {
			Some(max) => max,
			None => 100 * self.sample_sentence_length()?,
		};

		let mut sentences = Vec::new();
		let mut accumulated = 0;
		while accumulated <= max_characters {
			let word_count = self.sample_word_length()?;
			let sentence = self.sentence(Some(word_count), None, ending)?;
			accumulated += sentence.chars().count();
			sentences.push(sentence);
		}

		let joined = sentences.join(" ");
		Ok(match suffix {
			Some(suffix) => {
				let keep = max_characters.saturating_sub(suffix.chars().count());
				let mut text: String = joined.chars().take(keep).collect();
				text.push_str(suffix);
				text
			}
			None => joined.chars().take(max_characters).collect(),
		})
	}

	/// Generates a poem: newline-joined verses with optional stanza breaks.
	///
	/// A blank line follows every `stanza_length`-th verse except the last;
	/// a zero or unset stanza length produces a single block.
	pub fn poem(
		&mut self,
		number_of_verses: Option<usize>,
		stanza_length: Option<usize>,
		max_words_per_verse: Option<usize>,
		ending: Option<&EndingPunctuation>,
	) -> Result<String> {
		let verses = match number_of_verses {
			Some(count) => count,
			None => self.sample_sentence_length()?,
		};
		let stanza_length = stanza_length.unwrap_or(0);

		let mut lines = Vec::new();
		for verse in 1..=verses {
			let words = self.verse_word_count(max_words_per_verse)?;
			lines.push(self.sentence(words, None, ending)?);
			if stanza_length > 0 && verse % stanza_length == 0 && verse != verses {
				lines.push(String::new());
			}
		}
		Ok(lines.join("\n"))
	}

	/// Generates an acrostic poem: one verse per character of `initials`.
	///
	/// A space produces a blank verse line; any other character constrains
	/// the verse's first word through a lowercased prefix search. An initial
	/// with no matching n-gram leaves its verse one word short.
	pub fn acrostic_poem(
		&mut self,
		initials: &str,
		max_words_per_verse: Option<usize>,
		ending: Option<&EndingPunctuation>,
	) -> Result<String> {
		let mut lines = Vec::new();
		for initial in initials.chars() {
			if initial == ' ' {
				lines.push(String::new());
				continue;
			}
			let prefix: String = initial.to_lowercase().collect();
			let words = self.verse_word_count(max_words_per_verse)?;
			lines.push(self.sentence(words, Some(&prefix), ending)?);
		}
		Ok(lines.join("\n"))
	}

	/// Grows `ngram` one character at a time until a terminal extension.
	///
	/// The length hint is soft: growth continues past it until an element
	/// with word-final continuations is reached, and stops early when an
	/// element has no continuations at all.
	fn grow_word(&mut self, model: &NGramModel, ngram: String, length_hint: usize) -> Result<String> {
		let mut element = model
			.element(&ngram)
			.ok_or(GeneratorError::InvalidModelState("n-gram missing from the element table"))?;
		let mut word = ngram;
		let mut word_len = word.chars().count();

		loop {
			let children = element.children();
			let last_children = element.last_children();

			if children.is_empty() || (word_len >= length_hint && !last_children.is_empty()) {
				// The only exit point: take a word-final extension if any.
				if !last_children.is_empty() {
					let last = last_children.sample(&mut self.rng)?;
					push_final_char(&mut word, last);
				}
				return Ok(word);
			}

			if word_len >= self.growth_limit {
				warn!(limit = self.growth_limit, "word growth hit the ceiling");
				return Err(GeneratorError::GrowthLimitExceeded { limit: self.growth_limit });
			}

			let next = children.sample(&mut self.rng)?.clone();
			push_final_char(&mut word, &next);
			word_len += 1;
			element = model
				.element(&next)
				.ok_or(GeneratorError::InvalidModelState("n-gram missing from the element table"))?;
		}
	}

	/// Uniform choice among source n-grams starting with `prefix`.
	///
	/// The prefix search narrows to a pool where the original frequency
	/// weights are not preserved, so the choice is deliberately unweighted.
	fn prefix_candidate(
		&mut self,
		model: &NGramModel,
		prefix: &str,
		position: Option<i32>,
	) -> Result<Option<String>> {
		let source = match position {
			Some(position) => positional_set(model, position)?,
			None => model.first_elements(),
		};
		Ok(source
			.values()
			.filter(|ngram| ngram.starts_with(prefix))
			.choose(&mut self.rng)
			.cloned())
	}

	/// Resolves the sentence-final punctuation, drawing uniformly for sets.
	fn pick_punctuation(&mut self, ending: Option<&EndingPunctuation>) -> String {
		let default = EndingPunctuation::default();
		match ending.unwrap_or(&default) {
			EndingPunctuation::Fixed(punctuation) => punctuation.clone(),
			EndingPunctuation::OneOf(choices) => {
				choices.iter().choose(&mut self.rng).cloned().unwrap_or_default()
			}
		}
	}

	fn sample_sentence_length(&mut self) -> Result<usize> {
		let Self { model, rng, .. } = self;
		Ok(*model.sentence_lengths().sample(rng)?)
	}

	fn sample_word_length(&mut self) -> Result<usize> {
		let Self { model, rng, .. } = self;
		Ok(*model.word_lengths().sample(rng)?)
	}

	/// Word count for one verse: sampled, optionally capped.
	fn verse_word_count(&mut self, max_words_per_verse: Option<usize>) -> Result<Option<usize>> {
		match max_words_per_verse {
			Some(max) => Ok(Some(self.sample_sentence_length()?.min(max))),
			None => Ok(None),
		}
	}

	fn check_starting_ngram(&self, start: &WordStart) -> Result<()> {
		if let WordStart::NGram(ngram) = start {
			let actual = ngram.chars().count();
			let expected = self.model.n();
			if actual != expected {
				return Err(GeneratorError::InvalidNGramLength { expected, actual });
			}
		}
		Ok(())
	}

	fn check_position(&self, position: Option<i32>) -> Result<()> {
		let max = self.model.number_of_sentence_elements();
		match position {
			Some(position) if position == 0 || position.unsigned_abs() as usize > max => {
				Err(GeneratorError::InvalidPosition { position, max })
			}
			_ => Ok(()),
		}
	}
}

/// Word-start distribution for a validated position.
fn positional_set(model: &NGramModel, position: i32) -> Result<&WeightedSet<String>> {
	model
		.sentence_element(position)
		.ok_or(GeneratorError::InvalidModelState("missing sentence position distribution"))
}

/// Appends the final character of `ngram` to `word`.
fn push_final_char(word: &mut String, ngram: &str) {
	if let Some(character) = ngram.chars().last() {
		word.push(character);
	}
}

/// Upper-cases the first character, UTF-8 aware.
fn capitalize(sentence: &str) -> String {
	let mut chars = sentence.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn capitalize_upper_cases_only_the_first_character() {
		assert_eq!(capitalize("hello there"), "Hello there");
		assert_eq!(capitalize("éclair"), "Éclair");
		assert_eq!(capitalize(""), "");
	}

	#[test]
	fn push_final_char_appends_the_last_character() {
		let mut word = "the".to_owned();
		push_final_char(&mut word, "hem");
		assert_eq!(word, "them");
	}
}

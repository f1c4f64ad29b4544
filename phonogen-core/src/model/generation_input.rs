/// Strategy used to select a word's initial n-gram.
///
/// # Variants
/// - `Sampled`: weighted-sample from the model (the positional distribution
///   when a position is set, the global word-start distribution otherwise).
/// - `NGram(String)`: use the given n-gram verbatim; an n-gram the model
///   does not know yields no word.
/// - `Prefix(String)`: uniform choice among the source n-grams beginning
///   with the given prefix; no match yields no word.
///
/// The two explicit modes are mutually exclusive by construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum WordStart {
	#[default]
	Sampled,
	NGram(String),
	Prefix(String),
}

/// Parameters for a single word generation.
///
/// Plain data with public fields; build one with `Default` and set what
/// you need.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WordInput {
	/// Soft stopping length, in characters. Sampled from the model's word
	/// length distribution when unset. The generated word may run past the
	/// hint until a word-final extension is reachable.
	pub length_hint: Option<usize>,

	/// Sentence position: `1..=N` counts from the sentence start, `-1..=-N`
	/// from the sentence end, where `N` is the model's configured number of
	/// sentence elements.
	pub position: Option<i32>,

	/// Initial n-gram selection mode.
	pub start: WordStart,
}

/// Sentence-final punctuation policy.
///
/// The default draws uniformly from `.`, `!` and `?`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EndingPunctuation {
	/// Always this exact string.
	Fixed(String),
	/// One member chosen uniformly per sentence.
	OneOf(Vec<String>),
}

impl Default for EndingPunctuation {
	fn default() -> Self {
		Self::OneOf(vec![".".to_owned(), "!".to_owned(), "?".to_owned()])
	}
}

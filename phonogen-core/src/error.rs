use thiserror::Error;

/// Errors surfaced by the generation engine.
///
/// "No matching data" conditions (an unknown starting n-gram, a prefix with
/// no candidate) are not errors: they come back as `Ok(None)`. Every variant
/// here is a contract violation, either by the caller or by the collaborator
/// that built the model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
	/// An explicit starting n-gram does not match the model's n-gram size.
	#[error("starting n-gram must be {expected} characters for this model, got {actual}")]
	InvalidNGramLength { expected: usize, actual: usize },

	/// A word position is zero or outside the model's positional range.
	#[error("position must be within -{max}..=-1 or 1..={max}, got {position}")]
	InvalidPosition { position: i32, max: usize },

	/// The model violates its read contract: an empty distribution was
	/// sampled, an element entry is missing, or a build parameter is invalid.
	#[error("invalid model state: {0}")]
	InvalidModelState(&'static str),

	/// Word growth hit the defensive ceiling; the model chains never reach
	/// a terminal element.
	#[error("word generation exceeded the growth limit of {limit} characters")]
	GrowthLimitExceeded { limit: usize },
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, GeneratorError>;

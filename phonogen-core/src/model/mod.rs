//! Top-level module for the n-gram generation system.
//!
//! This module exposes the full generation pipeline:
//! - Discrete weighted distributions (`WeightedSet`)
//! - The read-only statistical model (`NGramModel`, `NGramElement`)
//! - Generation parameters (`WordInput`, `WordStart`, `EndingPunctuation`)
//! - The high-level generation interface (`Generator`)

/// Generation parameter structures.
///
/// Word start modes and sentence punctuation policies passed into the
/// generator's public operations.
pub mod generation_input;

/// High-level interface generating words, sentences, paragraphs, free text
/// and poems from a shared read-only model.
pub mod generator;

/// Read-only n-gram model structures consumed by the generator.
///
/// Built once by an external trainer, then shared immutably.
pub mod ngram_model;

/// Discrete weighted distributions.
///
/// Cumulative-weight representation with logarithmic sampling.
pub mod weighted_set;

//! Phonetically-plausible text generation from character n-gram models.
//!
//! This crate is the generation half of an n-gram language toolchain:
//! - Weighted random sampling over cumulative-weight distributions
//! - Word assembly by chaining n-gram lookups through a read-only model
//! - Sentence, paragraph, free-text and poem composition on top of words
//!
//! Models are produced by an external trainer and only read here. A
//! [`model::generator::Generator`] owns its seeded PRNG, so identically
//! seeded generators over the same model replay identical output.

/// Core model structures and generation logic.
pub mod model;

/// Typed errors shared by every generation operation.
pub mod error;

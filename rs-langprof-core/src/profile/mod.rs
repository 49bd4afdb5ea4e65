//! Top-level module for the profile construction pipeline.
//!
//! Data flows through the submodules in this order:
//! - Corpus normalization (`normalizer`)
//! - Padded n-gram extraction (`ngram`)
//! - Ordered frequency counting per length bucket (`frequency`)
//! - Top-K ranking (`ranking`)
//! - Profile assembly and serialization (`lang_profile`)
//! - The driving pipeline (`builder`)

/// Decoding, lowercasing and punctuation/digit stripping of a corpus.
pub mod normalizer;

/// Lazy extraction of padded character n-grams.
pub mod ngram;

/// First-seen ordered frequency tables and length bucketing.
pub mod frequency;

/// Stable top-K selection over a frequency table.
pub mod ranking;

/// The assembled profile and its JSON / binary encodings.
pub mod lang_profile;

/// High-level pipeline wiring every stage from a `BuilderConfig`.
///
/// Handles single-language builds, corpus directories and multi-language
/// runs (sequential or on a worker pool).
pub mod builder;

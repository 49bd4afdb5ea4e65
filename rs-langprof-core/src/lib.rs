//! Character n-gram language profile builder.
//!
//! This crate builds Cavnar–Trenkle style language profiles from raw text:
//! - Corpus normalization (lowercase, punctuation and digit stripping)
//! - Padded character n-gram extraction
//! - First-seen ordered frequency counting, bucketed by gram length
//! - Per-length top-K ranking
//! - Profile assembly and (de)serialization (JSON and postcard)
//!
//! The high-level entry point is [`profile::builder::ProfileBuilder`].

/// Pipeline stages and the assembled profile.
pub mod profile;

/// Builder configuration (languages, top-K, n-gram length, output).
pub mod config;

/// Error types shared by the pipeline stages.
pub mod error;

/// I/O utilities (corpus reading, output paths, atomic writes).
pub mod io;

pub use config::BuilderConfig;
pub use error::ProfileError;
pub use profile::builder::ProfileBuilder;
pub use profile::lang_profile::Profile;

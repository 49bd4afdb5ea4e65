//! Builder configuration.
//!
//! Everything the pipeline would otherwise read from process-wide constants
//! (languages, `top_k`, maximum n-gram length, output location) lives in a
//! [`BuilderConfig`] passed to [`crate::ProfileBuilder`]. The configuration
//! can be written by hand or loaded from a TOML file:
//!
//! ```toml
//! top_k = 300
//! max_ngram_length = 3
//! output_dir = "datasets/generated"
//!
//! [[languages]]
//! code = "sah"
//! corpus = "datasets/downloads/sah"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::frequency::BucketPolicy;
use crate::profile::lang_profile::ProfileFormat;

/// Default number of grams kept per length.
pub const DEFAULT_TOP_K: usize = 300;

/// Default maximum n-gram length.
pub const DEFAULT_MAX_NGRAM: usize = 3;

/// Largest accepted `max_ngram_length`.
pub const MAX_NGRAM_LIMIT: usize = 8;

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
	/// File I/O error
	#[error("Failed to read config: {0}")]
	Io(#[from] std::io::Error),
	/// TOML parsing error
	#[error("Failed to parse config: {0}")]
	Parse(#[from] toml::de::Error),
	/// Validation error
	#[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
	Validation(Vec<String>),
}

/// One language to build: its code and the directory holding its corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSource {
	/// Language code (ISO 639-1 or 639-3). Stored lowercase in the profile.
	pub code: String,
	/// Directory containing the language's text files.
	pub corpus: PathBuf,
}

impl LanguageSource {
	pub fn new(code: &str, corpus: impl Into<PathBuf>) -> Self {
		Self { code: code.to_owned(), corpus: corpus.into() }
	}
}

/// Parameters of a profile build run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
	/// Languages to build, in processing order.
	pub languages: Vec<LanguageSource>,
	/// Number of grams kept per length.
	pub top_k: usize,
	/// Longest n-gram extracted (also sets the padding width).
	pub max_ngram_length: usize,
	/// How grams are assigned to length buckets.
	pub bucket_policy: BucketPolicy,
	/// Directory receiving the generated profiles.
	pub output_dir: PathBuf,
	/// Appended to the language code to form the output file stem.
	pub file_suffix: String,
	/// Output encoding.
	pub format: ProfileFormat,
	/// Only read corpus files with this extension (all files if `None`).
	pub corpus_extension: Option<String>,
	/// Worker threads for multi-language runs (`0` = one per CPU).
	pub jobs: usize,
}

impl Default for BuilderConfig {
	fn default() -> Self {
		Self {
			languages: Vec::new(),
			top_k: DEFAULT_TOP_K,
			max_ngram_length: DEFAULT_MAX_NGRAM,
			bucket_policy: BucketPolicy::default(),
			output_dir: PathBuf::from("./datasets/generated"),
			file_suffix: "_generated".to_owned(),
			format: ProfileFormat::default(),
			corpus_extension: None,
			jobs: 1,
		}
	}
}

impl BuilderConfig {
	/// Parses a configuration from TOML text and validates it.
	pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
		let config: BuilderConfig = toml::from_str(content)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads and validates a TOML configuration file.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
		let content = fs::read_to_string(path)?;
		Self::from_toml(&content)
	}

	/// Checks every field and reports all problems at once.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let mut errors = Vec::new();

		if self.top_k == 0 {
			errors.push("top_k must be at least 1".to_owned());
		}
		if self.max_ngram_length == 0 {
			errors.push("max_ngram_length must be at least 1".to_owned());
		} else if self.max_ngram_length > MAX_NGRAM_LIMIT {
			errors.push(format!(
				"max_ngram_length must be at most {}, got {}",
				MAX_NGRAM_LIMIT, self.max_ngram_length
			));
		}

		let mut seen = HashSet::new();
		for language in &self.languages {
			let code = language.code.trim().to_lowercase();
			if code.is_empty() {
				errors.push(format!("language with corpus {} has an empty code", language.corpus.display()));
			} else if !seen.insert(code.clone()) {
				errors.push(format!("language '{}' is listed more than once", code));
			}
		}

		if errors.is_empty() {
			Ok(())
		} else {
			Err(ConfigError::Validation(errors))
		}
	}

	/// Effective worker count for a run over `languages` languages.
	pub fn worker_count(&self, languages: usize) -> usize {
		let jobs = if self.jobs == 0 { num_cpus::get() } else { self.jobs };
		jobs.clamp(1, languages.max(1))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_reference_constants() {
		let config = BuilderConfig::default();
		assert_eq!(config.top_k, 300);
		assert_eq!(config.max_ngram_length, 3);
		assert_eq!(config.file_suffix, "_generated");
		assert_eq!(config.bucket_policy, BucketPolicy::Trimmed);
		assert_eq!(config.format, ProfileFormat::Json);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn parses_toml_with_defaults() {
		let config = BuilderConfig::from_toml(
			r#"
			top_k = 50
			bucket_policy = "raw"

			[[languages]]
			code = "sah"
			corpus = "datasets/downloads/sah"
			"#,
		)
		.unwrap();

		assert_eq!(config.top_k, 50);
		assert_eq!(config.max_ngram_length, 3);
		assert_eq!(config.bucket_policy, BucketPolicy::Raw);
		assert_eq!(config.languages, vec![LanguageSource::new("sah", "datasets/downloads/sah")]);
	}

	#[test]
	fn validation_collects_every_problem() {
		let config = BuilderConfig {
			top_k: 0,
			max_ngram_length: 0,
			languages: vec![
				LanguageSource::new("uz", "a"),
				LanguageSource::new("UZ", "b"),
				LanguageSource::new(" ", "c"),
			],
			..BuilderConfig::default()
		};

		match config.validate() {
			Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 4),
			other => panic!("expected validation errors, got {:?}", other),
		}
	}

	#[test]
	fn validation_bounds_max_ngram_length() {
		for max_ngram_length in [MAX_NGRAM_LIMIT + 1, usize::MAX] {
			let config = BuilderConfig { max_ngram_length, top_k: 0, ..BuilderConfig::default() };
			match config.validate() {
				Err(ConfigError::Validation(errors)) => {
					assert_eq!(errors.len(), 2);
					assert!(errors[1].contains("at most 8"), "{:?}", errors);
				}
				other => panic!("expected validation errors, got {:?}", other),
			}
		}

		let widest = BuilderConfig { max_ngram_length: MAX_NGRAM_LIMIT, ..BuilderConfig::default() };
		assert!(widest.validate().is_ok());
		assert!(matches!(
			BuilderConfig::from_toml("max_ngram_length = 64"),
			Err(ConfigError::Validation(_))
		));
	}

	#[test]
	fn rejects_malformed_toml() {
		assert!(matches!(BuilderConfig::from_toml("top_k = \"many\""), Err(ConfigError::Parse(_))));
	}

	#[test]
	fn worker_count_is_bounded_by_languages() {
		let config = BuilderConfig { jobs: 8, ..BuilderConfig::default() };
		assert_eq!(config.worker_count(3), 3);
		assert_eq!(config.worker_count(0), 1);

		let auto = BuilderConfig { jobs: 0, ..BuilderConfig::default() };
		assert!(auto.worker_count(64) >= 1);
	}
}

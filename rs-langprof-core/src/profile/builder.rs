use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use super::frequency::aggregate;
use super::lang_profile::Profile;
use super::ngram::PaddedText;
use super::normalizer::normalize_corpus;
use super::ranking::{top_k, RankedGrams};
use crate::config::{BuilderConfig, LanguageSource};
use crate::error::Result;
use crate::io;

/// Result of building and writing one language.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
	/// Where the profile was written.
	pub path: PathBuf,
	/// The written profile.
	pub profile: Profile,
}

/// Per-language entry of a [`ProfileBuilder::run`].
#[derive(Debug)]
pub struct LanguageReport {
	pub code: String,
	pub outcome: Result<BuildOutcome>,
}

/// Builds language profiles according to a [`BuilderConfig`].
///
/// # Responsibilities
/// - Run the pipeline (normalize, extract, aggregate, rank, assemble) on a corpus
/// - Read corpora from directories and write profiles to the output directory
/// - Process every configured language, optionally on several threads
///
/// Every call works on fresh tables; nothing is shared between languages.
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
	config: BuilderConfig,
}

impl ProfileBuilder {
	/// Creates a builder from a validated configuration.
	///
	/// # Errors
	/// Returns [`crate::ProfileError::Config`] if the configuration is invalid.
	pub fn new(config: BuilderConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self { config })
	}

	/// Builds the profile of one language from an in-memory corpus.
	///
	/// The corpus order matters only for tie-breaking among equal counts.
	/// An empty corpus gives an empty profile with zero totals.
	///
	/// # Errors
	/// Fails with [`crate::ProfileError::Encoding`] if a document is not UTF-8.
	pub fn build<D: AsRef<[u8]>>(&self, code: &str, corpus: &[D]) -> Result<Profile> {
		let max_n = self.config.max_ngram_length;

		let text = normalize_corpus(corpus)?;
		let padded = PaddedText::new(&text, max_n);
		let tables = aggregate(padded.ngrams(), max_n, self.config.bucket_policy);
		let ranked: Vec<RankedGrams> = tables.iter().map(|table| top_k(table, self.config.top_k)).collect();

		log::debug!(
			"{}: {} documents, {} padded chars, distinct grams per length {:?}",
			code,
			corpus.len(),
			padded.len(),
			tables.iter().map(|t| t.len()).collect::<Vec<_>>()
		);

		Profile::assemble(code, &ranked, &tables)
	}

	/// Reads a corpus directory and builds its profile.
	pub fn build_from_dir<P: AsRef<Path>>(&self, code: &str, dir: P) -> Result<Profile> {
		let corpus = io::read_corpus(dir, self.config.corpus_extension.as_deref())?;
		self.build(code, &corpus)
	}

	/// Output path of a language: `<output_dir>/<code><suffix>.<ext>`.
	pub fn output_path(&self, code: &str) -> PathBuf {
		io::build_output_path(
			&self.config.output_dir,
			&code.to_lowercase(),
			&self.config.file_suffix,
			self.config.format.extension(),
		)
	}

	/// Writes a profile to its output path and returns that path.
	pub fn write(&self, profile: &Profile) -> Result<PathBuf> {
		let path = self.output_path(profile.name());
		profile.save(&path, self.config.format)?;
		Ok(path)
	}

	/// Builds and writes every configured language.
	///
	/// Languages fail independently: an error is reported in that
	/// language's entry and the others are still processed. Reports follow
	/// the configuration order whatever the number of workers.
	pub fn run(&self) -> Vec<LanguageReport> {
		let languages = &self.config.languages;
		let workers = self.config.worker_count(languages.len());

		if workers <= 1 {
			return languages.iter().map(|source| self.report(source)).collect();
		}

		log::info!("Building {} profiles on {} workers", languages.len(), workers);

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for worker in 0..workers {
				let tx = tx.clone();
				scope.spawn(move || {
					for (index, source) in languages.iter().enumerate().skip(worker).step_by(workers) {
						if tx.send((index, self.report(source))).is_err() {
							break;
						}
					}
				});
			}
		});
		drop(tx);

		let mut reports: Vec<Option<LanguageReport>> = languages.iter().map(|_| None).collect();
		for (index, report) in rx.iter() {
			reports[index] = Some(report);
		}
		reports.into_iter().flatten().collect()
	}

	fn report(&self, source: &LanguageSource) -> LanguageReport {
		let outcome = self.process(source);
		match &outcome {
			Ok(done) => log::info!("Generated profile for {} and saved to {}", source.code, done.path.display()),
			Err(e) => log::warn!("Failed to build profile for {}: {}", source.code, e),
		}
		LanguageReport { code: source.code.clone(), outcome }
	}

	fn process(&self, source: &LanguageSource) -> Result<BuildOutcome> {
		let profile = self.build_from_dir(&source.code, &source.corpus)?;
		let path = self.write(&profile)?;
		Ok(BuildOutcome { path, profile })
	}
}

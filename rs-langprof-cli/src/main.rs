//! `langprof` - builds character n-gram language profiles from corpus directories.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use rs_langprof_core::config::LanguageSource;
use rs_langprof_core::io::normalize_folder;
use rs_langprof_core::profile::frequency::BucketPolicy;
use rs_langprof_core::profile::lang_profile::ProfileFormat;
use rs_langprof_core::{BuilderConfig, Profile, ProfileBuilder};

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;
const EXIT_INVALID_ARGS: u8 = 2;

/// Build and inspect n-gram language profiles
#[derive(Parser)]
#[command(name = "langprof")]
#[command(version)]
struct Cli {
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Build one profile per language and write it to the output directory
	Build {
		/// TOML configuration file
		#[arg(short, long)]
		config: Option<PathBuf>,

		/// Language to build, as CODE=CORPUS_DIR (repeatable, added to the config's languages)
		#[arg(short, long = "lang", value_parser = parse_language)]
		languages: Vec<LanguageSource>,

		/// Output directory
		#[arg(short, long)]
		out: Option<String>,

		/// Grams kept per length
		#[arg(long)]
		top_k: Option<usize>,

		/// Longest n-gram extracted
		#[arg(long)]
		max_ngram: Option<usize>,

		/// Length bucketing: trimmed, trimmed-skip-blank or raw
		#[arg(long, value_parser = parse_bucket_policy)]
		bucket_policy: Option<BucketPolicy>,

		/// Output format: json or binary
		#[arg(long, value_parser = parse_format)]
		format: Option<ProfileFormat>,

		/// Only read corpus files with this extension
		#[arg(long)]
		extension: Option<String>,

		/// Worker threads (0 = one per CPU)
		#[arg(short, long)]
		jobs: Option<usize>,
	},
	/// Print a summary of a written profile
	Inspect {
		/// Profile file (.json or .bin)
		profile: PathBuf,

		/// Number of grams to list per length
		#[arg(long, default_value = "20")]
		top: usize,
	},
}

fn parse_language(value: &str) -> Result<LanguageSource, String> {
	match value.split_once('=') {
		Some((code, dir)) if !code.trim().is_empty() && !dir.is_empty() => {
			Ok(LanguageSource::new(code.trim(), normalize_folder(dir)))
		}
		_ => Err(format!("expected CODE=CORPUS_DIR, got '{}'", value)),
	}
}

fn parse_bucket_policy(value: &str) -> Result<BucketPolicy, String> {
	match value {
		"trimmed" => Ok(BucketPolicy::Trimmed),
		"trimmed-skip-blank" => Ok(BucketPolicy::TrimmedSkipBlank),
		"raw" => Ok(BucketPolicy::Raw),
		other => Err(format!("unknown bucket policy '{}'", other)),
	}
}

fn parse_format(value: &str) -> Result<ProfileFormat, String> {
	match value {
		"json" => Ok(ProfileFormat::Json),
		"binary" | "bin" => Ok(ProfileFormat::Binary),
		other => Err(format!("unknown format '{}'", other)),
	}
}

fn main() -> ExitCode {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let cli = Cli::parse();
	let code = match cli.command {
		Commands::Build { config, languages, out, top_k, max_ngram, bucket_policy, format, extension, jobs } => {
			let mut builder_config = match config {
				Some(path) => match BuilderConfig::load(&path) {
					Ok(c) => c,
					Err(e) => {
						log::error!("{}: {}", path.display(), e);
						return ExitCode::from(EXIT_INVALID_ARGS);
					}
				},
				None => BuilderConfig::default(),
			};

			builder_config.languages.extend(languages);
			if let Some(out) = out {
				builder_config.output_dir = normalize_folder(&out);
			}
			if let Some(top_k) = top_k {
				builder_config.top_k = top_k;
			}
			if let Some(max_ngram) = max_ngram {
				builder_config.max_ngram_length = max_ngram;
			}
			if let Some(bucket_policy) = bucket_policy {
				builder_config.bucket_policy = bucket_policy;
			}
			if let Some(format) = format {
				builder_config.format = format;
			}
			if extension.is_some() {
				builder_config.corpus_extension = extension;
			}
			if let Some(jobs) = jobs {
				builder_config.jobs = jobs;
			}

			run_build(builder_config)
		}
		Commands::Inspect { profile, top } => run_inspect(&profile, top),
	};

	ExitCode::from(code)
}

fn run_build(config: BuilderConfig) -> u8 {
	if config.languages.is_empty() {
		log::error!("No language to build: pass --lang CODE=DIR or list languages in --config");
		return EXIT_INVALID_ARGS;
	}

	let builder = match ProfileBuilder::new(config) {
		Ok(b) => b,
		Err(e) => {
			log::error!("{}", e);
			return EXIT_INVALID_ARGS;
		}
	};

	let reports = builder.run();
	let failed = reports.iter().filter(|r| r.outcome.is_err()).count();
	for report in &reports {
		match &report.outcome {
			Ok(done) => println!("{}\t{} grams\t{}", report.code, done.profile.len(), done.path.display()),
			Err(e) => println!("{}\tfailed\t{}", report.code, e),
		}
	}

	if failed > 0 {
		log::error!("{} of {} profiles failed", failed, reports.len());
		EXIT_ERROR
	} else {
		EXIT_SUCCESS
	}
}

fn run_inspect(path: &Path, top: usize) -> u8 {
	let profile = match Profile::load(path) {
		Ok(p) => p,
		Err(e) => {
			log::error!("{}: {}", path.display(), e);
			return EXIT_ERROR;
		}
	};

	println!("name:    {}", profile.name());
	println!("n_words: {:?}", profile.n_words());
	println!("grams:   {}", profile.len());
	for length in 1..=profile.n_words().len() {
		let grams = profile.top_of_length(length, top);
		if grams.is_empty() {
			continue;
		}
		println!("{}-grams:", length);
		for (gram, count) in grams {
			println!("{:>8}  {:?}", count, gram);
		}
	}

	EXIT_SUCCESS
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::CommandFactory;

	#[test]
	fn cli_definition_is_valid() {
		Cli::command().debug_assert();
	}

	#[test]
	fn parses_language_pairs() {
		let source = parse_language("sah=datasets/downloads/sah").unwrap();
		assert_eq!(source, LanguageSource::new("sah", "datasets/downloads/sah"));
		assert!(parse_language("sah").is_err());
		assert!(parse_language("=dir").is_err());
	}

	#[test]
	fn parses_build_overrides() {
		let cli = Cli::try_parse_from([
			"langprof", "build", "--lang", "uz=corpus/uz", "--lang", "tg=corpus/tg",
			"--top-k", "100", "--bucket-policy", "raw", "--format", "binary", "-j", "2",
		])
		.unwrap();

		match cli.command {
			Commands::Build { languages, top_k, bucket_policy, format, jobs, .. } => {
				assert_eq!(languages.len(), 2);
				assert_eq!(top_k, Some(100));
				assert_eq!(bucket_policy, Some(BucketPolicy::Raw));
				assert_eq!(format, Some(ProfileFormat::Binary));
				assert_eq!(jobs, Some(2));
			}
			_ => panic!("expected build"),
		}
	}

	#[test]
	fn rejects_unknown_policy() {
		assert!(Cli::try_parse_from(["langprof", "build", "--bucket-policy", "weird"]).is_err());
	}
}

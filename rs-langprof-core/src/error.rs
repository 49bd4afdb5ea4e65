use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised while building, writing or reading a profile.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProfileError {
	/// A corpus document is not valid UTF-8.
	#[error("document {document} is not valid UTF-8 (valid up to byte {valid_up_to})")]
	Encoding { document: usize, valid_up_to: usize },

	/// Reading a corpus or writing a profile failed.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON (de)serialization failed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// Binary (postcard) (de)serialization failed.
	#[error("binary encoding error: {0}")]
	Binary(#[from] postcard::Error),

	/// The same gram was ranked under two different lengths.
	#[error("gram {0:?} appears in more than one length bucket")]
	Overlap(String),

	/// The builder configuration is unusable.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, ProfileError>;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::{env, ffi::OsStr};

use tempfile::NamedTempFile;

/// Reads every file of a corpus directory as raw bytes.
///
/// - Files are returned in file-name order, so a given directory always
///   yields the same corpus (top-K tie-breaking depends on it)
/// - Bytes are not decoded here; the normalizer reports invalid UTF-8
pub fn read_corpus<P: AsRef<Path>>(dir: P, extension: Option<&str>) -> io::Result<Vec<Vec<u8>>> {
	let dir = dir.as_ref();
	let files = list_files(dir, extension)?;
	log::debug!("Reading {} corpus files from {}", files.len(), dir.display());

	files
		.iter()
		.map(|name| fs::read(dir.join(name)))
		.collect()
}

/// Builds the output path of a profile.
///
/// Example:
/// `datasets/generated` + `"sah"` + `"_generated"` + `"json"` → `datasets/generated/sah_generated.json`
pub fn build_output_path<P: AsRef<Path>>(
	output_dir: P,
	code: &str,
	suffix: &str,
	extension: &str,
) -> PathBuf {
	let mut output = output_dir.as_ref().join(format!("{}{}", code, suffix));
	output.set_extension(extension);
	output
}

/// Resolves a directory given on the command line (`--out DIR` or the
/// corpus half of `--lang CODE=DIR`).
///
/// `.` and `./` resolve to the current directory. Anything else is kept as
/// typed and may name a directory that does not exist yet.
pub fn normalize_folder(input: &str) -> PathBuf {
	match input {
		"." | "./" => env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
		other => PathBuf::from(other),
	}
}

/// Lists the regular files of a directory, sorted by name.
///
/// Returns file names only (no paths). With `Some(extension)` only files
/// carrying that extension are listed. Subdirectories are ignored.
pub fn list_files<P: AsRef<Path>>(dir: P, extension: Option<&str>) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		if !path.is_file() {
			continue;
		}
		if let Some(extension) = extension {
			if path.extension() != Some(OsStr::new(extension)) {
				continue;
			}
		}
		if let Some(name) = path.file_name() {
			files.push(name.to_string_lossy().to_string());
		}
	}

	files.sort();
	Ok(files)
}

/// Writes `bytes` to `path` atomically.
///
/// The parent directory is created if needed. Data goes to a temporary file
/// next to the target which is then renamed over it, so a failed write
/// never leaves a partial profile behind.
pub fn write_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> io::Result<()> {
	let path = path.as_ref();
	let parent = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	fs::create_dir_all(parent)?;

	let mut temp_file = NamedTempFile::new_in(parent)?;
	temp_file.write_all(bytes)?;
	temp_file.flush()?;
	temp_file.persist(path).map_err(|e| e.error)?;
	Ok(())
}

use crate::error::{ProfileError, Result};

/// Separator inserted between two documents of a corpus.
pub const DOCUMENT_SEPARATOR: char = '\n';

/// Decodes a corpus and joins its documents into one string.
///
/// - Every document must be valid UTF-8, no lossy replacement is done
/// - Empty documents are skipped
/// - Documents are separated by [`DOCUMENT_SEPARATOR`]
///
/// # Errors
/// Returns [`ProfileError::Encoding`] for the first undecodable document.
pub fn decode_corpus<D: AsRef<[u8]>>(documents: &[D]) -> Result<String> {
	let mut text = String::new();

	for (index, document) in documents.iter().enumerate() {
		let document = std::str::from_utf8(document.as_ref()).map_err(|e| ProfileError::Encoding {
			document: index,
			valid_up_to: e.valid_up_to(),
		})?;
		if document.is_empty() {
			continue;
		}
		if !text.is_empty() {
			text.push(DOCUMENT_SEPARATOR);
		}
		text.push_str(document);
	}

	Ok(text)
}

/// Cleans a text.
///
/// Steps, each applied to the output of the previous one:
/// 1. Lowercase
/// 2. Every run of ASCII punctuation becomes a single space
/// 3. ASCII digits are deleted
pub fn clean_text(text: &str) -> String {
	let lowered = text.to_lowercase();
	let without_punctuation = strip_punctuation(&lowered);
	strip_numeric(&without_punctuation)
}

/// Decodes, joins and cleans a corpus.
pub fn normalize_corpus<D: AsRef<[u8]>>(documents: &[D]) -> Result<String> {
	let text = decode_corpus(documents)?;
	Ok(clean_text(&text))
}

fn strip_punctuation(text: &str) -> String {
	let mut result = String::with_capacity(text.len());
	let mut in_run = false;

	for c in text.chars() {
		if c.is_ascii_punctuation() {
			if !in_run {
				result.push(' ');
				in_run = true;
			}
		} else {
			result.push(c);
			in_run = false;
		}
	}

	result
}

fn strip_numeric(text: &str) -> String {
	text.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Padding character added around a text before slicing.
pub const PADDING: char = ' ';

/// A cleaned text padded for n-gram extraction.
///
/// One [`PADDING`] character is prepended and `max_n - 1` are appended, so
/// grams touching the text edges keep a word-boundary marker. An empty text
/// stays empty and yields no grams.
///
/// The padded text owns its characters; [`PaddedText::ngrams`] can be called
/// any number of times, each call restarting the sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaddedText {
	chars: Vec<char>,
	max_n: usize,
}

impl PaddedText {
	/// Pads `text` for grams of length `1..=max_n`.
	pub fn new(text: &str, max_n: usize) -> Self {
		if text.is_empty() {
			return Self { chars: Vec::new(), max_n };
		}

		let padding = max_n.saturating_sub(1);
		let capacity = text.len().checked_add(padding).and_then(|c| c.checked_add(1)).unwrap_or(text.len());
		let mut chars = Vec::with_capacity(capacity);
		chars.push(PADDING);
		chars.extend(text.chars());
		chars.extend(std::iter::repeat(PADDING).take(padding));

		Self { chars, max_n }
	}

	/// Length of the padded text, in characters.
	pub fn len(&self) -> usize {
		self.chars.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chars.is_empty()
	}

	/// Number of grams of length `n` in the padded text.
	pub fn count(&self, n: usize) -> usize {
		if n == 0 || n > self.chars.len() {
			0
		} else {
			self.chars.len() - n + 1
		}
	}

	/// Lazily yields every gram: all 1-grams left to right, then all
	/// 2-grams, and so on up to `max_n`.
	pub fn ngrams(&self) -> NGrams<'_> {
		NGrams { chars: &self.chars, max_n: self.max_n, n: 1, position: 0 }
	}
}

impl std::fmt::Display for PaddedText {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.chars.iter().try_for_each(|c| write!(f, "{}", c))
	}
}

/// Iterator over the n-grams of a [`PaddedText`].
#[derive(Clone, Debug)]
pub struct NGrams<'a> {
	chars: &'a [char],
	max_n: usize,
	n: usize,
	position: usize,
}

impl Iterator for NGrams<'_> {
	type Item = String;

	fn next(&mut self) -> Option<Self::Item> {
		while self.n <= self.max_n {
			if self.position + self.n <= self.chars.len() {
				let gram = self.chars[self.position..self.position + self.n].iter().collect();
				self.position += 1;
				return Some(gram);
			}
			self.n += 1;
			self.position = 0;
		}
		None
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let len = self.chars.len();
		let mut remaining = 0;
		for n in self.n..=self.max_n {
			if n > len {
				break;
			}
			let start = if n == self.n { self.position } else { 0 };
			remaining += (len - n + 1).saturating_sub(start);
		}
		(remaining, Some(remaining))
	}
}

impl ExactSizeIterator for NGrams<'_> {}

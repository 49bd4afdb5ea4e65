use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Occurrence counts of n-grams, kept in first-seen order.
///
/// A `FrequencyTable` is a counting map that also remembers when each gram
/// was first added. Iteration always follows that order, which is what
/// top-K selection relies on to break ties deterministically.
///
/// # Invariants
/// - `index[gram]` is the position of `gram` in `entries`
/// - Every count is >= 1
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrequencyTable {
	index: HashMap<String, usize>,
	entries: Vec<(String, usize)>,
}

impl FrequencyTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records one occurrence of `gram`.
	pub fn add(&mut self, gram: &str) {
		self.add_count(gram, 1);
	}

	/// Records `count` occurrences of `gram`. A zero count is ignored.
	pub fn add_count(&mut self, gram: &str, count: usize) {
		if count == 0 {
			return;
		}
		match self.index.get(gram) {
			Some(&position) => self.entries[position].1 += count,
			None => {
				self.index.insert(gram.to_owned(), self.entries.len());
				self.entries.push((gram.to_owned(), count));
			}
		}
	}

	/// Count of `gram`, or 0 if it was never seen.
	pub fn get(&self, gram: &str) -> usize {
		self.index.get(gram).map_or(0, |&position| self.entries[position].1)
	}

	/// Number of distinct grams.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Sum of all counts.
	pub fn total(&self) -> usize {
		self.entries.iter().map(|(_, count)| count).sum()
	}

	/// Entries in first-seen order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
		self.entries.iter().map(|(gram, count)| (gram.as_str(), *count))
	}

	pub fn entries(&self) -> &[(String, usize)] {
		&self.entries
	}
}

impl<S: AsRef<str>> FromIterator<S> for FrequencyTable {
	fn from_iter<I: IntoIterator<Item = S>>(grams: I) -> Self {
		let mut table = Self::new();
		for gram in grams {
			table.add(gram.as_ref());
		}
		table
	}
}

/// Rule deciding which length bucket a gram is counted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BucketPolicy {
	/// Length of the gram with surrounding whitespace trimmed.
	/// Whitespace-only grams go to bucket 1.
	#[default]
	Trimmed,
	/// Like `Trimmed`, but whitespace-only grams are not counted at all.
	/// Same bucketing rule as the Python langdetect profile script. Keys and
	/// totals can still differ from its output, since that script also ends
	/// every document with a newline.
	TrimmedSkipBlank,
	/// Untrimmed character length.
	Raw,
}

impl BucketPolicy {
	/// 1-based bucket of `gram`, or `None` if the gram is not counted.
	pub fn bucket(self, gram: &str) -> Option<usize> {
		match self {
			BucketPolicy::Raw => Some(gram.chars().count()),
			BucketPolicy::Trimmed => Some(gram.trim().chars().count().max(1)),
			BucketPolicy::TrimmedSkipBlank => match gram.trim().chars().count() {
				0 => None,
				n => Some(n),
			},
		}
	}
}

/// Counts a gram sequence into one table per length bucket.
///
/// Grams are first counted into a single first-seen ordered table, then
/// split by [`BucketPolicy::bucket`]. Each returned table keeps the global
/// first-seen order of its grams. `tables[i]` holds bucket `i + 1`; exactly
/// `max_n` tables are returned.
///
/// A gram always belongs to a single bucket, so the key sets of the
/// returned tables are disjoint.
pub fn aggregate<I>(grams: I, max_n: usize, policy: BucketPolicy) -> Vec<FrequencyTable>
where
	I: IntoIterator<Item = String>,
{
	let counts: FrequencyTable = grams.into_iter().collect();

	let mut tables = vec![FrequencyTable::new(); max_n];
	for (gram, count) in counts.iter() {
		match policy.bucket(gram) {
			Some(bucket) if (1..=max_n).contains(&bucket) => tables[bucket - 1].add_count(gram, count),
			_ => log::trace!("Gram {:?} not counted under {:?}", gram, policy),
		}
	}

	tables
}

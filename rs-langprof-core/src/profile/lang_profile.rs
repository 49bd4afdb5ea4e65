use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::path::Path;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::frequency::FrequencyTable;
use super::ranking::RankedGrams;
use crate::error::{ProfileError, Result};
use crate::io;

/// On-disk encoding of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileFormat {
	/// Pretty printed UTF-8 JSON, the format read by language detectors.
	#[default]
	Json,
	/// Compact postcard encoding.
	Binary,
}

impl ProfileFormat {
	/// File extension used for this format.
	pub fn extension(self) -> &'static str {
		match self {
			ProfileFormat::Json => "json",
			ProfileFormat::Binary => "bin",
		}
	}

	/// Guesses the format from a file extension (`.bin` is binary, anything else JSON).
	pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
		match path.as_ref().extension().and_then(|e| e.to_str()) {
			Some("bin") => ProfileFormat::Binary,
			_ => ProfileFormat::Json,
		}
	}
}

/// A language profile: the top-ranked n-grams of a corpus and its totals.
///
/// # Fields (serialized in this order)
/// - `freq`: gram → count, the 1-gram ranking first, then 2-grams, then 3-grams
/// - `n_words`: total gram occurrences per length, counted before truncation
/// - `name`: lowercase language code
///
/// # Invariants
/// - No gram appears twice in `freq`
/// - A profile is never modified after assembly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	freq: GramCounts,
	n_words: Vec<usize>,
	name: String,
}

impl Profile {
	/// Builds a profile from per-length rankings and the full tables they
	/// were ranked from.
	///
	/// - Rankings are merged in length order into `freq`
	/// - `n_words[i]` is the total of `tables[i]`, not of the ranking
	/// - `code` is stored lowercase
	///
	/// # Errors
	/// Returns [`ProfileError::Overlap`] if a gram is ranked in two lengths.
	pub fn assemble(code: &str, ranked: &[RankedGrams], tables: &[FrequencyTable]) -> Result<Self> {
		let mut seen = HashSet::new();
		let mut freq = Vec::with_capacity(ranked.iter().map(Vec::len).sum());

		for (gram, count) in ranked.iter().flatten() {
			if !seen.insert(gram.as_str()) {
				return Err(ProfileError::Overlap(gram.clone()));
			}
			freq.push((gram.clone(), *count));
		}

		Ok(Self {
			freq: GramCounts(freq),
			n_words: tables.iter().map(FrequencyTable::total).collect(),
			name: code.to_lowercase(),
		})
	}

	/// Lowercase language code.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Total gram occurrences per length (`n_words[0]` for 1-grams).
	pub fn n_words(&self) -> &[usize] {
		&self.n_words
	}

	/// Stored grams, in merge order.
	pub fn freq(&self) -> impl Iterator<Item = (&str, usize)> {
		self.freq.0.iter().map(|(gram, count)| (gram.as_str(), *count))
	}

	/// Count of a stored gram. Keys are matched exactly, whitespace included.
	pub fn get(&self, gram: &str) -> Option<usize> {
		self.freq.0.iter().find(|(g, _)| g == gram).map(|(_, count)| *count)
	}

	/// Number of stored grams.
	pub fn len(&self) -> usize {
		self.freq.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.freq.0.is_empty()
	}

	/// The `n` most frequent stored grams of `length` characters, ties in
	/// merge order.
	pub fn top_of_length(&self, length: usize, n: usize) -> Vec<(&str, usize)> {
		let mut grams: Vec<(&str, usize)> =
			self.freq().filter(|(gram, _)| gram.chars().count() == length).collect();
		grams.sort_by(|a, b| b.1.cmp(&a.1));
		grams.truncate(n);
		grams
	}

	/// Pretty printed JSON (2-space indent, non-ASCII kept literal).
	pub fn to_json(&self) -> Result<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	pub fn from_json(content: &str) -> Result<Self> {
		let profile: Profile = serde_json::from_str(content)?;
		Ok(profile.with_padded_totals())
	}

	/// Postcard encoding.
	pub fn to_bytes(&self) -> Result<Vec<u8>> {
		Ok(postcard::to_stdvec(self)?)
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
		let profile: Profile = postcard::from_bytes(bytes)?;
		Ok(profile.with_padded_totals())
	}

	/// Encodes the profile in the given format.
	pub fn encode(&self, format: ProfileFormat) -> Result<Vec<u8>> {
		match format {
			ProfileFormat::Json => Ok(self.to_json()?.into_bytes()),
			ProfileFormat::Binary => self.to_bytes(),
		}
	}

	pub fn decode(bytes: &[u8], format: ProfileFormat) -> Result<Self> {
		match format {
			ProfileFormat::Json => {
				let profile: Profile = serde_json::from_slice(bytes)?;
				Ok(profile.with_padded_totals())
			}
			ProfileFormat::Binary => Self::from_bytes(bytes),
		}
	}

	/// Writes the encoded profile to any sink.
	pub fn write_to<W: Write>(&self, mut writer: W, format: ProfileFormat) -> Result<()> {
		writer.write_all(&self.encode(format)?)?;
		writer.flush()?;
		Ok(())
	}

	/// Writes the profile to `path`, atomically.
	///
	/// The profile is left untouched on failure, so the write can be retried.
	pub fn save<P: AsRef<Path>>(&self, path: P, format: ProfileFormat) -> Result<()> {
		let bytes = self.encode(format)?;
		io::write_atomic(path, &bytes)?;
		Ok(())
	}

	/// Reads a profile, choosing the format from the file extension.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let bytes = std::fs::read(path)?;
		Self::decode(&bytes, ProfileFormat::from_path(path))
	}

	/// Pads `n_words` with zeros up to the longest stored gram.
	fn with_padded_totals(mut self) -> Self {
		let longest = self.freq.0.iter().map(|(gram, _)| gram.chars().count()).max().unwrap_or(0);
		if self.n_words.len() < longest {
			self.n_words.resize(longest, 0);
		}
		self
	}
}

/// Ordered gram → count map.
///
/// Serialized as a map whose keys keep insertion order, so the same profile
/// always produces the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct GramCounts(Vec<(String, usize)>);

impl Serialize for GramCounts {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.0.len()))?;
		for (gram, count) in &self.0 {
			map.serialize_entry(gram, count)?;
		}
		map.end()
	}
}

impl<'de> Deserialize<'de> for GramCounts {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		struct GramCountsVisitor;

		impl<'de> Visitor<'de> for GramCountsVisitor {
			type Value = GramCounts;

			fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
				formatter.write_str("a map of n-grams to counts")
			}

			fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
				let mut seen = HashSet::new();
				let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
				while let Some((gram, count)) = access.next_entry::<String, usize>()? {
					if !seen.insert(gram.clone()) {
						return Err(de::Error::custom(format!("duplicate gram {:?}", gram)));
					}
					entries.push((gram, count));
				}
				Ok(GramCounts(entries))
			}
		}

		deserializer.deserialize_map(GramCountsVisitor)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::profile::ranking::top_k;

	fn sample() -> Profile {
		let unigrams: FrequencyTable = ["а", "а", "с", "х", " "].into_iter().collect();
		let bigrams: FrequencyTable = ["са", "ах", "ха"].into_iter().collect();
		let trigrams: FrequencyTable = ["сах", "аха"].into_iter().collect();
		let tables = vec![unigrams, bigrams, trigrams];
		let ranked: Vec<RankedGrams> = tables.iter().map(|t| top_k(t, 2)).collect();
		Profile::assemble("SAH", &ranked, &tables).unwrap()
	}

	#[test]
	fn assembles_in_length_order_with_full_totals() {
		let profile = sample();
		assert_eq!(profile.name(), "sah");
		assert_eq!(profile.n_words(), &[5, 3, 2]);
		let grams: Vec<(&str, usize)> = profile.freq().collect();
		assert_eq!(grams, vec![("а", 2), ("с", 1), ("са", 1), ("ах", 1), ("сах", 1), ("аха", 1)]);
		assert_eq!(profile.get("са"), Some(1));
		assert_eq!(profile.get("са "), None);
	}

	#[test]
	fn overlapping_rankings_are_rejected() {
		let ranked = vec![vec![("a".to_owned(), 2)], vec![("a".to_owned(), 1)]];
		let result = Profile::assemble("en", &ranked, &[]);
		assert!(matches!(result, Err(ProfileError::Overlap(gram)) if gram == "a"));
	}

	#[test]
	fn json_layout_and_order() {
		let json = sample().to_json().unwrap();
		let expected = "{\n  \"freq\": {\n    \"а\": 2,\n    \"с\": 1,\n    \"са\": 1,\n    \"ах\": 1,\n    \"сах\": 1,\n    \"аха\": 1\n  },\n  \"n_words\": [\n    5,\n    3,\n    2\n  ],\n  \"name\": \"sah\"\n}";
		assert_eq!(json, expected);
	}

	#[test]
	fn empty_profile_json() {
		let tables = vec![FrequencyTable::new(); 3];
		let ranked: Vec<RankedGrams> = vec![Vec::new(); 3];
		let profile = Profile::assemble("tg", &ranked, &tables).unwrap();
		let value: serde_json::Value = serde_json::from_str(&profile.to_json().unwrap()).unwrap();
		assert_eq!(value, serde_json::json!({"freq": {}, "n_words": [0, 0, 0], "name": "tg"}));
	}

	#[test]
	fn reads_back_both_formats() {
		let profile = sample();
		assert_eq!(Profile::from_json(&profile.to_json().unwrap()).unwrap(), profile);
		assert_eq!(Profile::from_bytes(&profile.to_bytes().unwrap()).unwrap(), profile);
	}

	#[test]
	fn short_totals_are_padded_on_load() {
		let profile = Profile::from_json(r#"{"freq": {"ab": 3, "a": 4}, "n_words": [10], "name": "en"}"#).unwrap();
		assert_eq!(profile.n_words(), &[10, 0]);
		assert_eq!(profile.top_of_length(1, 5), vec![("a", 4)]);
		assert_eq!(profile.top_of_length(2, 5), vec![("ab", 3)]);
	}

	#[test]
	fn top_grams_are_grouped_by_length() {
		let profile = Profile::from_json(
			r#"{"freq": {"a": 1, " b": 2, "b": 5, "ab": 2, "c": 3}, "n_words": [9, 4], "name": "en"}"#,
		)
		.unwrap();
		assert_eq!(profile.top_of_length(1, 2), vec![("b", 5), ("c", 3)]);
		assert_eq!(profile.top_of_length(2, 10), vec![(" b", 2), ("ab", 2)]);
		assert!(profile.top_of_length(3, 10).is_empty());
	}

	#[test]
	fn writes_to_any_sink() {
		let profile = sample();
		let mut json = Vec::new();
		profile.write_to(&mut json, ProfileFormat::Json).unwrap();
		assert_eq!(json, profile.to_json().unwrap().into_bytes());

		let mut binary = Vec::new();
		profile.write_to(&mut binary, ProfileFormat::Binary).unwrap();
		assert_eq!(Profile::decode(&binary, ProfileFormat::Binary).unwrap(), profile);
	}

	struct BrokenPipe;

	impl Write for BrokenPipe {
		fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
			Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
		}

		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn sink_errors_are_reported_as_io() {
		let result = sample().write_to(BrokenPipe, ProfileFormat::Json);
		assert!(matches!(result, Err(ProfileError::Io(e)) if e.kind() == std::io::ErrorKind::BrokenPipe));
	}

	#[test]
	fn duplicate_keys_are_rejected_on_load() {
		let result = Profile::from_json(r#"{"freq": {"a": 1, "a": 2}, "n_words": [3], "name": "en"}"#);
		assert!(matches!(result, Err(ProfileError::Json(_))));
	}

	#[test]
	fn format_from_extension() {
		assert_eq!(ProfileFormat::from_path("x/sah_generated.bin"), ProfileFormat::Binary);
		assert_eq!(ProfileFormat::from_path("x/sah_generated.json"), ProfileFormat::Json);
		assert_eq!(ProfileFormat::Binary.extension(), "bin");
	}
}

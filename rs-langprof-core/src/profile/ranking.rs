use super::frequency::FrequencyTable;

/// (gram, count) pairs sorted by decreasing count.
pub type RankedGrams = Vec<(String, usize)>;

/// Selects the `k` most frequent grams of a table.
///
/// The result is sorted by decreasing count. Grams with equal counts keep
/// the table's first-seen order (the sort is stable). A table with fewer
/// than `k` grams is returned whole, sorted.
pub fn top_k(table: &FrequencyTable, k: usize) -> RankedGrams {
	let mut ranked: RankedGrams = table.entries().to_vec();
	ranked.sort_by(|a, b| b.1.cmp(&a.1));
	ranked.truncate(k);
	ranked
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sorts_descending_with_stable_ties() {
		let table: FrequencyTable = ["x", "y", "z", "y", "w", "z", "v"].into_iter().collect();
		let ranked = top_k(&table, 10);
		assert_eq!(
			ranked,
			vec![
				("y".to_owned(), 2),
				("z".to_owned(), 2),
				("x".to_owned(), 1),
				("w".to_owned(), 1),
				("v".to_owned(), 1),
			]
		);
	}

	#[test]
	fn truncates_to_k() {
		let table: FrequencyTable = ["a", "b", "c", "c"].into_iter().collect();
		let ranked = top_k(&table, 2);
		assert_eq!(ranked, vec![("c".to_owned(), 2), ("a".to_owned(), 1)]);
	}

	#[test]
	fn keeps_exactly_k_of_many_distinct_grams() {
		let mut table = FrequencyTable::new();
		for i in 0..400 {
			table.add_count(&format!("g{:03}", i), 1 + i % 7);
		}
		let ranked = top_k(&table, 300);

		assert_eq!(ranked.len(), 300);
		assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));

		let cutoff = ranked[299].1;
		let kept_at_cutoff: Vec<&str> = ranked.iter().filter(|(_, c)| *c == cutoff).map(|(g, _)| g.as_str()).collect();
		let first_seen_at_cutoff: Vec<&str> = table
			.iter()
			.filter(|(_, c)| *c == cutoff)
			.map(|(g, _)| g)
			.take(kept_at_cutoff.len())
			.collect();
		assert_eq!(kept_at_cutoff, first_seen_at_cutoff);
	}

	#[test]
	fn empty_table_ranks_nothing() {
		assert!(top_k(&FrequencyTable::new(), 300).is_empty());
	}
}

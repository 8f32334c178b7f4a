//! Value frequency tables.

use crate::types::{Cell, ColumnValues, FrequencyEntry};
use std::collections::HashMap;
use std::hash::Hash;

/// Number of entries kept in a profile's frequency table.
pub const TOP_VALUES: usize = 10;

/// Count non-null values, most frequent first.
///
/// Ties keep the order in which the values were first encountered.
pub(crate) fn value_counts(values: &ColumnValues) -> Vec<FrequencyEntry> {
    match values {
        ColumnValues::Numeric(v) => count_in_order(v.iter().flatten().map(|x| numeric_key(*x)))
            .into_iter()
            .map(|(bits, frequency)| FrequencyEntry {
                value: Cell::Numeric(f64::from_bits(bits)),
                frequency,
            })
            .collect(),
        ColumnValues::Text(v) => count_in_order(v.iter().flatten().map(String::as_str))
            .into_iter()
            .map(|(s, frequency)| FrequencyEntry {
                value: Cell::Text(s.to_string()),
                frequency,
            })
            .collect(),
    }
}

/// Hash key for a float: equal values share a key, `-0.0` folds into `0.0`.
fn numeric_key(v: f64) -> u64 {
    if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() }
}

fn count_in_order<K, I>(items: I) -> Vec<(K, usize)>
where
    K: Hash + Eq + Clone,
    I: IntoIterator<Item = K>,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut counts: Vec<(K, usize)> = Vec::new();

    for item in items {
        match index.get(&item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }

    // stable: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

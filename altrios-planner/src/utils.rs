//! Module for general functions, grouping helpers, and unit conversion factors.

use crate::imports::*;
use std::hash::Hash;

pub const W_PER_HP: f64 = 745.7;
pub const KG_PER_LB: f64 = 1.0 / 2.20462;
/// Kilograms per short ton
pub const KG_PER_TON: f64 = KG_PER_LB * 2000.0;
pub const LITER_PER_GALLON: f64 = 3.785411784;

/// Returns true if `val1` and `val2` are within a relative/absolute `epsilon` of each other,
/// depending on magnitude.
pub fn almost_eq(val1: f64, val2: f64, epsilon: Option<f64>) -> bool {
    let epsilon = epsilon.unwrap_or(1e-8);
    ((val2 - val1) / (val1 + val2)).abs() < epsilon || (val2 - val1).abs() < epsilon
}

/// Sums `values` within each group key, returning groups in key order
pub fn grouped_sum<K, I>(values: I) -> BTreeMap<K, u64>
where
    K: Ord,
    I: IntoIterator<Item = (K, u64)>,
{
    let mut sums = BTreeMap::new();
    for (key, value) in values {
        *sums.entry(key).or_insert(0) += value;
    }
    sums
}

/// Counts occurrences of each key, preserving the order in which keys first appear
pub fn counts_in_order<K, I>(keys: I) -> Vec<(K, usize)>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut counts: Vec<(K, usize)> = vec![];
    let mut index: HashMap<K, usize> = HashMap::new();
    for key in keys {
        match index.get(&key) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    counts
}

/// 1-based dense rank of each distinct value in sorted order
pub fn dense_rank<T: Ord + Clone>(values: &[T]) -> BTreeMap<T, usize> {
    let distinct: BTreeSet<&T> = values.iter().collect();
    distinct
        .into_iter()
        .enumerate()
        .map(|(i, v)| (v.clone(), i + 1))
        .collect()
}

/// Integer ceiling of `numerator / denominator`; `denominator` must be nonzero
pub fn div_ceil(numerator: u64, denominator: u64) -> u64 {
    (numerator + denominator - 1) / denominator
}

/// Mean of `values`, or `None` if empty
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_almost_eq() {
        assert!(almost_eq(1.0, 1.0 + 1e-10, None));
        assert!(!almost_eq(1.0, 1.1, None));
        assert!(almost_eq(0.0, 0.0, None));
    }

    #[test]
    fn test_grouped_sum() {
        let sums = grouped_sum(vec![("b", 2), ("a", 1), ("b", 3)]);
        assert_eq!(sums.into_iter().collect::<Vec<_>>(), vec![("a", 1), ("b", 5)]);
    }

    #[test]
    fn test_counts_in_order() {
        let counts = counts_in_order(vec!["z", "a", "z", "z"]);
        assert_eq!(counts, vec![("z", 3), ("a", 1)]);
        let counts = counts_in_order((0..1000).map(|i| i % 7));
        assert_eq!(counts.len(), 7);
        assert_eq!(counts[0], (0, 143));
        assert_eq!(counts[6], (6, 142));
    }

    #[test]
    fn test_dense_rank() {
        let ranks = dense_rank(&["c", "a", "c", "b"]);
        assert_eq!(ranks[&"a"], 1);
        assert_eq!(ranks[&"b"], 2);
        assert_eq!(ranks[&"c"], 3);
    }

    #[test]
    fn test_div_ceil_and_mean() {
        assert_eq!(div_ceil(180, 100), 2);
        assert_eq!(div_ceil(120, 100), 2);
        assert_eq!(div_ceil(300, 100), 3);
        assert_eq!(mean(vec![1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(mean(Vec::<f64>::new()), None);
    }
}

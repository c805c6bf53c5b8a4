use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Rows shown in the "top" tables of every dashboard.
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub name: String,
    pub value: f64,
}

/// Sum `value` per `key`, keeping groups in first-encounter order.
pub fn group_sum<'a, T>(
    rows: &'a [T],
    key: impl Fn(&'a T) -> &'a str,
    value: impl Fn(&T) -> f64,
) -> Vec<RankedEntry> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut groups: Vec<RankedEntry> = Vec::new();
    for row in rows {
        let name = key(row);
        let slot = *index.entry(name).or_insert_with(|| {
            groups.push(RankedEntry {
                name: name.to_string(),
                value: 0.0,
            });
            groups.len() - 1
        });
        groups[slot].value += value(row);
    }
    groups
}

/// Group, sum, sort descending and keep the first `n`. The sort is stable,
/// so equal sums stay in the order their group was first seen.
pub fn top_n<'a, T>(
    rows: &'a [T],
    key: impl Fn(&'a T) -> &'a str,
    value: impl Fn(&T) -> f64,
    n: usize,
) -> Vec<RankedEntry> {
    let mut ranked = group_sum(rows, key, value);
    ranked.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    ranked.truncate(n);
    ranked
}

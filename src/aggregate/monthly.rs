use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::{pct_change, ratio_pct};
use crate::parse::MonthKey;

/// One point of a monthly series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyValue {
    pub month: MonthKey,
    pub value: f64,
}

/// Sum `value` per month. Keys iterate in chronological order.
pub fn sum_by_month<T>(
    rows: &[T],
    month: impl Fn(&T) -> MonthKey,
    value: impl Fn(&T) -> f64,
) -> BTreeMap<MonthKey, f64> {
    let mut buckets = BTreeMap::new();
    for row in rows {
        *buckets.entry(month(row)).or_insert(0.0) += value(row);
    }
    buckets
}

/// Mean of `value` per month.
pub fn mean_by_month<T>(
    rows: &[T],
    month: impl Fn(&T) -> MonthKey,
    value: impl Fn(&T) -> f64,
) -> BTreeMap<MonthKey, f64> {
    let mut acc: BTreeMap<MonthKey, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let e = acc.entry(month(row)).or_insert((0.0, 0));
        e.0 += value(row);
        e.1 += 1;
    }
    acc.into_iter()
        .map(|(k, (sum, n))| (k, sum / n as f64))
        .collect()
}

/// Distinct identifiers seen per month.
pub fn distinct_by_month<'a, T>(
    rows: &'a [T],
    month: impl Fn(&T) -> MonthKey,
    id: impl Fn(&'a T) -> &'a str,
) -> BTreeMap<MonthKey, BTreeSet<&'a str>> {
    let mut buckets: BTreeMap<MonthKey, BTreeSet<&'a str>> = BTreeMap::new();
    for row in rows {
        buckets.entry(month(row)).or_default().insert(id(row));
    }
    buckets
}

/// Flatten buckets into a chronological series.
pub fn series(buckets: &BTreeMap<MonthKey, f64>) -> Vec<MonthlyValue> {
    buckets
        .iter()
        .map(|(&month, &value)| MonthlyValue { month, value })
        .collect()
}

/// Percentage change between the last two months. `None` with fewer than
/// two months, or when the earlier month is zero.
pub fn last_period_delta(buckets: &BTreeMap<MonthKey, f64>) -> Option<f64> {
    let mut recent = buckets.values().rev();
    let last = *recent.next()?;
    let prev = *recent.next()?;
    pct_change(prev, last)
}

/// Latest month against the same month a year earlier. `None` when that
/// month has no bucket or its value is zero.
pub fn year_over_year_pct(buckets: &BTreeMap<MonthKey, f64>) -> Option<f64> {
    let (latest, &current) = buckets.iter().next_back()?;
    let &previous = buckets.get(&latest.year_before())?;
    pct_change(previous, current)
}

/// Share of the ids in `earlier` that also appear in `later`, as a
/// percentage. `None` when `earlier` is empty.
pub fn retention_pct<S: Ord>(earlier: &BTreeSet<S>, later: &BTreeSet<S>) -> Option<f64> {
    let retained = earlier.intersection(later).count();
    ratio_pct(retained as f64, earlier.len() as f64)
}

/// Retention between the last two month buckets.
pub fn latest_retention<S: Ord>(buckets: &BTreeMap<MonthKey, BTreeSet<S>>) -> Option<f64> {
    let mut recent = buckets.values().rev();
    let later = recent.next()?;
    let earlier = recent.next()?;
    retention_pct(earlier, later)
}

// src/aggregate/mod.rs
//! Pure aggregations over an in-memory dataset. Nothing here keeps state;
//! every function can be rerun on each render.

pub mod monthly;
pub mod ranking;
pub mod rolling;

pub use monthly::{
    distinct_by_month, last_period_delta, latest_retention, mean_by_month, retention_pct, series,
    sum_by_month, year_over_year_pct, MonthlyValue,
};
pub use ranking::{group_sum, top_n, RankedEntry, DEFAULT_TOP_N};
pub use rolling::{rolling_average, RollingPoint};

/// Sum `value` over every row.
pub fn total<T>(rows: &[T], value: impl Fn(&T) -> f64) -> f64 {
    rows.iter().map(value).sum()
}

/// Arithmetic mean of `value`, `None` for no rows.
pub fn mean<T>(rows: &[T], value: impl Fn(&T) -> f64) -> Option<f64> {
    safe_div(total(rows, value), rows.len() as f64)
}

/// `numerator / denominator`, or `None` when the denominator is zero.
pub fn safe_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// `numerator / denominator × 100`, or `None` when the denominator is zero.
pub fn ratio_pct(numerator: f64, denominator: f64) -> Option<f64> {
    safe_div(numerator, denominator).map(|r| r * 100.0)
}

/// Percentage change from `previous` to `current`; `None` when `previous`
/// is zero.
pub fn pct_change(previous: f64, current: f64) -> Option<f64> {
    ratio_pct(current - previous, previous)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_are_order_independent() {
        let values = vec![12.5, 100.0, 3.25, 40.0, 0.25];
        let forward = total(&values, |v| *v);
        let mut reversed = values.clone();
        reversed.reverse();
        let mut rotated = values.clone();
        rotated.rotate_left(2);
        assert_eq!(forward, 156.0);
        assert_eq!(total(&reversed, |v| *v), forward);
        assert_eq!(total(&rotated, |v| *v), forward);
    }

    #[test]
    fn ratios_guard_zero_denominator() {
        assert_eq!(ratio_pct(100.0, 250.0), Some(40.0));
        assert_eq!(ratio_pct(5.0, 0.0), None);
        assert_eq!(pct_change(100.0, 150.0), Some(50.0));
        assert_eq!(pct_change(0.0, 150.0), None);
    }

    #[test]
    fn mean_of_nothing_is_unavailable() {
        let empty: Vec<f64> = Vec::new();
        assert_eq!(mean(&empty, |v| *v), None);
        assert_eq!(mean(&[2.0, 4.0], |v| *v), Some(3.0));
        assert_eq!(total(&empty, |v| *v), 0.0);
    }
}

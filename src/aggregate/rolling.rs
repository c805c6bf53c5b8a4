use serde::Serialize;
use std::collections::VecDeque;

use crate::datasets::PartsSale;

/// Unit price of one sale next to the trailing average for its part and
/// region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingPoint {
    pub part_id: String,
    pub region: String,
    pub date: String,
    pub unit_price: f64,
    pub avg_price: f64,
}

/// Trailing mean of `UnitPrice` over the last `window` sales of each
/// (part, region) pair, ordered by part, region, then sale date. Sales on
/// the same day keep their input order. The first sales of a pair average
/// over however many rows exist so far.
pub fn rolling_average(rows: &[PartsSale], window: usize) -> Vec<RollingPoint> {
    let window = window.max(1);
    let mut ordered: Vec<&PartsSale> = rows.iter().collect();
    ordered.sort_by(|a, b| {
        (a.part_id.as_str(), a.region.as_str(), a.sold_on).cmp(&(
            b.part_id.as_str(),
            b.region.as_str(),
            b.sold_on,
        ))
    });

    let mut out = Vec::with_capacity(ordered.len());
    let mut recent: VecDeque<f64> = VecDeque::with_capacity(window);
    let mut current: Option<(&str, &str)> = None;

    for sale in ordered {
        let pair = (sale.part_id.as_str(), sale.region.as_str());
        if current != Some(pair) {
            recent.clear();
            current = Some(pair);
        }
        if recent.len() == window {
            recent.pop_front();
        }
        recent.push_back(sale.unit_price);
        let avg_price = recent.iter().sum::<f64>() / recent.len() as f64;

        out.push(RollingPoint {
            part_id: sale.part_id.clone(),
            region: sale.region.clone(),
            date: sale.date.clone(),
            unit_price: sale.unit_price,
            avg_price,
        });
    }
    out
}

use serde::Serialize;
use std::fmt;

use super::{fmt_opt, fmt_pct};
use crate::aggregate::{
    group_sum, last_period_delta, mean, mean_by_month, rolling_average, series, sum_by_month,
    top_n, total, MonthlyValue, RankedEntry, RollingPoint,
};
use crate::config::DashboardConfig;
use crate::datasets::{Dataset, PartsSale};

/// B2B parts pricing: revenue, volume, price movement and regional split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartsPricingSummary {
    pub rows: usize,
    pub total_revenue: f64,
    pub total_units: f64,
    /// Mean `UnitPrice` over all sales lines.
    pub average_price: Option<f64>,
    /// Change of the monthly mean unit price over the last two months.
    pub price_change_pct: Option<f64>,
    pub monthly_revenue: Vec<MonthlyValue>,
    pub monthly_average_price: Vec<MonthlyValue>,
    pub revenue_by_region: Vec<RankedEntry>,
    pub top_parts: Vec<RankedEntry>,
    pub rolling_prices: Vec<RollingPoint>,
}

pub fn summarize(ds: &Dataset<PartsSale>, cfg: &DashboardConfig) -> PartsPricingSummary {
    let rows = ds.rows.as_slice();
    let revenue_by_month = sum_by_month(rows, |r| r.month, |r| r.revenue);
    let price_by_month = mean_by_month(rows, |r| r.month, |r| r.unit_price);

    PartsPricingSummary {
        rows: rows.len(),
        total_revenue: total(rows, |r| r.revenue),
        total_units: total(rows, |r| r.units_sold),
        average_price: mean(rows, |r| r.unit_price),
        price_change_pct: last_period_delta(&price_by_month),
        monthly_revenue: series(&revenue_by_month),
        monthly_average_price: series(&price_by_month),
        revenue_by_region: group_sum(rows, |r| r.region.as_str(), |r| r.revenue),
        top_parts: top_n(rows, |r| r.part_name.as_str(), |r| r.revenue, cfg.top_n),
        rolling_prices: rolling_average(rows, cfg.rolling_window),
    }
}

impl fmt::Display for PartsPricingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total revenue:   {:.2}", self.total_revenue)?;
        writeln!(f, "Units sold:      {}", self.total_units)?;
        writeln!(f, "Average price:   {}", fmt_opt(self.average_price))?;
        writeln!(f, "Price change:    {}", fmt_pct(self.price_change_pct))?;
        writeln!(f, "Top parts by revenue:")?;
        for e in &self.top_parts {
            writeln!(f, "  {:<24} {:.2}", e.name, e.value)?;
        }
        writeln!(f, "Revenue by region:")?;
        for e in &self.revenue_by_region {
            writeln!(f, "  {:<24} {:.2}", e.name, e.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "Date,PartID,PartName,Category,Region,Segment,UnitsSold,UnitPrice,Revenue\n\
        2024-01-03,P1,Brake Pad,Brakes,North,OEM,10,20,200\n\
        2024-01-20,P2,Oil Filter,Engine,South,Aftermarket,5,10,50\n\
        2024-02-04,P1,Brake Pad,Brakes,North,OEM,8,25,200\n\
        2024-02-18,P3,Spark Plug,Engine,North,OEM,20,5,100\n";

    #[test]
    fn parts_kpis() -> anyhow::Result<()> {
        let ds = Dataset::<PartsSale>::from_csv(CSV)?;
        let s = summarize(&ds, &DashboardConfig::default());
        assert_eq!(s.rows, 4);
        assert_eq!(s.total_revenue, 550.0);
        assert_eq!(s.total_units, 43.0);
        assert_eq!(s.average_price, Some(15.0));
        // Jan mean 15, Feb mean 15
        assert_eq!(s.price_change_pct, Some(0.0));
        assert_eq!(s.monthly_revenue.len(), 2);
        assert_eq!(s.monthly_revenue[1].value, 300.0);
        assert_eq!(s.top_parts[0].name, "Brake Pad");
        assert_eq!(s.top_parts[0].value, 400.0);
        assert_eq!(s.revenue_by_region[0].name, "North");
        assert_eq!(s.revenue_by_region[0].value, 500.0);

        let p1: Vec<f64> = s
            .rolling_prices
            .iter()
            .filter(|p| p.part_id == "P1")
            .map(|p| p.avg_price)
            .collect();
        assert_eq!(p1, vec![20.0, 22.5]);
        Ok(())
    }

    #[test]
    fn top_parts_respects_config() -> anyhow::Result<()> {
        let ds = Dataset::<PartsSale>::from_csv(CSV)?;
        let cfg = DashboardConfig {
            top_n: 1,
            ..DashboardConfig::default()
        };
        assert_eq!(summarize(&ds, &cfg).top_parts.len(), 1);
        Ok(())
    }
}

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use super::{fmt_opt, fmt_pct};
use crate::aggregate::{
    distinct_by_month, group_sum, last_period_delta, latest_retention, ratio_pct, safe_div,
    series, sum_by_month, top_n, total, MonthlyValue, RankedEntry,
};
use crate::config::DashboardConfig;
use crate::datasets::{CustomerOrder, Dataset};

/// Retention, cadence and order value by customer segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderTrendsSummary {
    pub total_orders: usize,
    pub total_revenue: f64,
    pub distinct_customers: usize,
    pub avg_orders_per_customer: Option<f64>,
    pub avg_order_value: Option<f64>,
    pub monthly_orders: Vec<MonthlyValue>,
    pub monthly_revenue: Vec<MonthlyValue>,
    pub order_growth_pct: Option<f64>,
    /// Customers of the second-to-last month who ordered again in the last.
    pub retention_pct: Option<f64>,
    /// Revenue share per segment in percent, largest first.
    pub segment_share: Vec<RankedEntry>,
    pub top_customers: Vec<RankedCustomer>,
}

/// A customer ranked by revenue. Grouping is by id; `name` is the first
/// name seen for that id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCustomer {
    pub customer_id: String,
    pub name: String,
    pub value: f64,
}

pub fn summarize(ds: &Dataset<CustomerOrder>, cfg: &DashboardConfig) -> OrderTrendsSummary {
    let rows = ds.rows.as_slice();
    let total_orders = rows.len();
    let total_revenue = total(rows, |r| r.revenue);
    let distinct_customers = rows
        .iter()
        .map(|r| r.customer_id.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let orders_by_month = sum_by_month(rows, |r| r.month, |_| 1.0);
    let revenue_by_month = sum_by_month(rows, |r| r.month, |r| r.revenue);
    let customers_by_month = distinct_by_month(rows, |r| r.month, |r| r.customer_id.as_str());

    let mut segment_share: Vec<RankedEntry> =
        group_sum(rows, |r| r.segment.as_str(), |r| r.revenue)
            .into_iter()
            .filter_map(|e| {
                ratio_pct(e.value, total_revenue).map(|value| RankedEntry {
                    name: e.name,
                    value,
                })
            })
            .collect();
    segment_share.sort_by(|a, b| b.value.total_cmp(&a.value));

    OrderTrendsSummary {
        total_orders,
        total_revenue,
        distinct_customers,
        avg_orders_per_customer: safe_div(total_orders as f64, distinct_customers as f64),
        avg_order_value: safe_div(total_revenue, total_orders as f64),
        monthly_orders: series(&orders_by_month),
        monthly_revenue: series(&revenue_by_month),
        order_growth_pct: last_period_delta(&orders_by_month),
        retention_pct: latest_retention(&customers_by_month),
        segment_share,
        top_customers: top_customers(rows, cfg.top_n),
    }
}

fn top_customers(rows: &[CustomerOrder], n: usize) -> Vec<RankedCustomer> {
    let mut names: HashMap<&str, &str> = HashMap::new();
    for r in rows {
        names
            .entry(r.customer_id.as_str())
            .or_insert(r.customer_name.as_str());
    }
    top_n(rows, |r| r.customer_id.as_str(), |r| r.revenue, n)
        .into_iter()
        .map(|e| {
            let name = names
                .get(e.name.as_str())
                .map_or_else(|| e.name.clone(), |n| n.to_string());
            RankedCustomer {
                customer_id: e.name,
                name,
                value: e.value,
            }
        })
        .collect()
}

impl fmt::Display for OrderTrendsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Orders:               {}", self.total_orders)?;
        writeln!(f, "Revenue:              {:.2}", self.total_revenue)?;
        writeln!(f, "Customers:            {}", self.distinct_customers)?;
        writeln!(f, "Orders per customer:  {}", fmt_opt(self.avg_orders_per_customer))?;
        writeln!(f, "Average order value:  {}", fmt_opt(self.avg_order_value))?;
        writeln!(f, "Customer retention:   {}", fmt_pct(self.retention_pct))?;
        writeln!(f, "Segment share:")?;
        for e in &self.segment_share {
            writeln!(f, "  {:<24} {}", e.name, fmt_pct(Some(e.value)))?;
        }
        writeln!(f, "Top customers:")?;
        for e in &self.top_customers {
            writeln!(f, "  {:<24} {:.2}", e.name, e.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "OrderID,CustomerID,CustomerName,Segment,Region,OrderDate,Revenue\n\
        O1,C1,Acme,Enterprise,North,2024-01-05,300\n\
        O2,C2,Globex,SMB,South,2024-01-09,100\n\
        O3,C3,Initech,SMB,South,2024-01-21,100\n\
        O4,C1,Acme,Enterprise,North,2024-02-02,200\n\
        O5,C4,Umbrella,Enterprise,East,2024-02-14,200\n\
        O6,C3,Initech,SMB,South,2024-02-27,100\n";

    #[test]
    fn order_kpis() -> anyhow::Result<()> {
        let ds = Dataset::<CustomerOrder>::from_csv(CSV)?;
        let s = summarize(&ds, &DashboardConfig::default());
        assert_eq!(s.total_orders, 6);
        assert_eq!(s.total_revenue, 1000.0);
        assert_eq!(s.distinct_customers, 4);
        assert_eq!(s.avg_orders_per_customer, Some(1.5));
        assert_eq!(s.monthly_orders.len(), 2);
        assert_eq!(s.order_growth_pct, Some(0.0));
        // C1 and C3 of {C1, C2, C3} came back
        let retention = s.retention_pct.unwrap();
        assert!((retention - 66.666_666).abs() < 1e-4);
        assert_eq!(s.segment_share[0].name, "Enterprise");
        assert_eq!(s.segment_share[0].value, 70.0);
        assert_eq!(s.top_customers[0].name, "Acme");
        assert_eq!(s.top_customers[0].customer_id, "C1");
        assert_eq!(s.top_customers[0].value, 500.0);
        Ok(())
    }

    #[test]
    fn empty_orders() -> anyhow::Result<()> {
        let ds = Dataset::<CustomerOrder>::from_csv(
            "OrderID,CustomerID,CustomerName,Segment,Region,OrderDate,Revenue\n",
        )?;
        let s = summarize(&ds, &DashboardConfig::default());
        assert_eq!(s.total_orders, 0);
        assert_eq!(s.avg_orders_per_customer, None);
        assert_eq!(s.avg_order_value, None);
        assert_eq!(s.retention_pct, None);
        assert!(s.segment_share.is_empty());
        Ok(())
    }

    #[test]
    fn namesakes_rank_separately() -> anyhow::Result<()> {
        let csv = "OrderID,CustomerID,CustomerName,Segment,Region,OrderDate,Revenue\n\
            O1,C-07,Acme,SMB,North,2024-01-05,300\n\
            O2,C-12,Acme,SMB,South,2024-01-09,250\n\
            O3,C-20,Globex,SMB,East,2024-01-21,400\n";
        let ds = Dataset::<CustomerOrder>::from_csv(csv)?;
        let cfg = DashboardConfig {
            top_n: 2,
            ..DashboardConfig::default()
        };
        let s = summarize(&ds, &cfg);
        let top: Vec<(&str, &str, f64)> = s
            .top_customers
            .iter()
            .map(|c| (c.customer_id.as_str(), c.name.as_str(), c.value))
            .collect();
        assert_eq!(top, vec![("C-20", "Globex", 400.0), ("C-07", "Acme", 300.0)]);
        Ok(())
    }
}

use serde::Serialize;
use std::fmt;

use super::fmt_pct;
use crate::aggregate::{
    last_period_delta, ratio_pct, series, sum_by_month, top_n, total, year_over_year_pct,
    MonthlyValue, RankedEntry,
};
use crate::datasets::{Dataset, FinancialEntry};

/// P&L overview: gross margin, growth and profitability by category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialKpiSummary {
    pub rows: usize,
    pub total_revenue: f64,
    pub total_cogs: f64,
    pub gross_profit: f64,
    pub gross_margin_pct: Option<f64>,
    pub mom_revenue_growth_pct: Option<f64>,
    pub yoy_revenue_growth_pct: Option<f64>,
    pub monthly_revenue: Vec<MonthlyValue>,
    pub monthly_profit: Vec<MonthlyValue>,
    /// Every category, most profitable first.
    pub profit_by_category: Vec<RankedEntry>,
}

pub fn summarize(ds: &Dataset<FinancialEntry>) -> FinancialKpiSummary {
    let rows = ds.rows.as_slice();
    let total_revenue = total(rows, |r| r.revenue);
    let total_cogs = total(rows, |r| r.cogs);
    let gross_profit = total_revenue - total_cogs;

    let revenue_by_month = sum_by_month(rows, |r| r.month, |r| r.revenue);
    let profit_by_month = sum_by_month(rows, |r| r.month, FinancialEntry::profit);

    FinancialKpiSummary {
        rows: rows.len(),
        total_revenue,
        total_cogs,
        gross_profit,
        gross_margin_pct: ratio_pct(gross_profit, total_revenue),
        mom_revenue_growth_pct: last_period_delta(&revenue_by_month),
        yoy_revenue_growth_pct: year_over_year_pct(&revenue_by_month),
        monthly_revenue: series(&revenue_by_month),
        monthly_profit: series(&profit_by_month),
        profit_by_category: top_n(rows, |r| r.category.as_str(), FinancialEntry::profit, usize::MAX),
    }
}

impl fmt::Display for FinancialKpiSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total revenue:       {:.2}", self.total_revenue)?;
        writeln!(f, "Total COGS:          {:.2}", self.total_cogs)?;
        writeln!(f, "Gross profit:        {:.2}", self.gross_profit)?;
        writeln!(f, "Gross margin:        {}", fmt_pct(self.gross_margin_pct))?;
        writeln!(f, "MoM revenue growth:  {}", fmt_pct(self.mom_revenue_growth_pct))?;
        writeln!(f, "YoY revenue growth:  {}", fmt_pct(self.yoy_revenue_growth_pct))?;
        writeln!(f, "Profit by category:")?;
        for e in &self.profit_by_category {
            writeln!(f, "  {:<24} {:.2}", e.name, e.value)?;
        }
        Ok(())
    }
}

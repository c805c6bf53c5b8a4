use serde::Serialize;

use super::{Record, RowView};
use crate::parse::{MonthKey, ParseError};

/// One line of `financial_kpis.csv`: revenue and cost of goods sold for a
/// category in a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialEntry {
    pub month: MonthKey,
    pub category: String,
    pub revenue: f64,
    pub cogs: f64,
}

impl FinancialEntry {
    pub fn profit(&self) -> f64 {
        self.revenue - self.cogs
    }
}

impl Record for FinancialEntry {
    const COLUMNS: &'static [&'static str] = &["Month", "Category", "Revenue", "COGS"];

    fn from_row(row: &RowView<'_>) -> Result<Self, ParseError> {
        Ok(Self {
            month: row.month("Month")?,
            category: row.text("Category")?,
            revenue: row.number("Revenue")?,
            cogs: row.number("COGS")?,
        })
    }
}

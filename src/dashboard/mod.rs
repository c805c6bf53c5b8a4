// src/dashboard/mod.rs
//! Per-project KPI summaries, the data behind each case-study page.

use serde::Serialize;
use std::fmt;
use tracing::info;

use crate::config::DashboardConfig;
use crate::datasets::{CustomerOrder, Dataset, FinancialEntry, PartsSale};
use crate::fetch::Project;
use crate::parse::ParseError;

pub mod financial_kpis;
pub mod order_trends;
pub mod parts_pricing;

pub use financial_kpis::FinancialKpiSummary;
pub use order_trends::OrderTrendsSummary;
pub use parts_pricing::PartsPricingSummary;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "project", rename_all = "kebab-case")]
pub enum Summary {
    PartsPricing(PartsPricingSummary),
    OrderTrends(OrderTrendsSummary),
    FinancialKpis(FinancialKpiSummary),
}

impl Summary {
    pub fn project(&self) -> Project {
        match self {
            Summary::PartsPricing(_) => Project::PartsPricing,
            Summary::OrderTrends(_) => Project::OrderTrends,
            Summary::FinancialKpis(_) => Project::FinancialKpis,
        }
    }
}

/// Parse `csv` as the dataset of `project` and compute its summary.
pub fn build_summary(
    project: Project,
    csv: &str,
    cfg: &DashboardConfig,
) -> Result<Summary, ParseError> {
    let summary = match project {
        Project::PartsPricing => {
            let ds = Dataset::<PartsSale>::from_csv(csv)?;
            info!(%project, rows = ds.len(), "summarizing");
            Summary::PartsPricing(parts_pricing::summarize(&ds, cfg))
        }
        Project::OrderTrends => {
            let ds = Dataset::<CustomerOrder>::from_csv(csv)?;
            info!(%project, rows = ds.len(), "summarizing");
            Summary::OrderTrends(order_trends::summarize(&ds, cfg))
        }
        Project::FinancialKpis => {
            let ds = Dataset::<FinancialEntry>::from_csv(csv)?;
            info!(%project, rows = ds.len(), "summarizing");
            Summary::FinancialKpis(financial_kpis::summarize(&ds))
        }
    };
    Ok(summary)
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.project().title())?;
        match self {
            Summary::PartsPricing(s) => fmt::Display::fmt(s, f),
            Summary::OrderTrends(s) => fmt::Display::fmt(s, f),
            Summary::FinancialKpis(s) => fmt::Display::fmt(s, f),
        }
    }
}

/// Two-decimal percentage, or `n/a` when the ratio is unavailable.
pub fn fmt_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}%"),
        None => "n/a".to_string(),
    }
}

pub fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_on_project() -> anyhow::Result<()> {
        let cfg = DashboardConfig::default();
        let summary = build_summary(
            Project::FinancialKpis,
            "Month,Category,Revenue,COGS\n2024-01,Parts,100,60\n",
            &cfg,
        )?;
        assert_eq!(summary.project(), Project::FinancialKpis);
        assert!(summary.to_string().starts_with("== Financial KPI Tracker =="));

        let json = serde_json::to_value(&summary)?;
        assert_eq!(json["project"], "financial-kpis");
        assert_eq!(json["gross_margin_pct"], 40.0);
        assert_eq!(json["monthly_revenue"][0]["month"], "2024-01");
        Ok(())
    }

    #[test]
    fn wrong_dataset_for_project_is_rejected() {
        let err = build_summary(
            Project::OrderTrends,
            "Month,Category,Revenue,COGS\n2024-01,Parts,100,60\n",
            &DashboardConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::MissingColumn(ref c) if c == "OrderID"));
    }

    #[test]
    fn unavailable_values_render_as_na() {
        assert_eq!(fmt_pct(None), "n/a");
        assert_eq!(fmt_pct(Some(12.3456)), "12.35%");
        assert_eq!(fmt_opt(Some(1.5)), "1.50");
    }
}

//! Data pipeline behind the Power BI case-study dashboards: fetch a small
//! CSV, parse it into typed rows, and aggregate it into page KPIs.

pub mod aggregate;
pub mod config;
pub mod contact;
pub mod dashboard;
pub mod datasets;
pub mod fetch;
pub mod page;
pub mod parse;

pub use config::DashboardConfig;
pub use dashboard::{build_summary, Summary};
pub use fetch::{CancelToken, Project};
pub use page::{Page, PageState};

// src/fetch/urls.rs
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use url::Url;

/// The three case studies. Each owns one dataset and a handful of inert
/// downloadable artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Project {
    PartsPricing,
    OrderTrends,
    FinancialKpis,
}

/// Kinds of static asset published next to a dataset. Only `Dataset` is
/// ever parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Dataset,
    Sql,
    Dax,
    Python,
}

impl AssetKind {
    fn dir(self) -> &'static str {
        match self {
            AssetKind::Dataset => "dataset",
            AssetKind::Sql => "sql",
            AssetKind::Dax => "dax",
            AssetKind::Python => "python",
        }
    }
}

/// Where a project's files live under `/portfolio/`.
struct ProjectAssets {
    slug: &'static str,
    dir: &'static str,
    dataset: &'static str,
    sql: &'static str,
    dax: &'static str,
    python: Option<&'static str>,
}

static PARTS_PRICING: ProjectAssets = ProjectAssets {
    slug: "parts-pricing",
    dir: "parts_pricing",
    dataset: "parts_pricing_sales.csv",
    sql: "parts_pricing_transform.sql",
    dax: "parts_pricing_dax.txt",
    python: Some("parts_pricing_cleaning.py"),
};

static ORDER_TRENDS: ProjectAssets = ProjectAssets {
    slug: "order-trends",
    dir: "order_trends",
    dataset: "customer_orders.csv",
    sql: "customer_orders_transform.sql",
    dax: "order_trends_dax.txt",
    python: None,
};

static FINANCIAL_KPIS: ProjectAssets = ProjectAssets {
    slug: "financial-kpis",
    dir: "financial_kpis",
    dataset: "financial_kpis.csv",
    sql: "financial_kpis_transform.sql",
    dax: "financial_kpis_dax.txt",
    python: None,
};

impl Project {
    pub const ALL: [Project; 3] = [
        Project::PartsPricing,
        Project::OrderTrends,
        Project::FinancialKpis,
    ];

    fn assets(self) -> &'static ProjectAssets {
        match self {
            Project::PartsPricing => &PARTS_PRICING,
            Project::OrderTrends => &ORDER_TRENDS,
            Project::FinancialKpis => &FINANCIAL_KPIS,
        }
    }

    pub fn slug(self) -> &'static str {
        self.assets().slug
    }

    pub fn title(self) -> &'static str {
        match self {
            Project::PartsPricing => "Parts Pricing & Sales Dashboard",
            Project::OrderTrends => "Customer Order Trends Dashboard",
            Project::FinancialKpis => "Financial KPI Tracker",
        }
    }

    /// Client-side route of the case-study page.
    pub fn route(self) -> String {
        format!("/projects/{}", self.slug())
    }

    /// Map a page route to its project. Any other route, including the
    /// non-dashboard pages, is `None`.
    pub fn from_route(route: &str) -> Option<Self> {
        let slug = route.trim_end_matches('/').strip_prefix("/projects/")?;
        Self::ALL.into_iter().find(|p| p.slug() == slug)
    }

    /// File name of the asset, `None` when the project does not ship one.
    pub fn asset_file(self, kind: AssetKind) -> Option<&'static str> {
        let assets = self.assets();
        match kind {
            AssetKind::Dataset => Some(assets.dataset),
            AssetKind::Sql => Some(assets.sql),
            AssetKind::Dax => Some(assets.dax),
            AssetKind::Python => assets.python,
        }
    }

    /// Site-relative path, e.g. `/portfolio/order_trends/dataset/customer_orders.csv`.
    pub fn asset_path(self, kind: AssetKind) -> Option<String> {
        let file = self.asset_file(kind)?;
        Some(format!("/portfolio/{}/{}/{}", self.assets().dir, kind.dir(), file))
    }

    /// Absolute URL of the asset under `base`.
    pub fn asset_url(self, base: &Url, kind: AssetKind) -> Option<Result<Url, url::ParseError>> {
        self.asset_path(kind).map(|path| base.join(&path))
    }

    pub fn dataset_url(self, base: &Url) -> Result<Url, url::ParseError> {
        let assets = self.assets();
        base.join(&format!(
            "/portfolio/{}/dataset/{}",
            assets.dir, assets.dataset
        ))
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Project {
    type Err = String;

    /// Accepts the slug (`order-trends`) or the full route.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.slug() == s)
            .or_else(|| Self::from_route(s))
            .ok_or_else(|| format!("unknown project {s:?}"))
    }
}

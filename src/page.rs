// src/page.rs
//! Lifecycle of one dashboard page: `Loading` until its single load settles
//! into `Ready` or `Error`.

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::config::DashboardConfig;
use crate::dashboard::{build_summary, Summary};
use crate::fetch::{fetch_dataset, CancelToken, FetchError, Project};
use crate::parse::ParseError;

/// Why a load produced no summary.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("dataset is malformed: {0}")]
    Parse(#[from] ParseError),
}

/// Load attempts that leave the page untouched.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PageError {
    #[error("{0} page was torn down before its data arrived")]
    Cancelled(Project),
    #[error("{0} page has already finished loading")]
    AlreadySettled(Project),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "lowercase")]
pub enum PageState {
    Loading,
    Ready(Summary),
    Error(String),
}

pub struct Page {
    project: Project,
    state: PageState,
    cancel: CancelToken,
}

impl Page {
    /// A freshly mounted page.
    pub fn new(project: Project) -> Self {
        Self {
            project,
            state: PageState::Loading,
            cancel: CancelToken::new(),
        }
    }

    pub fn project(&self) -> Project {
        self.project
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn into_state(self) -> PageState {
        self.state
    }

    /// Token tied to this page's lifetime; cancel it to abandon the load.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn unmount(&self) {
        self.cancel.cancel();
    }

    /// Fetch, parse and summarize the project's dataset, then settle.
    pub async fn load(
        &mut self,
        client: &Client,
        base: &Url,
        cfg: &DashboardConfig,
    ) -> Result<&PageState, PageError> {
        self.ensure_loading()?;
        let result = match fetch_dataset(client, base, self.project, &self.cancel).await {
            Ok(text) => build_summary(self.project, &text, cfg).map_err(LoadError::from),
            Err(FetchError::Cancelled(_)) => return Err(PageError::Cancelled(self.project)),
            Err(e) => Err(e.into()),
        };
        self.settle(result)
    }

    /// Settle from CSV text already in hand, skipping the fetch.
    pub fn load_text(&mut self, text: &str, cfg: &DashboardConfig) -> Result<&PageState, PageError> {
        self.ensure_loading()?;
        let result = build_summary(self.project, text, cfg).map_err(LoadError::from);
        self.settle(result)
    }

    fn ensure_loading(&self) -> Result<(), PageError> {
        match self.state {
            PageState::Loading => Ok(()),
            _ => Err(PageError::AlreadySettled(self.project)),
        }
    }

    fn settle(&mut self, result: Result<Summary, LoadError>) -> Result<&PageState, PageError> {
        if self.cancel.is_cancelled() {
            warn!(project = %self.project, "discarding result for unmounted page");
            return Err(PageError::Cancelled(self.project));
        }
        self.state = match result {
            Ok(summary) => {
                info!(project = %self.project, "ready");
                PageState::Ready(summary)
            }
            Err(e) => {
                warn!(project = %self.project, error = %e, "load failed");
                PageState::Error(e.to_string())
            }
        };
        Ok(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{build_client, test_server};
    use std::time::Duration;

    const FINANCIAL: &str = "Month,Category,Revenue,COGS\n2024-01,Parts,100,60\n2024-02,Parts,150,90\n";

    #[tokio::test]
    async fn loading_to_ready() -> anyhow::Result<()> {
        let base = test_server::serve(200, FINANCIAL, Duration::ZERO).await;
        let client = build_client(Duration::from_secs(5))?;
        let mut page = Page::new(Project::FinancialKpis);
        assert_eq!(page.state(), &PageState::Loading);

        let state = page.load(&client, &base, &DashboardConfig::default()).await?;
        match state {
            PageState::Ready(Summary::FinancialKpis(s)) => {
                assert_eq!(s.gross_margin_pct, Some(40.0))
            }
            other => panic!("unexpected state {other:?}"),
        }

        // one transition per mount
        let again = page.load(&client, &base, &DashboardConfig::default()).await;
        assert_eq!(again.unwrap_err(), PageError::AlreadySettled(Project::FinancialKpis));
        Ok(())
    }

    #[tokio::test]
    async fn loading_to_error_on_http_failure() -> anyhow::Result<()> {
        let base = test_server::serve(500, "boom", Duration::ZERO).await;
        let client = build_client(Duration::from_secs(5))?;
        let mut page = Page::new(Project::PartsPricing);
        let state = page.load(&client, &base, &DashboardConfig::default()).await?;
        match state {
            PageState::Error(msg) => assert!(msg.contains("500"), "{msg}"),
            other => panic!("unexpected state {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn unmounted_page_discards_late_result() -> anyhow::Result<()> {
        let base = test_server::serve(200, FINANCIAL, Duration::from_millis(500)).await;
        let client = build_client(Duration::from_secs(5))?;
        let mut page = Page::new(Project::FinancialKpis);
        let token = page.cancel_token();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });
        let res = page.load(&client, &base, &DashboardConfig::default()).await;
        assert_eq!(res.unwrap_err(), PageError::Cancelled(Project::FinancialKpis));
        assert_eq!(page.state(), &PageState::Loading);
        Ok(())
    }

    #[test]
    fn malformed_text_settles_as_error() {
        let mut page = Page::new(Project::FinancialKpis);
        let state = page
            .load_text(
                "Month,Category,Revenue,COGS\n2024-01,Parts,abc,60\n",
                &DashboardConfig::default(),
            )
            .unwrap();
        match state {
            PageState::Error(msg) => assert!(msg.contains("Revenue"), "{msg}"),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn unmount_before_settle() {
        let mut page = Page::new(Project::OrderTrends);
        page.unmount();
        let res = page.load_text("", &DashboardConfig::default());
        assert_eq!(res.unwrap_err(), PageError::Cancelled(Project::OrderTrends));
    }
}

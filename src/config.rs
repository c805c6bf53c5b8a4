// src/config.rs
use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};
use url::Url;

use crate::aggregate::DEFAULT_TOP_N;

/// Settings for loading dashboards. Every field has a default, so a YAML
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Site that serves `/portfolio/...` assets.
    pub base_url: String,
    /// Rows kept in every top-N table.
    pub top_n: usize,
    pub request_timeout_secs: u64,
    /// Window of the rolling average unit price, in sales.
    pub rolling_window: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            top_n: DEFAULT_TOP_N,
            request_timeout_secs: 10,
            rolling_window: 3,
        }
    }
}

impl DashboardConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        let cfg: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config {:?}", path))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        ensure!(self.top_n > 0, "top_n must be at least 1");
        ensure!(self.rolling_window > 0, "rolling_window must be at least 1");
        ensure!(
            self.request_timeout_secs > 0,
            "request_timeout_secs must be at least 1"
        );
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url {:?}", self.base_url))?;
        ensure!(
            matches!(url.scheme(), "http" | "https"),
            "base_url must be http or https, got {}",
            url.scheme()
        );
        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

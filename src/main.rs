use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use kpiboard::{
    fetch::build_client, page::PageError, DashboardConfig, Page, PageState, Project,
};
use serde::Serialize;
use std::path::PathBuf;
use tokio::{task::JoinSet, time::Instant};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Load the Power BI case-study datasets and print their KPIs"
)]
struct Args {
    /// parts-pricing, order-trends, financial-kpis, a /projects/... route, or "all"
    #[arg(default_value = "all")]
    project: String,
    /// Site serving /portfolio/... assets
    #[arg(long)]
    base_url: Option<String>,
    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    top_n: Option<usize>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,
    /// Read the dataset from a local CSV instead of fetching it
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Serialize)]
struct PageReport {
    route: String,
    state: PageState,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging (stderr, stdout carries the report) ─────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // ─── 2) config: file, then flags ─────────────────────────────────
    let mut cfg = match &args.config {
        Some(path) => DashboardConfig::from_yaml_file(path)?,
        None => DashboardConfig::default(),
    };
    if let Some(url) = &args.base_url {
        cfg.base_url = url.clone();
    }
    if let Some(n) = args.top_n {
        cfg.top_n = n;
    }
    if let Some(secs) = args.timeout_secs {
        cfg.request_timeout_secs = secs;
    }
    cfg.validate()?;

    let projects: Vec<Project> = if args.project == "all" {
        Project::ALL.to_vec()
    } else {
        vec![args.project.parse().map_err(anyhow::Error::msg)?]
    };

    // ─── 3) load every page ──────────────────────────────────────────
    let start = Instant::now();
    let states = match &args.file {
        Some(path) => {
            if projects.len() != 1 {
                bail!("--file needs exactly one project");
            }
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {:?}", path))?;
            let mut page = Page::new(projects[0]);
            page.load_text(&text, &cfg)?;
            vec![(page.project(), page.into_state())]
        }
        None => load_pages(&projects, &cfg).await?,
    };
    info!(pages = states.len(), elapsed = ?start.elapsed(), "loaded");

    // ─── 4) present ──────────────────────────────────────────────────
    let failed = states
        .iter()
        .filter(|(_, s)| matches!(s, PageState::Error(_)))
        .count();
    match args.format {
        Format::Json => {
            let reports: Vec<PageReport> = states
                .into_iter()
                .map(|(p, state)| PageReport {
                    route: p.route(),
                    state,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Format::Text => {
            for (project, state) in states {
                match state {
                    PageState::Ready(summary) => println!("{summary}"),
                    PageState::Error(msg) => println!("== {} ==\nerror: {msg}\n", project.title()),
                    PageState::Loading => println!("== {} ==\nstill loading\n", project.title()),
                }
            }
        }
    }

    if failed > 0 {
        bail!("{failed} page(s) failed to load");
    }
    Ok(())
}

/// Load each page on its own task. Ctrl-C unmounts every page still loading.
async fn load_pages(
    projects: &[Project],
    cfg: &DashboardConfig,
) -> Result<Vec<(Project, PageState)>> {
    let client = build_client(cfg.request_timeout()).context("building HTTP client")?;
    let base = cfg.base_url()?;

    let pages: Vec<Page> = projects.iter().map(|&p| Page::new(p)).collect();
    let tokens: Vec<_> = pages.iter().map(Page::cancel_token).collect();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted; cancelling outstanding loads");
            for t in &tokens {
                t.cancel();
            }
        }
    });

    let mut set = JoinSet::new();
    for (idx, mut page) in pages.into_iter().enumerate() {
        let client = client.clone();
        let base = base.clone();
        let cfg = cfg.clone();
        set.spawn(async move {
            if let Err(e) = page.load(&client, &base, &cfg).await {
                match &e {
                    PageError::Cancelled(_) => warn!("{e}"),
                    PageError::AlreadySettled(_) => error!("{e}"),
                }
            }
            (idx, page.project(), page.into_state())
        });
    }

    let mut results = Vec::with_capacity(projects.len());
    while let Some(joined) = set.join_next().await {
        results.push(joined?);
    }
    results.sort_by_key(|(idx, _, _)| *idx);
    Ok(results.into_iter().map(|(_, p, s)| (p, s)).collect())
}

// src/fetch/mod.rs
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{info, warn};
use url::Url;

pub mod cancel;
pub mod urls;

pub use cancel::CancelToken;
pub use urls::{AssetKind, Project};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("GET {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("fetch of {0} was cancelled")]
    Cancelled(String),
    #[error("invalid asset url: {0}")]
    Url(#[from] url::ParseError),
}

/// HTTP client shared by every page load.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).gzip(true).build()
}

/// GET `url` and return the body as text.
///
/// The request races `cancel`: if the token fires first the request is
/// dropped, and a body that arrives after cancellation is discarded. There
/// is no retry.
#[tracing::instrument(level = "info", skip(client, url, cancel), fields(url = %url))]
pub async fn fetch_text(
    client: &Client,
    url: &Url,
    cancel: &CancelToken,
) -> Result<String, FetchError> {
    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled(url.to_string()));
    }
    let start = Instant::now();

    let request = async {
        let resp = client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        resp.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    };

    let body = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!("cancelled while in flight");
            return Err(FetchError::Cancelled(url.to_string()));
        }
        res = request => res?,
    };

    if cancel.is_cancelled() {
        warn!(bytes = body.len(), "discarding body that arrived after cancellation");
        return Err(FetchError::Cancelled(url.to_string()));
    }

    info!(bytes = body.len(), elapsed = ?start.elapsed(), "fetched");
    Ok(body)
}

/// Fetch the dataset CSV of `project` from the site at `base`.
pub async fn fetch_dataset(
    client: &Client,
    base: &Url,
    project: Project,
    cancel: &CancelToken,
) -> Result<String, FetchError> {
    let url = project.dataset_url(base)?;
    fetch_text(client, &url, cancel).await
}

#[cfg(test)]
pub(crate) mod test_server {
    //! One-shot HTTP responder on a loopback port.
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use url::Url;

    /// Serve `body` with `status` to every connection, after `delay`.
    pub async fn serve(status: u16, body: &'static str, delay: Duration) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut sock, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = sock.read(&mut buf).await;
                    tokio::time::sleep(delay).await;
                    let resp = format!(
                        "HTTP/1.1 {status} X\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = sock.write_all(resp.as_bytes()).await;
                    let _ = sock.shutdown().await;
                });
            }
        });
        Url::parse(&format!("http://{addr}/")).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    const CSV: &str = "Month,Category,Revenue,COGS\n2024-01,Parts,100,60\n";

    #[tokio::test]
    async fn fetches_body_from_server() -> Result<()> {
        let base = test_server::serve(200, CSV, Duration::ZERO).await;
        let client = build_client(Duration::from_secs(5))?;
        let body = fetch_dataset(&client, &base, Project::FinancialKpis, &CancelToken::new()).await?;
        assert_eq!(body, CSV);
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() -> Result<()> {
        let base = test_server::serve(404, "missing", Duration::ZERO).await;
        let client = build_client(Duration::from_secs(5))?;
        let err = fetch_dataset(&client, &base, Project::OrderTrends, &CancelToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status, .. } if status == StatusCode::NOT_FOUND));
        Ok(())
    }

    #[tokio::test]
    async fn cancellation_discards_in_flight_fetch() -> Result<()> {
        let base = test_server::serve(200, CSV, Duration::from_secs(2)).await;
        let client = build_client(Duration::from_secs(5))?;
        let cancel = CancelToken::new();

        let task = tokio::spawn({
            let cancel = cancel.clone();
            async move { fetch_dataset(&client, &base, Project::FinancialKpis, &cancel).await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let res = tokio::time::timeout(Duration::from_secs(1), task).await??;
        assert!(matches!(res, Err(FetchError::Cancelled(_))));
        Ok(())
    }

    #[tokio::test]
    async fn refused_connection_is_a_request_error() -> Result<()> {
        let client = build_client(Duration::from_secs(2))?;
        let url = Url::parse("http://127.0.0.1:9/portfolio/x.csv")?;
        let err = fetch_text(&client, &url, &CancelToken::new()).await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
        Ok(())
    }
}

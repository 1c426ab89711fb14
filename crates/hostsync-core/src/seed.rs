//! Initial hosts loading
//!
//! The provider starts from an optional seed in hosts-file format. The seed
//! is decoded with the same rules as any other hosts file, so an invalid
//! hostname in the seed fails startup.
//!
//! Supported sources:
//!
//! - `http://…` and `https://…`: fetched once
//! - `file://<path>` or a plain path: read from disk

use std::time::Duration;

use crate::error::{Error, Result};
use crate::hosts::Hosts;

/// Timeout for fetching a remote seed
const SEED_FETCH_TIMEOUT_SECS: u64 = 30;

/// Where the seed comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSource<'a> {
    /// Remote hosts file fetched over HTTP(S)
    Url(&'a str),
    /// Local hosts file
    Path(&'a str),
}

impl<'a> SeedSource<'a> {
    /// Classify a seed location
    pub fn parse(source: &'a str) -> Self {
        if source.starts_with("http://") || source.starts_with("https://") {
            Self::Url(source)
        } else {
            Self::Path(source.strip_prefix("file://").unwrap_or(source))
        }
    }
}

/// Load and decode the initial record set
///
/// `None` yields an empty record set.
pub async fn load_seed(source: Option<&str>) -> Result<Hosts> {
    let Some(source) = source else {
        tracing::debug!("No initial hosts source configured");
        return Ok(Hosts::new());
    };

    let bytes = match SeedSource::parse(source) {
        SeedSource::Url(url) => fetch(url).await?,
        SeedSource::Path(path) => tokio::fs::read(path)
            .await
            .map_err(|e| Error::seed(format!("Failed to read initial hosts {path}: {e}")))?,
    };

    tracing::info!(source = %source, bytes = bytes.len(), "Opened initial hosts");

    let hosts = Hosts::decode(bytes.as_slice())?;
    tracing::info!(entries = hosts.len(), "Parsed initial hosts");

    Ok(hosts)
}

async fn fetch(url: &str) -> Result<Vec<u8>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(SEED_FETCH_TIMEOUT_SECS))
        .build()?;

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::seed(format!(
            "Failed to fetch initial hosts {url}: HTTP {status}"
        )));
    }

    Ok(response.bytes().await?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a loopback port and return its URL
    async fn serve_once(status: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{addr}/lab.hosts")
    }

    #[test]
    fn test_seed_source_parse() {
        assert_eq!(
            SeedSource::parse("https://example.com/hosts"),
            SeedSource::Url("https://example.com/hosts")
        );
        assert_eq!(
            SeedSource::parse("http://10.0.0.1/hosts"),
            SeedSource::Url("http://10.0.0.1/hosts")
        );
        assert_eq!(SeedSource::parse("file:///etc/hosts"), SeedSource::Path("/etc/hosts"));
        assert_eq!(SeedSource::parse("./hosts"), SeedSource::Path("./hosts"));
    }

    #[tokio::test]
    async fn test_no_seed_is_empty() {
        assert!(load_seed(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seed_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed");
        std::fs::write(&path, "# lab\n0.0.0.0 frantj.cc\n").unwrap();

        let hosts = load_seed(Some(path.to_str().unwrap())).await.unwrap();
        assert_eq!(hosts.to_string(), "0.0.0.0 frantj.cc\n");

        let url = format!("file://{}", path.display());
        assert_eq!(load_seed(Some(&url)).await.unwrap(), hosts);
    }

    #[tokio::test]
    async fn test_seed_with_invalid_hostname_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed");
        std::fs::write(&path, "10.0.0.1 bad!name\n").unwrap();

        let err = load_seed(Some(path.to_str().unwrap())).await.unwrap_err();
        assert!(matches!(err, Error::InvalidHostname(_)));
    }

    #[tokio::test]
    async fn test_missing_seed_file_fails() {
        let err = load_seed(Some("/nonexistent/hostsync/seed")).await.unwrap_err();
        assert!(matches!(err, Error::Seed(_)));
    }

    #[tokio::test]
    async fn test_seed_from_http() {
        let url = serve_once("200 OK", "# lab\n0.0.0.0 frantj.cc\n127.0.0.1 localhost.frantj.cc\n").await;

        let hosts = load_seed(Some(&url)).await.unwrap();
        assert_eq!(
            hosts.to_string(),
            "0.0.0.0 frantj.cc\n127.0.0.1 localhost.frantj.cc\n"
        );
    }

    #[tokio::test]
    async fn test_seed_http_error_status_fails() {
        let url = serve_once("404 Not Found", "missing").await;

        let err = load_seed(Some(&url)).await.unwrap_err();
        assert!(matches!(err, Error::Seed(ref msg) if msg.contains("404")));
    }
}

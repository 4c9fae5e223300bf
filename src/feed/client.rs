// Keyword feed HTTP client.
// Performs the single bounded GET against the feed endpoint and truncates the result.

use std::time::Duration;

use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{FetchError, Result, TrendlyError};

use super::types::{MAX_ENTRIES, WidgetSnapshot, parse_entries};

/// Source of keyword snapshots.
pub trait Fetch: Send + Sync {
    fn fetch(&self) -> impl Future<Output = std::result::Result<WidgetSnapshot, FetchError>> + Send;
}

/// HTTP client for the trending keyword feed.
pub struct FeedClient {
    client: Client,
    url: String,
}

impl FeedClient {
    /// Create a client for `url` with the given request timeout.
    ///
    /// `accept_invalid_certs` disables TLS certificate validation and must only be
    /// used against development servers.
    pub fn new(url: &str, timeout: Duration, accept_invalid_certs: bool) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("trendly/", env!("CARGO_PKG_VERSION"))),
        );

        if accept_invalid_certs {
            tracing::warn!(
                event = "feed.tls_validation_disabled",
                url = url,
                "TLS certificate validation is disabled for the keyword feed"
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(TrendlyError::Client)?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Fetch the current ranking, keeping the first five usable entries.
    pub async fn get_keywords(&self) -> std::result::Result<WidgetSnapshot, FetchError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::BadStatus(status.as_u16()));
        }

        let body = response.text().await?;
        let entries = parse_entries(&body, MAX_ENTRIES)?;

        tracing::debug!(
            event = "feed.fetched",
            entries = entries.len(),
            "Fetched keywords from feed"
        );

        Ok(WidgetSnapshot::new(entries))
    }
}

impl Fetch for FeedClient {
    fn fetch(&self) -> impl Future<Output = std::result::Result<WidgetSnapshot, FetchError>> + Send {
        self.get_keywords()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response on a local port, returning the URL.
    pub(crate) async fn serve_once(status_line: &str, body: &str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut read = Vec::new();
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                read.extend_from_slice(&buf[..n]);
                if read.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/api/keyword/now/", addr)
    }

    fn client(url: &str) -> FeedClient {
        FeedClient::new(url, Duration::from_secs(5), false).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_truncates_to_five() {
        let body = r#"[
            {"id":1,"keyword":"A","rank":1},
            {"id":2,"keyword":"B","rank":2},
            {"id":3,"keyword":"C","rank":3},
            {"id":4,"keyword":"D","rank":4},
            {"id":5,"keyword":"E","rank":5},
            {"id":6,"keyword":"F","rank":6},
            {"id":7,"keyword":"G","rank":7}
        ]"#;
        let url = serve_once("200 OK", body).await;

        let snapshot = client(&url).fetch().await.unwrap();
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot.entries[4].keyword, "E");
        assert!(snapshot.last_updated.is_none());
    }

    #[tokio::test]
    async fn test_fetch_bad_status() {
        let url = serve_once("500 Internal Server Error", "oops").await;

        let err = client(&url).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::BadStatus(500)));
    }

    #[tokio::test]
    async fn test_fetch_parse_error() {
        let url = serve_once("200 OK", r#"{"detail":"nope"}"#).await;

        let err = client(&url).fetch().await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_network_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}/", addr))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }

    #[tokio::test]
    async fn test_fetch_times_out_on_stalled_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept the connection, then never answer.
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });

        let client = FeedClient::new(
            &format!("http://{}/", addr),
            Duration::from_millis(300),
            false,
        )
        .unwrap();
        let started = std::time::Instant::now();
        let err = client.fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Network(_)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}

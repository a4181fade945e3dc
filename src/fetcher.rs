//! HTTP fetcher for downloading blacklist and whitelist sources.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{HostsError, Result};
use crate::utils::format_bytes;

/// Maximum size per source file (50 MB)
/// The largest aggregated hosts lists are around 15 MB, so 50 MB leaves ample margin
const MAX_SOURCE_SIZE: usize = 50 * 1024 * 1024;

/// Whether an announced body length is over `MAX_SOURCE_SIZE`.
fn exceeds_source_limit(content_length: u64) -> bool {
    content_length > MAX_SOURCE_SIZE as u64
}

#[cfg(test)]
use mockall::automock;

/// Retrieves the text body of a URL.
///
/// The production implementation is [`HttpTransport`]; tests substitute
/// their own so that the pipeline can run without network access.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `url` once. Non-2xx responses, timeouts and connection
    /// errors are all reported as [`HostsError::SourceFetch`].
    async fn get_text(&self, url: &str) -> Result<String>;
}

/// reqwest-backed transport with a fixed per-request timeout.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a new transport with the given request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("hostsmate/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HostsError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String> {
        let fetch_error = |reason: String| HostsError::SourceFetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(describe_reqwest_error(&e)))?;

        if !response.status().is_success() {
            return Err(fetch_error(format!("HTTP {}", response.status())));
        }

        if let Some(content_length) = response.content_length() {
            if exceeds_source_limit(content_length) {
                return Err(fetch_error(format!(
                    "Response too large: {} bytes (max: {} bytes)",
                    content_length, MAX_SOURCE_SIZE
                )));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| fetch_error(format!("Failed to read response body: {}", e)))?;

        // Double-check actual size after download
        if body.len() > MAX_SOURCE_SIZE {
            return Err(fetch_error(format!(
                "Downloaded content too large: {} bytes (max: {} bytes)",
                body.len(),
                MAX_SOURCE_SIZE
            )));
        }

        Ok(body)
    }
}

fn describe_reqwest_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}

/// Merged result of fetching a batch of sources.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    /// Every successful body, each followed by a newline, in arrival order
    pub buffer: String,
    /// Number of sources fetched successfully
    pub succeeded: usize,
    /// One error per failed source
    pub failures: Vec<HostsError>,
}

impl FetchOutcome {
    /// Total number of sources attempted.
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failures.len()
    }
}

/// Downloads sources concurrently with bounded parallelism.
pub struct Fetcher {
    transport: Box<dyn Transport>,
    max_concurrent: usize,
}

impl Fetcher {
    /// Create a fetcher using the HTTP transport and the limits from `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config.fetch_timeout())?;
        Ok(Self::with_transport(transport, config.max_concurrent_fetches))
    }

    /// Create a fetcher over an arbitrary transport.
    pub fn with_transport<T: Transport + 'static>(transport: T, max_concurrent: usize) -> Self {
        Self {
            transport: Box::new(transport),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Fetch a single source
    pub async fn fetch_source(&self, url: &str) -> Result<String> {
        info!("Fetching {}...", url);
        let body = self.transport.get_text(url).await?;
        debug!("Fetched {} ({})", url, format_bytes(body.len() as u64));
        Ok(body)
    }

    /// Fetch every URL with at most `max_concurrent` requests in flight.
    ///
    /// A failing source never aborts the batch: it is logged, recorded in
    /// [`FetchOutcome::failures`] and contributes nothing to the buffer.
    /// Bodies are merged into the buffer one at a time as they complete.
    pub async fn fetch_all(&self, urls: &[String]) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();

        let mut results = stream::iter(urls)
            .map(|url| self.fetch_source(url))
            .buffer_unordered(self.max_concurrent);

        while let Some(result) = results.next().await {
            match result {
                Ok(body) => {
                    outcome.buffer.push_str(&body);
                    outcome.buffer.push('\n');
                    outcome.succeeded += 1;
                }
                Err(e) => {
                    warn!("{}", e);
                    outcome.failures.push(e);
                }
            }
        }

        outcome
    }
}

// Note: Default is intentionally not implemented for Fetcher
// because new() can fail and we want explicit error handling.

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_source_limit_uses_full_length() {
        assert!(!exceeds_source_limit(0));
        assert!(!exceeds_source_limit(MAX_SOURCE_SIZE as u64));
        assert!(exceeds_source_limit(MAX_SOURCE_SIZE as u64 + 1));
        // Would wrap to a small value if narrowed to a 32-bit usize
        assert!(exceeds_source_limit(u64::from(u32::MAX) + 1));
        assert!(exceeds_source_limit(u64::MAX));
    }

    #[tokio::test]
    async fn test_fetch_all_merges_successes() {
        let mut mock = MockTransport::new();
        mock.expect_get_text()
            .returning(|url| Ok(format!("0.0.0.0 {}.test", url.len())));

        let fetcher = Fetcher::with_transport(mock, 4);
        let outcome = fetcher
            .fetch_all(&urls(&["https://a.example", "https://bb.example"]))
            .await;

        assert_eq!(outcome.succeeded, 2);
        assert!(outcome.failures.is_empty());
        assert!(outcome.buffer.contains("0.0.0.0 17.test\n"));
        assert!(outcome.buffer.contains("0.0.0.0 18.test\n"));
    }

    #[tokio::test]
    async fn test_fetch_all_tolerates_failures() {
        let mut mock = MockTransport::new();
        mock.expect_get_text().returning(|url| {
            if url.contains("broken") {
                Err(HostsError::SourceFetch {
                    url: url.to_string(),
                    reason: "HTTP 503 Service Unavailable".to_string(),
                })
            } else {
                Ok("ads.example.com".to_string())
            }
        });

        let fetcher = Fetcher::with_transport(mock, 2);
        let outcome = fetcher
            .fetch_all(&urls(&[
                "https://ok.example/hosts",
                "https://broken.example/hosts",
            ]))
            .await;

        assert_eq!(outcome.succeeded, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.attempted(), 2);
        assert_eq!(outcome.buffer, "ads.example.com\n");
        assert!(matches!(
            outcome.failures[0],
            HostsError::SourceFetch { .. }
        ));
    }

    #[tokio::test]
    async fn test_fetch_all_empty() {
        let mock = MockTransport::new();
        let fetcher = Fetcher::with_transport(mock, 2);
        let outcome = fetcher.fetch_all(&[]).await;
        assert_eq!(outcome.attempted(), 0);
        assert!(outcome.buffer.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_calls_each_url_once() {
        let mut mock = MockTransport::new();
        mock.expect_get_text()
            .times(5)
            .returning(|_| Ok(String::new()));

        let fetcher = Fetcher::with_transport(mock, 2);
        let list: Vec<String> = (0..5).map(|i| format!("https://s{}.example", i)).collect();
        let outcome = fetcher.fetch_all(&list).await;
        assert_eq!(outcome.succeeded, 5);
    }

    /// Transport that records the peak number of requests in flight.
    struct SlowTransport {
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Transport for SlowTransport {
        async fn get_text(&self, _url: &str) -> Result<String> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn test_fetch_all_bounds_concurrency() {
        let peak = Arc::new(AtomicUsize::new(0));
        let transport = SlowTransport {
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::clone(&peak),
        };

        let fetcher = Fetcher::with_transport(transport, 3);
        let list: Vec<String> = (0..12).map(|i| format!("https://s{}.example", i)).collect();
        let outcome = fetcher.fetch_all(&list).await;

        assert_eq!(outcome.succeeded, 12);
        let peak = peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak concurrency was {}", peak);
        assert!(peak >= 2, "requests were not run concurrently");
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_clamped() {
        let mut mock = MockTransport::new();
        mock.expect_get_text().returning(|_| Ok("x.com".to_string()));
        let fetcher = Fetcher::with_transport(mock, 0);
        let outcome = fetcher.fetch_all(&urls(&["https://a.example"])).await;
        assert_eq!(outcome.succeeded, 1);
    }

    #[tokio::test]
    async fn test_http_transport_connection_refused() {
        // Bind then drop a listener so the port is very likely closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        let result = transport.get_text(&format!("http://{}/hosts", addr)).await;
        assert!(matches!(result, Err(HostsError::SourceFetch { .. })));
    }
}

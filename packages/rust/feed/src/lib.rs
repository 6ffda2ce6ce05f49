//! Remote CSV feed retrieval.
//!
//! The showcase content lives in one spreadsheet published as a CSV export.
//! [`CsvSource`] issues exactly one GET per call, with no caching and no
//! retries, and parses the body into [`RawRow`]s honoring the header row.

mod parser;

use std::time::Duration;

use reqwest::Client;
use showcase_shared::{FeedSettings, RawRow, Result, ShowcaseError};
use tracing::{debug, info, instrument};
use url::Url;

pub use parser::parse_csv;

/// Maximum number of redirects to follow (published sheets redirect once or twice).
const MAX_REDIRECTS: usize = 5;

/// Maximum response size we accept (20 MB).
const MAX_RESPONSE_SIZE: u64 = 20 * 1024 * 1024;

/// User-Agent string for feed requests.
const USER_AGENT: &str = concat!("showcase-feed/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// CsvSource
// ---------------------------------------------------------------------------

/// A configured CSV export endpoint.
#[derive(Debug, Clone)]
pub struct CsvSource {
    url: Url,
    client: Client,
}

impl CsvSource {
    /// Build a source for the resolved feed settings.
    pub fn new(settings: &FeedSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ShowcaseError::fetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: settings.url.clone(),
            client,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch the feed and parse it into rows, in file order.
    ///
    /// Transport problems (DNS, connect, timeout, non-2xx, truncated body)
    /// surface as [`ShowcaseError::Fetch`]; a body that is not UTF-8 CSV
    /// surfaces as [`ShowcaseError::Parse`]. No partial rows are returned.
    #[instrument(skip_all, fields(url = %self.url))]
    pub async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        info!("fetching feed");

        let body = self.fetch_body().await?;
        let rows = parser::parse_csv_bytes(&body)?;

        info!(bytes = body.len(), rows = rows.len(), "feed parsed");
        Ok(rows)
    }

    async fn fetch_body(&self) -> Result<Vec<u8>> {
        let url = &self.url;
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| ShowcaseError::fetch(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShowcaseError::fetch(format!("{url}: HTTP {status}")));
        }

        if let Some(len) = response.content_length() {
            if len > MAX_RESPONSE_SIZE {
                return Err(ShowcaseError::validation(format!(
                    "{url}: response too large ({len} bytes, max {MAX_RESPONSE_SIZE})"
                )));
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ShowcaseError::fetch(format!("{url}: failed to read body: {e}")))?;

        debug!(bytes = body.len(), "feed body received");
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings_for(server: &MockServer, timeout_secs: u64) -> FeedSettings {
        FeedSettings {
            url: Url::parse(&format!("{}/sheet.csv", server.uri())).unwrap(),
            timeout_secs,
        }
    }

    #[tokio::test]
    async fn fetches_and_parses_fixture() {
        let server = MockServer::start().await;
        let body = std::fs::read_to_string("../../../fixtures/csv/showcase.csv")
            .expect("read csv fixture");

        Mock::given(method("GET"))
            .and(path("/sheet.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let source = CsvSource::new(&settings_for(&server, 10)).unwrap();
        let rows = source.fetch_rows().await.unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].get("Scheme"), Some("2021"));
        assert_eq!(rows[1].get("Team No"), Some("7"));
    }

    #[tokio::test]
    async fn every_call_issues_a_new_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sheet.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string("A\n1\n"))
            .expect(2)
            .mount(&server)
            .await;

        let source = CsvSource::new(&settings_for(&server, 10)).unwrap();
        source.fetch_rows().await.unwrap();
        source.fetch_rows().await.unwrap();
        // `expect(2)` is verified when the server drops.
    }

    #[tokio::test]
    async fn non_success_status_is_fetch_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sheet.csv"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = CsvSource::new(&settings_for(&server, 10)).unwrap();
        let err = source.fetch_rows().await.unwrap_err();

        assert!(err.is_fetch());
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn invalid_utf8_body_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sheet.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'A', b'\n', 0xc3, 0x28]))
            .mount(&server)
            .await;

        let source = CsvSource::new(&settings_for(&server, 10)).unwrap();
        let err = source.fetch_rows().await.unwrap_err();

        assert!(err.is_parse());
    }

    #[tokio::test]
    async fn slow_server_times_out_as_fetch_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/sheet.csv"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("A\n1\n")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let source = CsvSource::new(&settings_for(&server, 1)).unwrap();
        let err = source.fetch_rows().await.unwrap_err();

        assert!(err.is_fetch());
    }

    #[tokio::test]
    async fn unreachable_host_is_fetch_error() {
        let settings = FeedSettings {
            // Nothing listens on the discard port.
            url: Url::parse("http://127.0.0.1:9/sheet.csv").unwrap(),
            timeout_secs: 2,
        };
        let source = CsvSource::new(&settings).unwrap();
        let err = source.fetch_rows().await.unwrap_err();

        assert!(err.is_fetch());
    }
}

//! Guardian content API client.
//!
//! The search request is a single `GET /search` with a fixed query: the
//! requested sections, a date window, 200 results per page, relevance
//! ordering and an explicit field projection.
//!
//! # Architecture
//!
//! - [`ContentSearch`]: the seam the pipeline depends on
//! - [`GuardianClient`]: the real implementation on top of `reqwest`
//! - [`ApiConfig`]: credential and endpoint, passed in explicitly
//!
//! No retry is attempted: any transport error or non-success status
//! fails the run.

use crate::error::DigestError;
use crate::models::{SearchResponse, SectionFilter};
use chrono::{DateTime, Duration, Local};
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tracing::{error, info, instrument};
use url::Url;

/// Default search endpoint.
pub const GUARDIAN_SEARCH_URL: &str = "https://content.guardianapis.com/search";

/// Largest page size the API accepts.
pub const PAGE_SIZE: u32 = 200;

/// Fields requested through `show-fields`.
pub const SHOW_FIELDS: &str = "headline,trailText,byline,body,thumbnail,wordcount";

/// Something that can run a section search and hand back the raw payload.
pub trait ContentSearch {
    /// Run the query and return the decoded response envelope.
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, DigestError>;
}

/// Credential and endpoint for the content API.
#[derive(Clone)]
pub struct ApiConfig {
    /// API key; checked only when a request is about to be made.
    pub api_key: Option<String>,
    /// Search endpoint.
    pub endpoint: String,
    /// Client timeout. `None` leaves the transport default in place.
    pub timeout: Option<StdDuration>,
}

impl ApiConfig {
    /// The API key, or a configuration error when it is missing or blank.
    pub fn api_key(&self) -> Result<&str, DigestError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                DigestError::Configuration(
                    "Guardian API key missing; set GUARDIAN_API_KEY or pass --api-key".to_string(),
                )
            })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: GUARDIAN_SEARCH_URL.to_string(),
            timeout: None,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Parameters of one section search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Sections to search, joined with `|` on the wire.
    pub sections: SectionFilter,
    /// Earliest publication date, `YYYY-MM-DD`.
    pub from_date: String,
}

impl SearchQuery {
    /// Query for articles from `sections` published within `hours_back` hours of `now`.
    ///
    /// The API filters by day, so the cut-off is truncated to its date.
    pub fn new(
        sections: SectionFilter,
        hours_back: u32,
        now: DateTime<Local>,
    ) -> Result<Self, DigestError> {
        Ok(Self {
            sections,
            from_date: from_date(now, hours_back)?,
        })
    }

    /// Full request URL including the key.
    pub fn to_url(&self, endpoint: &str, api_key: &str) -> Result<Url, DigestError> {
        let sections = self.sections.to_query();
        let page_size = PAGE_SIZE.to_string();
        Url::parse_with_params(
            endpoint,
            &[
                ("api-key", api_key),
                ("section", sections.as_str()),
                ("page-size", page_size.as_str()),
                ("show-fields", SHOW_FIELDS),
                ("order-by", "relevance"),
                ("from-date", self.from_date.as_str()),
            ],
        )
        .map_err(|e| DigestError::Configuration(format!("invalid API endpoint `{endpoint}`: {e}")))
    }
}

/// `now - hours_back`, formatted as a date.
///
/// A window reaching past the range chrono can represent is a configuration
/// error.
pub fn from_date(now: DateTime<Local>, hours_back: u32) -> Result<String, DigestError> {
    Duration::try_hours(i64::from(hours_back))
        .and_then(|window| now.checked_sub_signed(window))
        .map(|cutoff| cutoff.format("%Y-%m-%d").to_string())
        .ok_or_else(|| {
            DigestError::Configuration(format!("--hours-back {hours_back} is out of range"))
        })
}

/// [`ContentSearch`] backed by the live Guardian API.
#[derive(Debug)]
pub struct GuardianClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl GuardianClient {
    /// Build a client; the timeout from `config` is applied here.
    pub fn new(config: ApiConfig) -> Result<Self, DigestError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| DigestError::Configuration(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }
}

impl ContentSearch for GuardianClient {
    #[instrument(level = "info", skip_all, fields(sections = %query.sections, from_date = %query.from_date))]
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, DigestError> {
        let api_key = self.config.api_key()?;
        let url = query.to_url(&self.config.endpoint, api_key)?;

        let t0 = Instant::now();
        let res = fetch(&self.http, url).await;
        let dt = t0.elapsed();

        match &res {
            Ok(payload) => info!(
                elapsed_ms = dt.as_millis(),
                status = %payload.response.status,
                total = payload.response.total,
                results = payload.response.results.len(),
                "Guardian search succeeded"
            ),
            Err(e) => error!(elapsed_ms = dt.as_millis(), error = %e, "Guardian search failed"),
        }
        res
    }
}

async fn fetch(http: &reqwest::Client, url: Url) -> Result<SearchResponse, DigestError> {
    let response = http.get(url).send().await?.error_for_status()?;
    let payload = response.json::<SearchResponse>().await?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP response and hand back the request head.
    async fn one_shot_server(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{addr}/search"), server)
    }

    fn config(endpoint: String) -> ApiConfig {
        ApiConfig {
            api_key: Some("test-key".to_string()),
            endpoint,
            timeout: Some(StdDuration::from_secs(5)),
        }
    }

    fn query() -> SearchQuery {
        SearchQuery {
            sections: "world|sport".parse().unwrap(),
            from_date: "2025-05-06".to_string(),
        }
    }

    #[test]
    fn test_from_date_truncates_to_day() {
        let now = Local.with_ymd_and_hms(2025, 5, 6, 9, 0, 0).unwrap();
        assert_eq!(from_date(now, 12).unwrap(), "2025-05-05");
        assert_eq!(from_date(now, 0).unwrap(), "2025-05-06");
        assert_eq!(from_date(now, 9).unwrap(), "2025-05-06");
    }

    #[test]
    fn test_from_date_out_of_range_is_configuration_error() {
        let now = Local.with_ymd_and_hms(2025, 5, 6, 9, 0, 0).unwrap();
        let err = from_date(now, 4_000_000_000).unwrap_err();
        assert!(matches!(err, DigestError::Configuration(_)));

        let sections: SectionFilter = "world".parse().unwrap();
        assert!(SearchQuery::new(sections, u32::MAX, now).is_err());
    }

    #[test]
    fn test_query_url_parameters() {
        let url = query().to_url(GUARDIAN_SEARCH_URL, "k").unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(url.host_str(), Some("content.guardianapis.com"));
        assert!(pairs.contains(&("api-key".into(), "k".into())));
        assert!(pairs.contains(&("section".into(), "world|sport".into())));
        assert!(pairs.contains(&("page-size".into(), "200".into())));
        assert!(pairs.contains(&("show-fields".into(), SHOW_FIELDS.into())));
        assert!(pairs.contains(&("order-by".into(), "relevance".into())));
        assert!(pairs.contains(&("from-date".into(), "2025-05-06".into())));
    }

    #[test]
    fn test_invalid_endpoint_is_configuration_error() {
        let err = query().to_url("not a url", "k").unwrap_err();
        assert!(matches!(err, DigestError::Configuration(_)));
    }

    #[test]
    fn test_api_key_missing_or_blank() {
        let mut cfg = ApiConfig::default();
        assert!(matches!(cfg.api_key(), Err(DigestError::Configuration(_))));
        cfg.api_key = Some("   ".to_string());
        assert!(matches!(cfg.api_key(), Err(DigestError::Configuration(_))));
        cfg.api_key = Some("abc".to_string());
        assert_eq!(cfg.api_key().unwrap(), "abc");
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let cfg = config("http://localhost/search".to_string());
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("test-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_search_success_returns_payload() {
        let body = r#"{"response":{"status":"ok","total":1,"results":[{"webTitle":"Hello"}]}}"#;
        let (endpoint, server) = one_shot_server("200 OK", body).await;
        let client = GuardianClient::new(config(endpoint)).unwrap();

        let payload = client.search(&query()).await.unwrap();
        assert_eq!(payload.response.status, "ok");
        assert_eq!(payload.response.results.len(), 1);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /search?"));
        assert!(request.contains("api-key=test-key"));
        assert!(request.contains("section=world%7Csport"));
        assert!(request.contains("order-by=relevance"));
    }

    #[tokio::test]
    async fn test_search_non_success_status_is_fetch_error() {
        let (endpoint, server) =
            one_shot_server("500 Internal Server Error", r#"{"message":"boom"}"#).await;
        let client = GuardianClient::new(config(endpoint)).unwrap();

        let err = client.search(&query()).await.unwrap_err();
        match err {
            DigestError::Fetch { status, .. } => {
                assert_eq!(status, Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_search_does_not_surface_api_key() {
        let (endpoint, server) =
            one_shot_server("401 Unauthorized", r#"{"message":"Unauthorized"}"#).await;
        let mut cfg = config(endpoint);
        cfg.api_key = Some("SECRET-KEY-123".to_string());
        let client = GuardianClient::new(cfg).unwrap();

        let err = client.search(&query()).await.unwrap_err();
        assert!(matches!(
            err,
            DigestError::Fetch { status: Some(reqwest::StatusCode::UNAUTHORIZED), .. }
        ));

        let display = err.to_string();
        let debug = format!("{err:?}");
        assert!(!display.contains("SECRET-KEY-123"), "key in display: {display}");
        assert!(!debug.contains("SECRET-KEY-123"), "key in debug: {debug}");
        assert!(!display.contains("api-key"));
        // status appears once, from the client error itself
        assert_eq!(display.matches("401").count(), 1, "{display}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_transport_failure_does_not_surface_api_key() {
        // bind then drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut cfg = config(format!("http://{addr}/search"));
        cfg.api_key = Some("SECRET-KEY-456".to_string());
        let client = GuardianClient::new(cfg).unwrap();

        let err = client.search(&query()).await.unwrap_err();
        assert!(matches!(err, DigestError::Fetch { status: None, .. }));
        assert!(!err.to_string().contains("SECRET-KEY-456"));
        assert!(!format!("{err:?}").contains("SECRET-KEY-456"));
    }

    #[tokio::test]
    async fn test_search_undecodable_body_is_fetch_error() {
        let (endpoint, server) = one_shot_server("200 OK", "not json").await;
        let client = GuardianClient::new(config(endpoint)).unwrap();

        let err = client.search(&query()).await.unwrap_err();
        assert!(matches!(err, DigestError::Fetch { status: None, .. }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_search_without_key_fails_before_network() {
        let cfg = ApiConfig {
            api_key: None,
            endpoint: "http://127.0.0.1:9/search".to_string(),
            timeout: None,
        };
        let client = GuardianClient::new(cfg).unwrap();
        let err = client.search(&query()).await.unwrap_err();
        assert!(matches!(err, DigestError::Configuration(_)));
    }
}

//! The outline pipeline: validate the country, fetch its article once,
//! extract headings, and hand back a renderable [`Outline`].

use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use axum::http::StatusCode;
use metrics::{counter, histogram};
use thiserror::Error;
use tracing::warn;

use crate::domain::{country::CountryName, error::DomainError, outline::Outline};

use super::extract::extract_headings;

pub const REQUESTS_METRIC: &str = "country_outline_requests_total";
pub const UPSTREAM_FETCH_METRIC: &str = "country_outline_upstream_fetch_ms";

/// Failure modes of a single article fetch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Name resolution, connection setup or the request timeout failed.
    #[error("upstream unreachable: {0}")]
    Unreachable(String),
    /// The upstream answered with something other than `200 OK`.
    #[error("upstream answered with status {0}")]
    Status(u16),
    /// A response arrived but the client could not complete it.
    #[error("upstream response failed: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },
    #[error("upstream request failed: {0}")]
    Other(String),
}

/// Source of article HTML for a country.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    async fn fetch_article(&self, country: &CountryName) -> Result<String, FetchError>;
}

#[derive(Debug, Error)]
pub enum OutlineError {
    #[error("country parameter is missing")]
    MissingParameter,
    #[error("invalid country name: {0}")]
    InvalidFormat(#[source] DomainError),
    #[error("no article for `{country}` (upstream status {status})")]
    UpstreamNotFound { country: String, status: u16 },
    #[error("no headings found under #content for `{country}`")]
    NoHeadings { country: String },
    #[error("failed to reach upstream: {0}")]
    UpstreamUnreachable(String),
    #[error("upstream returned an error: {message}")]
    UpstreamError {
        status: Option<u16>,
        message: String,
    },
    #[error("unexpected failure: {0}")]
    Internal(String),
}

impl OutlineError {
    fn from_fetch(country: &CountryName, error: FetchError) -> Self {
        match error {
            FetchError::Unreachable(message) => Self::UpstreamUnreachable(message),
            FetchError::Status(status) => Self::UpstreamNotFound {
                country: country.to_string(),
                status,
            },
            FetchError::Upstream { status, message } => Self::UpstreamError { status, message },
            FetchError::Other(message) => Self::Internal(message),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            OutlineError::MissingParameter | OutlineError::InvalidFormat(_) => {
                StatusCode::BAD_REQUEST
            }
            OutlineError::UpstreamNotFound { .. } | OutlineError::NoHeadings { .. } => {
                StatusCode::NOT_FOUND
            }
            OutlineError::UpstreamUnreachable(_) | OutlineError::UpstreamError { .. } => {
                StatusCode::BAD_GATEWAY
            }
            OutlineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable label used for the `outcome` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            OutlineError::MissingParameter => "missing_parameter",
            OutlineError::InvalidFormat(_) => "invalid_format",
            OutlineError::UpstreamNotFound { .. } => "upstream_not_found",
            OutlineError::NoHeadings { .. } => "no_headings",
            OutlineError::UpstreamUnreachable(_) => "upstream_unreachable",
            OutlineError::UpstreamError { .. } => "upstream_error",
            OutlineError::Internal(_) => "internal",
        }
    }
}

#[derive(Clone)]
pub struct OutlineService {
    source: Arc<dyn ArticleSource>,
}

impl OutlineService {
    pub fn new(source: Arc<dyn ArticleSource>) -> Self {
        Self { source }
    }

    /// Build the outline for a raw `country` value as received from a caller.
    ///
    /// Missing and empty values are both reported as [`OutlineError::MissingParameter`].
    /// Validation runs before the fetch, so rejected names never reach the upstream.
    pub async fn outline(&self, country: Option<&str>) -> Result<Outline, OutlineError> {
        let result = self.build(country).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(err) => err.kind(),
        };
        counter!(REQUESTS_METRIC, "outcome" => outcome).increment(1);
        result
    }

    async fn build(&self, country: Option<&str>) -> Result<Outline, OutlineError> {
        let raw = country
            .filter(|value| !value.is_empty())
            .ok_or(OutlineError::MissingParameter)?;
        let country = CountryName::parse(raw).map_err(OutlineError::InvalidFormat)?;

        let started = Instant::now();
        let fetched = self.source.fetch_article(&country).await;
        histogram!(UPSTREAM_FETCH_METRIC).record(started.elapsed().as_secs_f64() * 1000.0);

        let html = fetched.map_err(|err| {
            warn!(country = %country, error = %err, "article fetch failed");
            OutlineError::from_fetch(&country, err)
        })?;

        Outline::new(extract_headings(&html)).ok_or_else(|| OutlineError::NoHeadings {
            country: country.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct StubSource {
        response: Result<String, FetchError>,
        calls: Mutex<Vec<String>>,
    }

    impl StubSource {
        fn new(response: Result<String, FetchError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl ArticleSource for StubSource {
        async fn fetch_article(&self, country: &CountryName) -> Result<String, FetchError> {
            self.calls
                .lock()
                .expect("calls lock")
                .push(country.to_string());
            self.response.clone()
        }
    }

    fn article(body: &str) -> String {
        format!("<html><body><div id=\"content\">{body}</div></body></html>")
    }

    #[tokio::test]
    async fn renders_headings_from_fetched_article() {
        let source = StubSource::new(Ok(article("<h1>A</h1><h2>B</h2><h3> </h3><h2>C</h2>")));
        let service = OutlineService::new(source.clone());

        let outline = service.outline(Some("New Zealand")).await.expect("outline");

        assert_eq!(
            outline.to_markdown(),
            "## Contents\n\n# A\n\n## B\n\n## C\n\n"
        );
        assert_eq!(source.calls(), vec!["New Zealand".to_string()]);
    }

    #[tokio::test]
    async fn missing_or_empty_country_is_rejected_without_fetching() {
        let source = StubSource::new(Ok(article("<h1>A</h1>")));
        let service = OutlineService::new(source.clone());

        for input in [None, Some("")] {
            let err = service.outline(input).await.expect_err("must fail");
            assert!(matches!(err, OutlineError::MissingParameter));
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn invalid_country_is_rejected_without_fetching() {
        let source = StubSource::new(Ok(article("<h1>A</h1>")));
        let service = OutlineService::new(source.clone());

        let err = service
            .outline(Some("Germany<script>"))
            .await
            .expect_err("must fail");

        assert!(matches!(err, OutlineError::InvalidFormat(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn non_ok_upstream_status_maps_to_not_found() {
        let service = OutlineService::new(StubSource::new(Err(FetchError::Status(404))));

        let err = service.outline(Some("Atlantis")).await.expect_err("must fail");

        assert!(matches!(
            err,
            OutlineError::UpstreamNotFound { status: 404, .. }
        ));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn article_without_headings_maps_to_not_found() {
        let service = OutlineService::new(StubSource::new(Ok(article("<p>No sections</p>"))));

        let err = service.outline(Some("Nauru")).await.expect_err("must fail");

        assert!(matches!(err, OutlineError::NoHeadings { .. }));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn transport_failures_map_to_bad_gateway_or_internal() {
        let cases = [
            (
                FetchError::Unreachable("dns error".into()),
                StatusCode::BAD_GATEWAY,
                "upstream_unreachable",
            ),
            (
                FetchError::Upstream {
                    status: Some(200),
                    message: "body truncated".into(),
                },
                StatusCode::BAD_GATEWAY,
                "upstream_error",
            ),
            (
                FetchError::Other("too many redirects".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal",
            ),
        ];

        for (fetch_error, status, kind) in cases {
            let service = OutlineService::new(StubSource::new(Err(fetch_error)));
            let err = service.outline(Some("France")).await.expect_err("must fail");
            assert_eq!(err.status_code(), status);
            assert_eq!(err.kind(), kind);
        }
    }
}

//! HTTP client for Wikipedia article pages.

use std::{error::Error as _, time::Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::{
    application::outline::{ArticleSource, FetchError},
    config::UpstreamSettings,
    domain::country::CountryName,
};

use super::error::InfraError;

#[derive(Clone, Debug)]
pub struct WikipediaClient {
    client: Client,
    base: Url,
}

impl WikipediaClient {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout)
            .build()
            .map_err(|err| InfraError::http_client(describe(&err)))?;

        Ok(Self {
            client,
            base: settings.base_url.clone(),
        })
    }

    /// Article URL with the country percent-encoded as the final path segment.
    pub fn article_url(&self, country: &CountryName) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                FetchError::Other(format!("base url `{}` cannot carry a path", self.base))
            })?
            .pop_if_empty()
            .push(country.as_str());
        Ok(url)
    }
}

#[async_trait]
impl ArticleSource for WikipediaClient {
    async fn fetch_article(&self, country: &CountryName) -> Result<String, FetchError> {
        let url = self.article_url(country)?;
        let started = Instant::now();

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify)?;
        let status = response.status();

        debug!(
            url = %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis(),
            "fetched article"
        );

        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        response.text().await.map_err(|err| {
            // The client timeout also covers the body; a stalled body is a connection failure.
            if err.is_timeout() {
                return FetchError::Unreachable(describe(&err));
            }
            FetchError::Upstream {
                status: Some(status.as_u16()),
                message: describe(&err),
            }
        })
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_connect() || err.is_timeout() {
        return FetchError::Unreachable(describe(&err));
    }
    if let Some(status) = err.status() {
        return FetchError::Upstream {
            status: Some(status.as_u16()),
            message: describe(&err),
        };
    }
    if err.is_body() || err.is_decode() {
        return FetchError::Upstream {
            status: None,
            message: describe(&err),
        };
    }
    FetchError::Other(describe(&err))
}

fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut current = err.source();
    while let Some(inner) = current {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        current = inner.source();
    }
    message
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::services::error::ScrapeError;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, DNT,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Header set sent with every outbound fetch, built once per process
pub static BROWSER_HEADERS: LazyLock<HeaderMap> = LazyLock::new(|| {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    headers
});

/// Single-shot HTTP GET with a hard deadline
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Create a fetcher that sends `headers` on every request
    pub fn new(headers: &HeaderMap) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(headers.clone())
            .build()?;
        Ok(Self { client })
    }

    /// Create a fetcher using [`BROWSER_HEADERS`]
    pub fn with_browser_headers() -> anyhow::Result<Self> {
        Self::new(&BROWSER_HEADERS)
    }

    /// Fetch `url` and return the body as text.
    ///
    /// The whole exchange (connect, headers and body) must finish within `timeout`.
    /// When it does not, the request future is dropped, which aborts the connection.
    pub async fn fetch(&self, url: &Url, timeout: Duration) -> Result<String, ScrapeError> {
        match tokio::time::timeout(timeout, self.fetch_body(url, timeout)).await {
            Ok(result) => result,
            Err(_) => Err(timeout_error(timeout)),
        }
    }

    async fn fetch_body(&self, url: &Url, timeout: Duration) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        response.text().await.map_err(|e| classify_error(e, timeout))
    }
}

fn timeout_error(timeout: Duration) -> ScrapeError {
    ScrapeError::Timeout {
        timeout_ms: timeout.as_millis() as u64,
    }
}

/// A client-side timeout reports the deadline of the request it cut short
fn classify_error(err: reqwest::Error, timeout: Duration) -> ScrapeError {
    if err.is_timeout() {
        return timeout_error(timeout);
    }
    ScrapeError::Network(error_chain(&err))
}

/// Join an error with its sources so DNS and connect details survive
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

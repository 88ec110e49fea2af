// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::scrape::{ExtractMode, ScrapeConfig, ScrapeRequest, ScrapeResult};
use crate::services::error::ScrapeError;
use crate::services::fetcher::Fetcher;
use crate::services::logging::redact_url;
use crate::services::metadata::extract_metadata;
use crate::services::normalizer::normalize_content;
use crate::services::prompts::PromptRegistry;
use crate::services::structured::extract_structured_data;
use crate::services::validator::{apply_defaults, validate_url, DEFAULT_TIMEOUT_MS};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Fetches a URL and turns it into a [`ScrapeResult`].
///
/// Holds no per-request state, so one engine can serve concurrent scrapes.
#[derive(Debug, Clone)]
pub struct ScrapeEngine {
    fetcher: Fetcher,
    prompts: Arc<PromptRegistry>,
    default_timeout_ms: u64,
}

impl ScrapeEngine {
    /// Engine with browser headers and the built-in prompts
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self::with_parts(
            Fetcher::with_browser_headers()?,
            PromptRegistry::builtin(),
        ))
    }

    pub fn with_parts(fetcher: Fetcher, prompts: PromptRegistry) -> Self {
        Self {
            fetcher,
            prompts: Arc::new(prompts),
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Timeout used when a request does not set `timeoutMs`
    pub fn with_default_timeout(mut self, timeout_ms: u64) -> Self {
        self.default_timeout_ms = timeout_ms;
        self
    }

    pub fn prompts(&self) -> &PromptRegistry {
        &self.prompts
    }

    /// Scrape a URL. Always resolves to a result; failures (including panics in
    /// any stage) come back as `success: false` with an error message.
    pub async fn scrape(&self, config: ScrapeConfig) -> ScrapeResult {
        let request = apply_defaults(config, self.default_timeout_ms);
        let url = request.url.clone();
        let log_url = redact_url(&url);
        let mode = request.extract_mode;
        let max_retries = request.max_retries;
        let started = Instant::now();

        let outcome = AssertUnwindSafe(self.try_scrape(request))
            .catch_unwind()
            .await;

        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!(url = %log_url, %mode, kind = e.kind(), error = %e, "scrape failed");
                ScrapeResult::failure(url, e.to_string())
            }
            Err(panic) => {
                let message = panic_message(&*panic);
                error!(url = %log_url, %mode, panic = %message, "scrape panicked");
                ScrapeResult::failure(url, format!("internal error: {message}"))
            }
        };

        info!(
            url = %log_url,
            %mode,
            max_retries,
            success = result.success,
            content_len = result.content.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scrape finished"
        );
        result
    }

    async fn try_scrape(&self, request: ScrapeRequest) -> Result<ScrapeResult, ScrapeError> {
        let url = validate_url(&request.url)?;

        // maxRetries is accepted but not enacted: one fetch per scrape
        let html = self
            .fetcher
            .fetch(&url, Duration::from_millis(request.timeout_ms))
            .await?;

        let metadata = extract_metadata(&html);

        let structured_data = (request.extract_mode == ExtractMode::Structured)
            .then(|| extract_structured_data(&html));

        let content = match request.extract_mode {
            ExtractMode::Html => html,
            ExtractMode::Text | ExtractMode::Structured => {
                let text = normalize_content(&html);
                if request.ai_prompts.is_empty() {
                    text
                } else {
                    self.prompts
                        .run_pipeline(&text, request.ai_prompts.as_slice())
                }
            }
        };

        Ok(ScrapeResult::success(
            request.url,
            content,
            metadata,
            structured_data,
        ))
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

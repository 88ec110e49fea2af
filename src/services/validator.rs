// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::scrape::{ScrapeConfig, ScrapeRequest};
use crate::services::error::ScrapeError;
use url::Url;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Fill every missing option with its default
pub fn validate_config(config: ScrapeConfig) -> ScrapeRequest {
    apply_defaults(config, DEFAULT_TIMEOUT_MS)
}

/// Same as [`validate_config`] with a caller-chosen fallback timeout
pub fn apply_defaults(config: ScrapeConfig, default_timeout_ms: u64) -> ScrapeRequest {
    let options = config.options;
    ScrapeRequest {
        url: config.url,
        selector: options.selector,
        max_retries: options.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
        timeout_ms: options.timeout_ms.unwrap_or(default_timeout_ms),
        allow_scripted: options.allow_scripted.unwrap_or(true),
        extract_mode: options.extract_mode.unwrap_or_default(),
        ai_prompts: options.ai_prompts.unwrap_or_default(),
    }
}

/// Check that `raw` is an absolute URL with a scheme
pub fn validate_url(raw: &str) -> Result<Url, ScrapeError> {
    Url::parse(raw.trim()).map_err(|e| ScrapeError::Config(e.to_string()))
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Failure taxonomy for the scrape pipeline.
//!
//! The `Display` text of each variant is what callers see in `ScrapeResult::error`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Malformed URL or request shape
    #[error("Invalid URL: {0}")]
    Config(String),

    /// Connection-level failure before any HTTP response
    #[error("Network error: {0}")]
    Network(String),

    /// Response arrived with a non-2xx status
    #[error("HTTP {status}: {reason}")]
    HttpStatus { status: u16, reason: String },

    /// Deadline elapsed; the in-flight request was dropped
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Malformed embedded JSON. Only used internally, never returned from `scrape`.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Stable tag for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::Config(_) => "config_error",
            ScrapeError::Network(_) => "network_error",
            ScrapeError::HttpStatus { .. } => "http_status_error",
            ScrapeError::Timeout { .. } => "timeout_error",
            ScrapeError::Parse(_) => "parse_error",
        }
    }
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the `content` field of a result carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractMode {
    /// Normalized plain text
    #[default]
    Text,
    /// Raw fetched markup
    Html,
    /// Plain text plus a `structuredData` object
    Structured,
}

impl std::fmt::Display for ExtractMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractMode::Text => write!(f, "text"),
            ExtractMode::Html => write!(f, "html"),
            ExtractMode::Structured => write!(f, "structured"),
        }
    }
}

impl std::str::FromStr for ExtractMode {
    type Err = String;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "text" => Ok(ExtractMode::Text),
            "html" => Ok(ExtractMode::Html),
            "structured" => Ok(ExtractMode::Structured),
            _ => Err(format!(
                "extract mode must be 'text', 'html', or 'structured', got: {}",
                mode
            )),
        }
    }
}

/// Optional scrape settings. Every field falls back to a default during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOptions {
    /// CSS selector hint (accepted, not used by extraction)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_scripted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract_mode: Option<ExtractMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_prompts: Option<Vec<String>>,
}

/// A partial scrape request: a URL plus whatever options the caller supplied
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeConfig {
    /// The URL to scrape
    pub url: String,
    #[serde(flatten)]
    pub options: ScrapeOptions,
}

impl ScrapeConfig {
    /// Config for `url` with every option left at its default
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            options: ScrapeOptions::default(),
        }
    }

    pub fn with_extract_mode(mut self, mode: ExtractMode) -> Self {
        self.options.extract_mode = Some(mode);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.options.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_prompts<I, S>(mut self, prompts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.ai_prompts = Some(prompts.into_iter().map(Into::into).collect());
        self
    }
}

/// A fully-specified scrape request, produced by `validate_config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,
    pub selector: Option<String>,
    /// Accepted but not enacted: the engine performs a single fetch
    pub max_retries: u32,
    pub timeout_ms: u64,
    /// Accepted but not enforced: no script execution ever happens
    pub allow_scripted: bool,
    pub extract_mode: ExtractMode,
    /// Prompt names, applied in this order
    pub ai_prompts: Vec<String>,
}

/// Metadata envelope attached to every result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Text of the first `<title>` element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `content` of the first `<meta name="description">`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image sources in document order (at most 10)
    #[serde(default)]
    pub images: Vec<String>,
    /// Anchor targets in document order (at most 20)
    #[serde(default)]
    pub links: Vec<String>,
    /// When the result was produced (RFC 3339)
    pub timestamp: DateTime<Utc>,
}

impl PageMetadata {
    /// Envelope with only the timestamp set
    pub fn empty() -> Self {
        Self {
            title: None,
            description: None,
            images: Vec::new(),
            links: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

/// Structural elements extracted in `structured` mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredData {
    /// Inner text of `h1`..`h6`, in document order
    pub headings: Vec<String>,
    /// Raw inner markup of each `ul`/`ol`
    pub lists: Vec<String>,
    /// Raw inner markup of each `table`
    pub tables: Vec<String>,
    /// Raw inner markup of each `form`
    pub forms: Vec<String>,
    /// Parsed `application/ld+json` payloads; malformed blocks are left out
    pub json_ld: Vec<serde_json::Value>,
}

/// Result of a scrape operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    /// Whether the scrape completed; `error` is set exactly when this is false
    pub success: bool,
    /// The URL that was requested
    pub url: String,
    /// Extracted content, empty on failure
    pub content: String,
    pub metadata: PageMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_data: Option<StructuredData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResult {
    pub fn success(
        url: String,
        content: String,
        metadata: PageMetadata,
        structured_data: Option<StructuredData>,
    ) -> Self {
        Self {
            success: true,
            url,
            content,
            metadata,
            structured_data,
            error: None,
        }
    }

    /// Failure result; the metadata envelope carries only a timestamp
    pub fn failure(url: String, error: impl Into<String>) -> Self {
        Self {
            success: false,
            url,
            content: String::new(),
            metadata: PageMetadata::empty(),
            structured_data: None,
            error: Some(error.into()),
        }
    }
}

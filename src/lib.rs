// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Fetch a URL and turn it into a uniform result: metadata, clean text,
//! optional structured data, and an optional pipeline of text transforms.

pub mod app;
pub mod models;
pub mod services;

pub use models::scrape::{
    ExtractMode, PageMetadata, ScrapeConfig, ScrapeOptions, ScrapeRequest, ScrapeResult,
    StructuredData,
};
pub use services::engine::ScrapeEngine;
pub use services::error::ScrapeError;

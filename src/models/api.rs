// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::scrape::{ScrapeConfig, ScrapeOptions};
use serde::{Deserialize, Serialize};

/// Body of `POST /scrape`
#[derive(Debug, Serialize, Deserialize)]
pub struct ScrapeApiRequest {
    pub url: String,
    /// Everything except the URL; a `url` key in here is ignored
    #[serde(default)]
    pub config: ScrapeOptions,
}

impl From<ScrapeApiRequest> for ScrapeConfig {
    fn from(request: ScrapeApiRequest) -> Self {
        ScrapeConfig {
            url: request.url,
            options: request.config,
        }
    }
}

/// Response for `GET /prompts`
#[derive(Debug, Serialize, Deserialize)]
pub struct PromptsResponse {
    pub prompts: Vec<String>,
}

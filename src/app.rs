// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::models::api::{PromptsResponse, ScrapeApiRequest};
use crate::models::scrape::ScrapeResult;
use crate::models::version::VersionResponse;
use crate::services::engine::ScrapeEngine;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `SCRAPE_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("SCRAPE_VERSION");

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ScrapeEngine>,
}

impl AppState {
    pub fn new(engine: ScrapeEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}

pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        agent: "scrape-engine".to_string(),
        version: VERSION.to_string(),
    })
}

pub async fn prompts_handler(State(state): State<AppState>) -> Json<PromptsResponse> {
    Json(PromptsResponse {
        prompts: state.engine.prompts().names(),
    })
}

/// Run one scrape. A completed scrape is always 200, even when `success` is false;
/// only an unreadable body is rejected.
pub async fn scrape_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScrapeApiRequest>, JsonRejection>,
) -> Result<Json<ScrapeResult>, (StatusCode, String)> {
    let Json(payload) = payload.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", e.body_text()),
        )
    })?;

    Ok(Json(state.engine.scrape(payload.into()).await))
}

/// Build the Axum application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/prompts", get(prompts_handler))
        .route("/scrape", post(scrape_handler))
        .with_state(state)
}

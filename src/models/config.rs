// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;

/// Default address for the HTTP service.
/// Bind to 0.0.0.0 to accept connections from any network interface (required for Docker)
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Process-level settings for the scrape service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP service listens on
    pub bind_addr: SocketAddr,
    /// Timeout applied to requests that do not set `timeoutMs`
    pub default_timeout_ms: Option<u64>,
}

impl ServerConfig {
    /// Read settings from `SCRAPE_BIND_ADDR` and `SCRAPE_DEFAULT_TIMEOUT_MS`.
    /// Unset variables fall back to defaults; malformed ones are errors.
    pub fn from_env() -> Result<Self> {
        Self::parse(
            env::var("SCRAPE_BIND_ADDR").ok().as_deref(),
            env::var("SCRAPE_DEFAULT_TIMEOUT_MS").ok().as_deref(),
        )
    }

    fn parse(bind_addr: Option<&str>, default_timeout_ms: Option<&str>) -> Result<Self> {
        let bind_addr = bind_addr
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse::<SocketAddr>()
            .context("SCRAPE_BIND_ADDR must be a socket address like 0.0.0.0:3000")?;

        let default_timeout_ms = default_timeout_ms
            .map(|raw| {
                raw.parse::<u64>()
                    .context("SCRAPE_DEFAULT_TIMEOUT_MS must be a number of milliseconds")
            })
            .transpose()?;

        Ok(Self {
            bind_addr,
            default_timeout_ms,
        })
    }
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use clap::{Parser, Subcommand};
use scrape_engine::app::{create_router, AppState, VERSION};
use scrape_engine::models::config::ServerConfig;
use scrape_engine::{ExtractMode, ScrapeConfig, ScrapeEngine};
use tracing::info;

#[derive(Parser)]
#[command(name = "scrape-engine", version = VERSION, about = "Fetch a URL and extract structured content")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the scrape API over HTTP
    Serve,
    /// Scrape one URL and print the result as JSON
    Scrape {
        url: String,
        /// text, html or structured
        #[arg(short, long, default_value = "text")]
        mode: ExtractMode,
        /// Prompt to apply; repeat to build a pipeline
        #[arg(short, long = "prompt")]
        prompts: Vec<String>,
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => serve().await,
        Commands::Scrape {
            url,
            mode,
            prompts,
            timeout_ms,
        } => {
            let mut config = ScrapeConfig::new(url)
                .with_extract_mode(mode)
                .with_prompts(prompts);
            config.options.timeout_ms = timeout_ms;

            let result = ScrapeEngine::new()?.scrape(config).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;

    let mut engine = ScrapeEngine::new()?;
    if let Some(timeout_ms) = config.default_timeout_ms {
        engine = engine.with_default_timeout(timeout_ms);
    }

    let app = create_router(AppState::new(engine));
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    info!(addr = %config.bind_addr, version = VERSION, "scrape-engine listening");

    axum::serve(listener, app).await?;
    Ok(())
}

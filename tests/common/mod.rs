// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Local fixture site served on an ephemeral port.

#![allow(dead_code)]

use axum::{
    http::{header::USER_AGENT, HeaderMap, StatusCode},
    response::Html,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

pub const STRUCTURED_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Test Page</title>
  <meta name="description" content="Fixture page for scrape tests">
  <style>h1 { font-size: 2em; }</style>
  <script type="application/ld+json">{"@context": "https://schema.org", "@type": "WebPage", "name": "Fixture"}</script>
</head>
<body>
  <h1>Main Heading</h1>
  <p>Intro paragraph with <a href="/about">a link</a> and an <img src="/logo.png" alt="logo">.</p>
  <h2>Details</h2>
  <ul><li>Alpha</li><li>Beta</li></ul>
  <table><tr><th>Key</th><th>Value</th></tr><tr><td>a</td><td>1</td></tr></table>
  <script>console.log("not content");</script>
  <!-- footer comment -->
</body>
</html>"#;

pub const FIVE_SENTENCES_PAGE: &str = "<html><body><p>The first sentence is here. \
    The second one follows! Is this the third? A fourth appears. The fifth ends it.</p></body></html>";

pub const BAD_JSON_LD_PAGE: &str = r#"<html><head><title>Broken LD</title>
<script type="application/ld+json">not json</script></head><body><h1>Still fine</h1></body></html>"#;

pub fn many_media_page() -> String {
    let images: String = (0..15)
        .map(|i| format!(r#"<img src="/img/{i}.png">"#))
        .collect();
    let links: String = (0..30)
        .map(|i| format!(r#"<a href="/page/{i}">Page {i}</a>"#))
        .collect();
    format!("<html><body>{images}{links}</body></html>")
}

async fn echo_user_agent(headers: HeaderMap) -> String {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Start the fixture site and return its address
pub async fn spawn_fixture_server() -> SocketAddr {
    let app = Router::new()
        .route("/", get(|| async { Html(STRUCTURED_PAGE) }))
        .route("/sentences", get(|| async { Html(FIVE_SENTENCES_PAGE) }))
        .route("/bad-json-ld", get(|| async { Html(BAD_JSON_LD_PAGE) }))
        .route("/many", get(|| async { Html(many_media_page()) }))
        .route("/user-agent", get(echo_user_agent))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Html("<p>too late</p>")
            }),
        )
        .route(
            "/missing",
            get(|| async { (StatusCode::NOT_FOUND, "no such page") }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::scrape::PageMetadata;
use crate::services::normalizer::collapse_whitespace;
use scraper::{ElementRef, Html, Selector};

/// Maximum number of image sources kept in the metadata envelope
pub const MAX_IMAGES: usize = 10;
/// Maximum number of links kept in the metadata envelope
pub const MAX_LINKS: usize = 20;

/// Extract title, description, image sources and links from a fetched page.
///
/// Missing fields are left empty; this never fails.
pub fn extract_metadata(html: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    PageMetadata {
        title: extract_title(&document),
        description: extract_description(&document),
        images: attribute_values(&document, "img[src]", "src", MAX_IMAGES),
        links: attribute_values(&document, "a[href]", "href", MAX_LINKS),
        ..PageMetadata::empty()
    }
}

/// Text of the first `<title>`, whitespace collapsed
fn extract_title(document: &Html) -> Option<String> {
    let Ok(selector) = Selector::parse("title") else {
        return None;
    };

    document
        .select(&selector)
        .next()
        .map(|title| collapse_whitespace(&title.text().collect::<String>()))
        .filter(|title| !title.is_empty())
}

/// `content` of the first description meta. A later one never stands in for
/// a first one that lacks `content`.
fn extract_description(document: &Html) -> Option<String> {
    let Ok(selector) = Selector::parse("meta[name]") else {
        return None;
    };

    document
        .select(&selector)
        .find(is_description)
        .and_then(|meta| meta.value().attr("content"))
        .map(str::to_string)
}

fn is_description(meta: &ElementRef<'_>) -> bool {
    meta.value()
        .attr("name")
        .is_some_and(|name| name.trim().eq_ignore_ascii_case("description"))
}

/// Trimmed, non-empty `attr` values of elements matching `css`, in document
/// order, at most `limit` of them
fn attribute_values(document: &Html, css: &str, attr: &str, limit: usize) -> Vec<String> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr(attr))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .take(limit)
        .map(str::to_string)
        .collect()
}

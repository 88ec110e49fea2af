// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Logging utilities for sensitive data anonymization.

use url::Url;

/// Redact a URL for logging.
/// Keeps scheme, host, port and path; drops credentials, query and fragment,
/// which often carry tokens: "https://example.com/reset?token=..." -> "https://example.com/reset?***"
pub fn redact_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        // Not a URL, log it as given but bounded
        return raw.chars().take(64).collect();
    };

    let had_query = url.query().is_some();
    // Only fails for cannot-be-a-base URLs, which carry no credentials
    let _ = url.set_username("");
    let _ = url.set_password(None);
    url.set_query(None);
    url.set_fragment(None);

    let mut redacted = url.to_string();
    if had_query {
        redacted.push_str("?***");
    }
    redacted
}

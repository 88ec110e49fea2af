// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Named, deterministic text transforms applied as an ordered pipeline.

use crate::services::normalizer::collapse_whitespace;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::debug;

static SENTENCE_END_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?。！？]+").unwrap());
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

const SUMMARY_SENTENCES: usize = 3;
const KEY_POINT_MAX_CHARS: usize = 100;
const KEY_POINT_MARKERS: &[char] = &[':', '。', '•', '-'];

/// A pure text transform
pub type PromptFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Maps prompt names to transforms. Unknown names pass text through unchanged.
#[derive(Clone)]
pub struct PromptRegistry {
    prompts: HashMap<String, PromptFn>,
}

impl PromptRegistry {
    /// Registry with no prompts; every name is identity
    pub fn empty() -> Self {
        Self {
            prompts: HashMap::new(),
        }
    }

    /// Registry with the built-in prompts
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("summarize", summarize);
        registry.register("extract_key_points", extract_key_points);
        registry.register("clean_text", collapse_whitespace);
        registry.register("extract_numbers", extract_numbers);
        registry.register("extract_emails", extract_emails);
        registry
    }

    /// Add or replace the transform for `name`
    pub fn register<F>(&mut self, name: impl Into<String>, transform: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.prompts.insert(name.into(), Arc::new(transform));
    }

    /// Registered prompt names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.prompts.keys().cloned().collect();
        names.sort();
        names
    }

    /// Apply a single prompt by name
    pub fn apply(&self, content: &str, name: &str) -> String {
        match self.prompts.get(name) {
            Some(transform) => transform(content),
            None => {
                debug!(prompt = name, "unknown prompt, passing content through");
                content.to_string()
            }
        }
    }

    /// Apply `prompts` in order, each one consuming the previous output
    pub fn run_pipeline<S: AsRef<str>>(&self, content: &str, prompts: &[S]) -> String {
        prompts
            .iter()
            .fold(content.to_string(), |text, name| self.apply(&text, name.as_ref()))
    }
}

impl Default for PromptRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for PromptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRegistry")
            .field("prompts", &self.names())
            .finish()
    }
}

/// First three sentences, joined with ". " and closed with a period
pub fn summarize(content: &str) -> String {
    let sentences: Vec<&str> = SENTENCE_END_RE
        .split(content)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(SUMMARY_SENTENCES)
        .collect();

    if sentences.is_empty() {
        return String::new();
    }
    format!("{}.", sentences.join(". "))
}

/// Short lines that look like list items or labelled facts
pub fn extract_key_points(content: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .filter(|line| {
            line.chars().count() < KEY_POINT_MAX_CHARS && line.contains(KEY_POINT_MARKERS)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Integer and decimal tokens in order of appearance
pub fn extract_numbers(content: &str) -> String {
    join_matches(&NUMBER_RE, content)
}

/// `local@domain.tld` tokens in order of appearance
pub fn extract_emails(content: &str) -> String {
    join_matches(&EMAIL_RE, content)
}

fn join_matches(re: &Regex, content: &str) -> String {
    re.find_iter(content)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_keeps_three_sentences() {
        let text = "First point. Second point! Third point? Fourth point. Fifth point.";
        assert_eq!(
            summarize(text),
            "First point. Second point. Third point."
        );
    }

    #[test]
    fn test_summarize_handles_cjk_terminators() {
        assert_eq!(summarize("第一句。第二句！第三句？第四句。"), "第一句. 第二句. 第三句.");
    }

    #[test]
    fn test_summarize_short_and_empty_input() {
        assert_eq!(summarize("Only one sentence"), "Only one sentence.");
        assert_eq!(summarize(""), "");
        assert_eq!(summarize("...!!!"), "");
    }

    #[test]
    fn test_extract_key_points() {
        let text = "Intro paragraph without markers\n\
                    Price: 10 dollars\n\
                    • bullet item\n\
                    - dash item\n\
                    完成。\n";
        assert_eq!(
            extract_key_points(text),
            "Price: 10 dollars\n• bullet item\n- dash item\n完成。"
        );
    }

    #[test]
    fn test_extract_key_points_drops_long_lines() {
        let long = format!("Note: {}", "x".repeat(120));
        assert_eq!(extract_key_points(&long), "");
    }

    #[test]
    fn test_extract_numbers() {
        assert_eq!(
            extract_numbers("Version 2.5 shipped to 1200 users on day 3"),
            "2.5, 1200, 3"
        );
        assert_eq!(extract_numbers("no digits"), "");
    }

    #[test]
    fn test_extract_emails() {
        assert_eq!(
            extract_emails("Contact sales@example.com or jane.doe+news@mail.example.org today"),
            "sales@example.com, jane.doe+news@mail.example.org"
        );
        assert_eq!(extract_emails("user@localhost is not matched"), "");
    }

    #[test]
    fn test_unknown_prompt_is_identity() {
        let registry = PromptRegistry::builtin();
        let content = "Some content. With sentences.";
        assert_eq!(registry.apply(content, "not_a_real_prompt"), content);
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let registry = PromptRegistry::builtin();
        let prompts: [&str; 0] = [];
        assert_eq!(registry.run_pipeline("  keep   as is ", &prompts), "  keep   as is ");
    }

    #[test]
    fn test_pipeline_is_sequential() {
        let registry = PromptRegistry::builtin();
        let text = "Call 555 now. Offer ends in 3 days. Price 9.99 only. Extra 42 here.";

        // summarize cuts at "9." before numbers are pulled out
        assert_eq!(
            registry.run_pipeline(text, &["summarize", "extract_numbers"]),
            "555, 3, 9"
        );
        // the other order summarizes the number list instead
        assert_eq!(
            registry.run_pipeline(text, &["extract_numbers", "summarize"]),
            "555, 3, 9. 99, 42."
        );
    }

    #[test]
    fn test_register_custom_prompt() {
        let mut registry = PromptRegistry::builtin();
        registry.register("shout", |text: &str| text.to_uppercase());

        assert!(registry.names().contains(&"shout".to_string()));
        assert_eq!(
            registry.run_pipeline("hello   world", &["clean_text", "shout"]),
            "HELLO WORLD"
        );
    }

    #[test]
    fn test_builtin_names() {
        assert_eq!(
            PromptRegistry::builtin().names(),
            vec![
                "clean_text",
                "extract_emails",
                "extract_key_points",
                "extract_numbers",
                "summarize"
            ]
        );
        assert!(PromptRegistry::empty().names().is_empty());
    }
}

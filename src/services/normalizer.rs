// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Markup to plain text.

use crate::services::markup::{decode_entities_fully, Token, Tokenizer};

/// Convert markup into clean, single-spaced text.
///
/// Runs, in order: drop script/style blocks and comments, decode the fixed
/// entity set, replace remaining tags with a space, collapse whitespace.
/// Decoding collapses `&amp;` chains in the same scan and tags end at the first
/// `>`, so the output holds no tag, comment or entity and a second call returns
/// it unchanged. Every step is a linear scan.
pub fn normalize_content(html: &str) -> String {
    let content = remove_non_content(html);
    let decoded = decode_entities_fully(&content);
    let stripped = strip_tags(&decoded);
    collapse_whitespace(&stripped)
}

/// Drop `<script>`/`<style>` elements with their bodies, and comments
fn remove_non_content(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut skipping: Option<String> = None;

    for token in Tokenizer::new(html) {
        if let Some(element) = &skipping {
            if matches!(&token, Token::Tag(tag) if tag.closes(element)) {
                skipping = None;
            }
            continue;
        }

        match token {
            Token::Tag(tag) if tag.opens("script") || tag.opens("style") => {
                skipping = Some(tag.name);
            }
            Token::Tag(tag) => out.push_str(tag.raw),
            Token::Text(text) | Token::Declaration(text) => out.push_str(text),
            Token::Comment(_) => {}
        }
    }

    out
}

/// Replace every tag, comment and declaration with a single space.
/// Decoded text may spell out a `<script>`; its body is ordinary text here.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    for token in Tokenizer::plain(html) {
        match token {
            Token::Text(text) => out.push_str(text),
            Token::Tag(_) | Token::Comment(_) | Token::Declaration(_) => out.push(' '),
        }
    }
    out
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_tags() {
        assert_eq!(
            normalize_content("<p>Hello <b>World</b></p>"),
            "Hello World"
        );
    }

    #[test]
    fn test_normalize_drops_script_style_and_comments() {
        let html = r#"
            <html><head>
              <style>body { color: red; }</style>
              <script type="text/javascript">var secret = "<b>leak</b>";</script>
            </head>
            <body><!-- hidden note --><h1>Title</h1><p>Body text</p></body></html>
        "#;
        let text = normalize_content(html);
        assert_eq!(text, "Title Body text");
    }

    #[test]
    fn test_normalize_decodes_entities() {
        assert_eq!(
            normalize_content("<p>Fish&nbsp;&amp;&nbsp;Chips &quot;fresh&quot; &#39;daily&#39;</p>"),
            "Fish & Chips \"fresh\" 'daily'"
        );
    }

    #[test]
    fn test_encoded_markup_is_stripped_after_decoding() {
        assert_eq!(normalize_content("a &lt;b&gt;bold&lt;/b&gt; c"), "a bold c");
    }

    #[test]
    fn test_literal_comparison_survives() {
        assert_eq!(normalize_content("<p>1 &lt; 2 and 3 &gt; 2</p>"), "1 < 2 and 3 > 2");
    }

    #[test]
    fn test_tags_become_word_breaks() {
        assert_eq!(normalize_content("one<br>two<div>three</div>"), "one two three");
    }

    #[test]
    fn test_unclosed_script_drops_rest_of_document() {
        assert_eq!(normalize_content("<p>kept</p><script>var x = 1;"), "kept");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "<p>Hello <b>World</b></p>",
            "&amp;lt;script&amp;gt;alert(1)&amp;lt;/script&amp;gt;",
            "&amp;amp;amp;nbsp;",
            "a &lt;!-- x --&gt; b",
            "  spaced\t\n out  ",
            "<<<>>> < > &",
            "<a <b>x>",
            "<a <a <a <b>x>>>",
            "&lt;script&gt;<b>x</b>&lt;/script&gt;",
            "&lt;!-- open",
            "Привет&nbsp;мир <i>你好</i>",
            "",
        ];
        for html in inputs {
            let once = normalize_content(html);
            assert_eq!(normalize_content(&once), once, "input: {html:?}");
        }
    }

    #[test]
    fn test_nested_amp_chain_is_decoded_in_one_scan() {
        let html = format!("&{}lt;b&amp;gt;", "amp;".repeat(20_000));
        let started = std::time::Instant::now();
        assert_eq!(normalize_content(&html), "");
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
    }

    #[test]
    fn test_large_hostile_input_stays_linear() {
        let html = format!(
            "{}{}<p>tail</p>",
            "<a ".repeat(20_000),
            "&amp;amp;lt;".repeat(20_000)
        );
        let started = std::time::Instant::now();
        let text = normalize_content(&html);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));
        assert_eq!(normalize_content(&text), text);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
    }
}

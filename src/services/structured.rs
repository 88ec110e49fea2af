// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::scrape::StructuredData;
use crate::services::error::ScrapeError;
use crate::services::markup::decode_entities;
use crate::services::normalizer::collapse_whitespace;
use lol_html::html_content::TextType;
use lol_html::{doc_text, element, HtmlRewriter, Settings};
use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;
use tracing::debug;

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    List,
    Table,
    Form,
}

/// Elements the collector cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Heading,
    Block(Block),
    JsonLd,
}

impl Kind {
    fn classify(name: &str, script_type: Option<&str>) -> Option<Self> {
        match name {
            "ul" | "ol" => Some(Kind::Block(Block::List)),
            "table" => Some(Kind::Block(Block::Table)),
            "form" => Some(Kind::Block(Block::Form)),
            "script" if script_type.is_some_and(is_json_ld_type) => Some(Kind::JsonLd),
            _ if HEADINGS.contains(&name) => Some(Kind::Heading),
            _ => None,
        }
    }
}

/// An element whose end tag has not been seen yet
enum Open {
    Heading {
        slot: usize,
        text: String,
    },
    Block {
        block: Block,
        slot: usize,
        inner_start: usize,
    },
    JsonLd {
        body: String,
    },
}

/// Accumulates results while the rewriter walks the document. Slots are
/// reserved at the start tag so results keep document order.
#[derive(Default)]
struct Collector {
    data: StructuredData,
    open: Vec<(usize, Open)>,
    next_id: usize,
    /// Inner markup byte ranges, copied out of the source once the scan is done
    spans: Vec<(Block, usize, Range<usize>)>,
}

impl Collector {
    fn open(&mut self, kind: Kind, inner_start: usize) -> usize {
        let open = match kind {
            Kind::Heading => {
                self.data.headings.push(String::new());
                Open::Heading {
                    slot: self.data.headings.len() - 1,
                    text: String::new(),
                }
            }
            Kind::Block(block) => {
                let target = self.blocks_mut(block);
                target.push(String::new());
                Open::Block {
                    block,
                    slot: target.len() - 1,
                    inner_start,
                }
            }
            Kind::JsonLd => Open::JsonLd {
                body: String::new(),
            },
        };

        let id = self.next_id;
        self.next_id += 1;
        self.open.push((id, open));
        id
    }

    /// Heading text comes from markup text only; script bodies feed JSON-LD
    fn text(&mut self, chunk: &str, text_type: TextType) {
        let markup_text = matches!(text_type, TextType::Data | TextType::RCData);
        for (_, open) in &mut self.open {
            match open {
                Open::Heading { text, .. } if markup_text => text.push_str(chunk),
                Open::JsonLd { body } if matches!(text_type, TextType::ScriptData) => {
                    body.push_str(chunk)
                }
                _ => {}
            }
        }
    }

    fn close(&mut self, id: usize, inner_end: usize) {
        let Some(idx) = self.open.iter().position(|(open_id, _)| *open_id == id) else {
            return;
        };
        let (_, open) = self.open.remove(idx);
        self.finish(open, inner_end);
    }

    fn finish(&mut self, open: Open, inner_end: usize) {
        match open {
            Open::Heading { slot, text } => {
                self.data.headings[slot] = collapse_whitespace(&decode_entities(&text));
            }
            Open::Block {
                block,
                slot,
                inner_start,
            } => self.spans.push((block, slot, inner_start..inner_end)),
            Open::JsonLd { body } => match parse_json_ld(&body) {
                Ok(value) => self.data.json_ld.push(value),
                Err(e) => debug!(error = %e, "skipping malformed JSON-LD block"),
            },
        }
    }

    fn blocks_mut(&mut self, block: Block) -> &mut Vec<String> {
        match block {
            Block::List => &mut self.data.lists,
            Block::Table => &mut self.data.tables,
            Block::Form => &mut self.data.forms,
        }
    }

    /// Elements left open at end of input run to the end of the document
    fn into_data(mut self, html: &str) -> StructuredData {
        while let Some((_, open)) = self.open.pop() {
            self.finish(open, html.len());
        }
        for (block, slot, range) in std::mem::take(&mut self.spans) {
            let inner = html.get(range).unwrap_or_default().to_string();
            self.blocks_mut(block)[slot] = inner;
        }
        self.data.headings.retain(|heading| !heading.is_empty());
        self.data
    }
}

fn is_json_ld_type(script_type: &str) -> bool {
    script_type.trim().eq_ignore_ascii_case("application/ld+json")
}

fn parse_json_ld(body: &str) -> Result<serde_json::Value, ScrapeError> {
    Ok(serde_json::from_str(body.trim())?)
}

/// Extract headings, list/table/form inner markup and JSON-LD payloads in one
/// streaming pass.
///
/// Inner markup is sliced from the source between the start and end tag, so it
/// comes back exactly as written. Nested blocks are reported individually,
/// outer block first. Malformed JSON-LD is skipped rather than reported.
pub fn extract_structured_data(html: &str) -> StructuredData {
    let collector = Rc::new(RefCell::new(Collector::default()));
    let on_element = Rc::clone(&collector);
    let on_text = Rc::clone(&collector);

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("*", move |el| {
                let name = el.tag_name().to_ascii_lowercase();
                let script_type = el.get_attribute("type");
                let Some(kind) = Kind::classify(&name, script_type.as_deref()) else {
                    return Ok(());
                };
                let inner_start = el.source_location().bytes().end;
                // void and self-closing elements have no end tag
                let Some(end_handlers) = el.end_tag_handlers() else {
                    return Ok(());
                };

                let id = on_element.borrow_mut().open(kind, inner_start);
                let on_end = Rc::clone(&on_element);
                end_handlers.push(Box::new(move |end: &mut lol_html::html_content::EndTag<'_>| {
                    let inner_end = end.source_location().bytes().start;
                    on_end.borrow_mut().close(id, inner_end);
                    Ok(())
                }) as lol_html::EndTagHandler<'static>);
                Ok(())
            })],
            document_content_handlers: vec![doc_text!(move |chunk| {
                on_text.borrow_mut().text(chunk.as_str(), chunk.text_type());
                Ok(())
            })],
            strict: false,
            ..Settings::default()
        },
        |_: &[u8]| {},
    );

    let outcome = rewriter
        .write(html.as_bytes())
        .and_then(|()| rewriter.end());
    if let Err(e) = outcome {
        debug!(error = %e, "structured scan stopped early");
    }

    let collected = collector.take();
    collected.into_data(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_headings_in_document_order() {
        let html = "<h2>Second level</h2><p>x</p><H1 class='t'>Top <em>level</em></H1><h6>Six</h6>";
        let data = extract_structured_data(html);
        assert_eq!(data.headings, vec!["Second level", "Top level", "Six"]);
    }

    #[test]
    fn test_heading_text_is_decoded() {
        let data = extract_structured_data("<h3>Q&amp;A\n   section</h3>");
        assert_eq!(data.headings, vec!["Q&A section"]);
    }

    #[test]
    fn test_extracts_raw_inner_markup_of_blocks() {
        let html = r#"<ul class="menu"><li>One</li><li>Two</li></ul>
            <ol><li>First</li></ol>
            <table><tr><td>cell</td></tr></table>
            <form action="/go"><input name="q"></form>"#;
        let data = extract_structured_data(html);

        assert_eq!(
            data.lists,
            vec!["<li>One</li><li>Two</li>", "<li>First</li>"]
        );
        assert_eq!(data.tables, vec!["<tr><td>cell</td></tr>"]);
        assert_eq!(data.forms, vec![r#"<input name="q">"#]);
    }

    #[test]
    fn test_nested_lists_are_reported_outer_first() {
        let html = "<ul><li>a<ul><li>b</li></ul></li></ul>";
        let data = extract_structured_data(html);
        assert_eq!(
            data.lists,
            vec!["<li>a<ul><li>b</li></ul></li>", "<li>b</li>"]
        );
    }

    #[test]
    fn test_parses_json_ld_blocks() {
        let html = r#"
            <script type="application/ld+json">{"@type": "Organization", "name": "Acme"}</script>
            <script type="text/javascript">var x = {"not": "ld"};</script>
            <script type='Application/LD+JSON'>
              [1, 2, 3]
            </script>"#;
        let data = extract_structured_data(html);
        assert_eq!(
            data.json_ld,
            vec![json!({"@type": "Organization", "name": "Acme"}), json!([1, 2, 3])]
        );
    }

    #[test]
    fn test_malformed_json_ld_is_skipped() {
        let html = r#"<script type="application/ld+json">not json</script>
            <script type="application/ld+json"></script>"#;
        let data = extract_structured_data(html);
        assert!(data.json_ld.is_empty());
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(extract_structured_data(""), StructuredData::default());
        assert_eq!(
            extract_structured_data("plain text only"),
            StructuredData::default()
        );
    }

    #[test]
    fn test_script_inside_heading_is_not_heading_text() {
        let data = extract_structured_data(
            "<h1>Title<script>var tracking = 1;</script></h1><h2>A<style>b{}</style>B</h2>",
        );
        assert_eq!(data.headings, vec!["Title", "AB"]);
    }

    #[test]
    fn test_json_ld_inside_heading_goes_to_json_ld_only() {
        let html = r#"<h1>Name<script type="application/ld+json">{"a": 1}</script></h1>"#;
        let data = extract_structured_data(html);
        assert_eq!(data.headings, vec!["Name"]);
        assert_eq!(data.json_ld, vec![json!({"a": 1})]);
    }

    #[test]
    fn test_inner_markup_is_kept_as_written() {
        let html = "<TABLE border=1><TR><td>a &amp; b</td></TR></TABLE>";
        let data = extract_structured_data(html);
        assert_eq!(data.tables, vec!["<TR><td>a &amp; b</td></TR>"]);
    }

    #[test]
    fn test_unclosed_table_runs_to_end() {
        let data = extract_structured_data("<table><tr><td>x");
        assert_eq!(data.tables, vec!["<tr><td>x"]);
    }

    #[test]
    fn test_stray_end_tags_are_ignored() {
        let data = extract_structured_data("</ul></h1><ul><li>x</li></ul>");
        assert_eq!(data.lists, vec!["<li>x</li>"]);
        assert!(data.headings.is_empty());
    }
}

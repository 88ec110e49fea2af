// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Tolerant single-pass markup tokenizer and the fixed entity decoder.
//!
//! The tokenizer splits text into tags, text runs, comments and declarations
//! without building a tree, and it works on fragments that are not documents
//! (decoded text, for instance). It never fails: a `<` that cannot start a tag is
//! handed back as text. Tokens tile the input exactly.
//!
//! A tag runs from `<` to the first `>` after it. When no `>` follows, the `<` is
//! text. Attributes are not parsed.

/// Elements whose body is raw text up to the matching closing tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Entities decoded by the pipeline, without the leading `&`. Anything else is
/// left as-is.
const ENTITIES: &[(&str, &str)] = &[
    ("nbsp;", " "),
    ("lt;", "<"),
    ("gt;", ">"),
    ("amp;", "&"),
    ("quot;", "\""),
    ("#39;", "'"),
    ("apos;", "'"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Start,
    End,
}

/// A start or end tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Lowercased element name
    pub name: String,
    pub kind: TagKind,
    /// The whole tag as written, `<` through `>`
    pub raw: &'a str,
}

impl Tag<'_> {
    pub fn opens(&self, name: &str) -> bool {
        self.kind == TagKind::Start && self.name == name
    }

    pub fn closes(&self, name: &str) -> bool {
        self.kind == TagKind::End && self.name == name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    Tag(Tag<'a>),
    /// Raw text, entities not decoded
    Text(&'a str),
    /// Comment body between `<!--` and `-->`
    Comment(&'a str),
    /// `<!DOCTYPE ...>`, `<?xml ...?>` and similar, as written
    Declaration(&'a str),
}

/// Iterator over the tokens of a document
pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    /// Offset of the last `>`; no tag can start after it
    last_gt: Option<usize>,
    raw_text_elements: &'static [&'static str],
    raw_text: Option<&'static str>,
}

impl<'a> Tokenizer<'a> {
    /// Tokenizer that treats `script` and `style` bodies as raw text
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            last_gt: src.rfind('>'),
            raw_text_elements: RAW_TEXT_ELEMENTS,
            raw_text: None,
        }
    }

    /// Tokenizer where every element body is ordinary markup
    pub fn plain(src: &'a str) -> Self {
        Self {
            raw_text_elements: &[],
            ..Self::new(src)
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    /// Emit the body of a script/style element
    fn next_raw_text(&mut self, element: &str) -> Option<Token<'a>> {
        let close = find_closing_tag(self.src, self.pos, element).unwrap_or(self.src.len());
        if close == self.pos {
            return None;
        }
        let text = &self.src[self.pos..close];
        self.pos = close;
        Some(Token::Text(text))
    }

    fn next_markup(&mut self) -> Token<'a> {
        let start = self.pos;
        let rest = &self.src[start..];

        if let Some(body) = rest.strip_prefix("<!--") {
            // An unterminated comment swallows the rest of the input
            let (comment, consumed) = match body.find("-->") {
                Some(idx) => (&body[..idx], 4 + idx + 3),
                None => (body, rest.len()),
            };
            self.pos = start + consumed;
            return Token::Comment(comment);
        }

        let next = self.bytes().get(start + 1).copied();
        let token = match next {
            Some(b'!') | Some(b'?') => self.declaration(start),
            Some(b'/') => match self.bytes().get(start + 2) {
                Some(b) if b.is_ascii_alphabetic() => self.tag(start, start + 2, TagKind::End),
                _ => None,
            },
            Some(b) if b.is_ascii_alphabetic() => self.tag(start, start + 1, TagKind::Start),
            _ => None,
        };

        token.unwrap_or_else(|| self.text_from(start, start + 1))
    }

    /// Offset of the first `>` at or after `from`
    fn find_gt(&self, from: usize) -> Option<usize> {
        if self.last_gt? < from {
            return None;
        }
        self.src[from..].find('>').map(|idx| from + idx)
    }

    fn declaration(&mut self, start: usize) -> Option<Token<'a>> {
        let close = self.find_gt(start)?;
        self.pos = close + 1;
        Some(Token::Declaration(&self.src[start..=close]))
    }

    fn tag(&mut self, start: usize, name_start: usize, kind: TagKind) -> Option<Token<'a>> {
        let bytes = self.bytes();
        let name_end = bytes[name_start..]
            .iter()
            .position(|b| !(b.is_ascii_alphanumeric() || matches!(b, b'-' | b':' | b'_')))
            .map_or(bytes.len(), |len| name_start + len);
        let close = self.find_gt(name_end)?;
        let name = self.src[name_start..name_end].to_ascii_lowercase();

        if kind == TagKind::Start {
            self.raw_text = self
                .raw_text_elements
                .iter()
                .copied()
                .find(|el| *el == name);
        }

        self.pos = close + 1;
        Some(Token::Tag(Tag {
            name,
            kind,
            raw: &self.src[start..=close],
        }))
    }

    /// Text from `start` up to the next `<` at or after `from`
    fn text_from(&mut self, start: usize, from: usize) -> Token<'a> {
        let end = self.src[from..]
            .find('<')
            .map_or(self.src.len(), |idx| from + idx);
        self.pos = end;
        Token::Text(&self.src[start..end])
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if let Some(element) = self.raw_text.take() {
            if let Some(text) = self.next_raw_text(element) {
                return Some(text);
            }
        }

        if self.pos >= self.src.len() {
            return None;
        }

        if self.bytes()[self.pos] == b'<' {
            Some(self.next_markup())
        } else {
            Some(self.text_from(self.pos, self.pos))
        }
    }
}

/// Byte offset of `</element` (case-insensitive) at or after `from`
fn find_closing_tag(src: &str, from: usize, element: &str) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut search = from;
    while let Some(idx) = src[search..].find("</") {
        let at = search + idx;
        let name_start = at + 2;
        let name_end = name_start + element.len();
        if name_end <= bytes.len()
            && bytes[name_start..name_end].eq_ignore_ascii_case(element.as_bytes())
            && bytes
                .get(name_end)
                .map_or(true, |b| b.is_ascii_whitespace() || matches!(b, b'>' | b'/'))
        {
            return Some(at);
        }
        search = at + 2;
    }
    None
}

/// Decode the fixed entity set in a single left-to-right pass.
///
/// `&amp;lt;` becomes `&lt;`, as a browser would render it.
pub fn decode_entities(text: &str) -> String {
    decode(text, false)
}

/// Decode the fixed entity set until none is left, in one linear scan.
///
/// Equivalent to calling [`decode_entities`] until the text stops changing:
/// `&amp;amp;lt;` becomes `<`.
pub fn decode_entities_fully(text: &str) -> String {
    decode(text, true)
}

fn decode(text: &str, collapse_amp: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(idx) = rest.find('&') {
        out.push_str(&rest[..idx]);
        let mut body = &rest[idx + 1..];
        if collapse_amp {
            // every `amp;` layer decodes back to the `&` in front of it
            while let Some(next) = body.strip_prefix("amp;") {
                body = next;
            }
        }

        match ENTITIES.iter().find(|(name, _)| body.starts_with(*name)) {
            Some((name, replacement)) => {
                out.push_str(replacement);
                rest = &body[name.len()..];
            }
            None => {
                out.push('&');
                rest = body;
            }
        }
    }

    out.push_str(rest);
    out
}

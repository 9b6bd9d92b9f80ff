//! Recursive-descent parser building the typed node tree.
//!
//! Block structure comes from the line tokenizer: runs of list items of the
//! same kind collapse into a single list, runs of quote lines into a single
//! blockquote, and everything between a pair of fences into one code block.
//! Inline structure (`**`, `*`, backticks, `[..](..)`) is parsed by a small
//! scanner that degrades unterminated markers to literal text instead of
//! failing.

use super::ast::{Block, Inline};
use super::lexer::{LineToken, tokenize};

/// Parse input text into a sequence of blocks.
pub fn parse(input: &str) -> Vec<Block> {
    let tokens = tokenize(input);
    // Raw lines are kept alongside the tokens: marker prefixes carry no
    // meaning inside a fenced block, so fences consume the raw text.
    let raw: Vec<&str> = input.split('\n').collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            LineToken::Blank => {
                // A blank produced by a trailing newline becomes a trailing
                // line break on the open paragraph, mirroring the pasted-text
                // behavior where a lone final newline renders as <br>.
                if i + 1 == tokens.len()
                    && i > 0
                    && let Some(Block::Paragraph(inlines)) = blocks.last_mut()
                    && matches!(tokens[i - 1], LineToken::Text(_))
                {
                    inlines.push(Inline::Break);
                }
                i += 1;
            }
            LineToken::Heading { level, text } => {
                blocks.push(Block::Heading {
                    level,
                    inlines: parse_inlines(text),
                });
                i += 1;
            }
            LineToken::ListItem { ordered, .. } => {
                let mut items = Vec::new();
                while let Some(LineToken::ListItem { ordered: o, text }) = tokens.get(i) {
                    if *o != ordered {
                        break;
                    }
                    items.push(parse_inlines(text));
                    i += 1;
                }
                blocks.push(Block::List { ordered, items });
            }
            LineToken::Quote(_) => {
                let mut inlines = Vec::new();
                while let Some(LineToken::Quote(text)) = tokens.get(i) {
                    if !inlines.is_empty() {
                        inlines.push(Inline::Break);
                    }
                    inlines.extend(parse_inlines(text));
                    i += 1;
                }
                blocks.push(Block::Blockquote(inlines));
            }
            LineToken::Fence(_) => {
                i += 1;
                let mut lines: Vec<&str> = Vec::new();
                while i < tokens.len() {
                    if matches!(tokens[i], LineToken::Fence(_)) {
                        i += 1;
                        break;
                    }
                    lines.push(raw[i]);
                    i += 1;
                }
                blocks.push(Block::CodeBlock {
                    text: lines.join("\n"),
                });
            }
            LineToken::Text(_) => {
                let mut inlines = Vec::new();
                while let Some(LineToken::Text(text)) = tokens.get(i) {
                    if !inlines.is_empty() {
                        inlines.push(Inline::Break);
                    }
                    inlines.extend(parse_inlines(text));
                    i += 1;
                }
                blocks.push(Block::Paragraph(inlines));
            }
        }
    }

    blocks
}

/// Scan a single line of text into inline nodes.
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut literal = String::new();
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let rest = &text[i..];
        if rest.starts_with("**") {
            if let Some(end) = rest[2..].find("**") {
                flush(&mut out, &mut literal);
                out.push(Inline::Strong(parse_inlines(&rest[2..2 + end])));
                i += end + 4;
                continue;
            }
        } else if rest.starts_with('*') {
            if let Some(end) = rest[1..].find('*') {
                flush(&mut out, &mut literal);
                out.push(Inline::Emph(parse_inlines(&rest[1..=end])));
                i += end + 2;
                continue;
            }
        } else if rest.starts_with('`') {
            if let Some(end) = rest[1..].find('`') {
                flush(&mut out, &mut literal);
                out.push(Inline::Code(rest[1..=end].to_string()));
                i += end + 2;
                continue;
            }
        } else if rest.starts_with('[')
            && let Some(link) = scan_link(rest)
        {
            flush(&mut out, &mut literal);
            let consumed = link.2;
            out.push(Inline::Link {
                text: link.0,
                url: link.1,
            });
            i += consumed;
            continue;
        }

        // No marker matched here; take one char as literal text.
        let ch = rest.chars().next().unwrap_or_default();
        literal.push(ch);
        i += ch.len_utf8();
    }

    flush(&mut out, &mut literal);
    out
}

fn flush(out: &mut Vec<Inline>, literal: &mut String) {
    if !literal.is_empty() {
        out.push(Inline::Text(std::mem::take(literal)));
    }
}

/// Try to scan `[text](url)` at the start of `rest`.
///
/// Both the display text and the URL must be non-empty, and neither may
/// contain its own closing delimiter. Returns (text, url, bytes consumed).
fn scan_link(rest: &str) -> Option<(String, String, usize)> {
    let close_bracket = rest.find(']')?;
    let text = &rest[1..close_bracket];
    if text.is_empty() || !rest[close_bracket..].starts_with("](") {
        return None;
    }
    let url_start = close_bracket + 2;
    let close_paren = rest[url_start..].find(')')?;
    let url = &rest[url_start..url_start + close_paren];
    if url.is_empty() {
        return None;
    }
    Some((
        text.to_string(),
        url.to_string(),
        url_start + close_paren + 1,
    ))
}

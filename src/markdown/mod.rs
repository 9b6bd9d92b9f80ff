//! Markdown-subset import pipeline.
//!
//! This module converts the constrained markdown dialect accepted by the
//! post editor into an HTML fragment:
//! - Tokenizing lines by marker prefix ([`lexer`])
//! - Building a typed node tree ([`ast`], [`parser`])
//! - Serializing to HTML ([`html`])
//!
//! The supported constructs are headings 1-3, bold, italic, links, flat
//! ordered/unordered lists, code spans and fenced blocks, blockquotes, and
//! paragraph/line breaks. Nothing else is recognized; unterminated markers
//! stay literal text, so conversion never fails.

mod ast;
mod html;
mod lexer;
mod parser;

pub use ast::{Block, Inline};
pub use html::render;
pub use parser::{parse, parse_inlines};

/// Convert markdown text to an HTML fragment.
pub fn to_html(input: &str) -> String {
    html::render(&parser::parse(input))
}

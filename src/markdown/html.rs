//! HTML serialization of the parsed node tree.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::ast::{Block, Inline};

/// Render blocks to an HTML fragment.
///
/// Two rules carried over from the importer this replaces:
/// - a paragraph whose rendered content already begins with a tag is emitted
///   without the `<p>` wrapper, so `**bold**` alone becomes
///   `<strong>bold</strong>`;
/// - paragraphs that render empty (or to a lone `<br>`) are dropped.
pub fn render(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            Block::Paragraph(inlines) => {
                let body = render_inlines(inlines);
                if body.is_empty() || body == "<br>" {
                    continue;
                }
                if body.starts_with('<') {
                    out.push_str(&body);
                } else {
                    out.push_str("<p>");
                    out.push_str(&body);
                    out.push_str("</p>");
                }
            }
            Block::Heading { level, inlines } => {
                let body = render_inlines(inlines);
                out.push_str(&format!("<h{level}>{body}</h{level}>"));
            }
            Block::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                out.push_str(&format!("<{tag}>"));
                for item in items {
                    out.push_str("<li>");
                    out.push_str(&render_inlines(item));
                    out.push_str("</li>");
                }
                out.push_str(&format!("</{tag}>"));
            }
            Block::Blockquote(inlines) => {
                out.push_str("<blockquote>");
                out.push_str(&render_inlines(inlines));
                out.push_str("</blockquote>");
            }
            Block::CodeBlock { text } => {
                out.push_str("<pre><code>");
                out.push_str(&encode_text(text));
                out.push_str("</code></pre>");
            }
        }
    }
    out
}

fn render_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(t) => out.push_str(&encode_text(t)),
            Inline::Strong(inner) => {
                out.push_str("<strong>");
                out.push_str(&render_inlines(inner));
                out.push_str("</strong>");
            }
            Inline::Emph(inner) => {
                out.push_str("<em>");
                out.push_str(&render_inlines(inner));
                out.push_str("</em>");
            }
            Inline::Code(t) => {
                out.push_str("<code>");
                out.push_str(&encode_text(t));
                out.push_str("</code>");
            }
            Inline::Link { text, url } => {
                out.push_str(&format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                    encode_double_quoted_attribute(url),
                    encode_text(text),
                ));
            }
            Inline::Break => out.push_str("<br>"),
        }
    }
    out
}

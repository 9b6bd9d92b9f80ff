//! The editor's explicit document model.
//!
//! Instead of a live editable surface, the editor holds an ordered sequence
//! of typed block nodes, each containing inline nodes. Toolbar commands are
//! transformations over this model (see [`super::commands`]); HTML is a
//! serialization format at the boundary, produced by [`EditorDocument::to_html`]
//! and consumed by [`EditorDocument::from_html`].
//!
//! Offsets are in characters. Atomic inlines (images, line breaks) count as
//! one character each.

use html_escape::{encode_double_quoted_attribute, encode_text};
use scraper::{ElementRef, Html};

use crate::sanitize;

/// Paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Character-level style flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub code: bool,
}

/// An inline node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// A styled text run.
    Text { text: String, style: TextStyle },
    /// A hyperlink. Splitting inside the display text yields two links with
    /// the same target.
    Link { text: String, url: String },
    /// An embedded image; atomic, one character wide.
    Image { src: String, alt: String },
    /// A soft line break; atomic, one character wide.
    Break,
}

impl Inline {
    /// Width of this node in characters.
    pub fn char_len(&self) -> usize {
        match self {
            Self::Text { text, .. } | Self::Link { text, .. } => text.chars().count(),
            Self::Image { .. } | Self::Break => 1,
        }
    }

    fn is_empty_text(&self) -> bool {
        matches!(self, Self::Text { text, .. } if text.is_empty())
    }
}

/// What kind of block a [`Block`] is.
///
/// List items are flat: a run of adjacent `ListItem` blocks of the same
/// kind serializes as one `<ul>`/`<ol>` container. This mirrors how the
/// toolbar commands retag one block at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading(u8),
    ListItem { ordered: bool },
    Quote,
    Code,
}

/// A block node: kind, alignment and inline content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub align: Align,
    pub inlines: Vec<Inline>,
}

impl Block {
    /// An empty paragraph.
    pub fn paragraph() -> Self {
        Self {
            kind: BlockKind::Paragraph,
            align: Align::Left,
            inlines: Vec::new(),
        }
    }

    /// Width of the whole block in characters.
    pub fn char_len(&self) -> usize {
        self.inlines.iter().map(Inline::char_len).sum()
    }

    /// Plain text of the block; breaks become newlines, images nothing.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for inline in &self.inlines {
            match inline {
                Inline::Text { text, .. } | Inline::Link { text, .. } => out.push_str(text),
                Inline::Break => out.push('\n'),
                Inline::Image { .. } => {}
            }
        }
        out
    }

    /// True if the block holds no visible content.
    pub fn is_visibly_empty(&self) -> bool {
        !self
            .inlines
            .iter()
            .any(|inline| match inline {
                Inline::Text { text, .. } | Inline::Link { text, .. } => {
                    !text.trim().is_empty()
                }
                Inline::Image { .. } => true,
                Inline::Break => false,
            })
    }
}

/// A caret position: block index plus character offset within the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub block: usize,
    pub offset: usize,
}

impl Position {
    pub const fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// A selection between two positions; `anchor == head` is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    pub const fn caret(pos: Position) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.anchor == self.head
    }

    /// The selection endpoints in document order.
    pub fn range(&self) -> (Position, Position) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }
}

/// The editor document: an ordered sequence of blocks. Always holds at
/// least one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDocument {
    blocks: Vec<Block>,
}

impl Default for EditorDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorDocument {
    /// A document with a single empty paragraph.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::paragraph()],
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    /// True if the document holds no visible content (text or images).
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(Block::is_visibly_empty)
    }

    /// Plain text of the whole document, blocks separated by newlines.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Position after the last character of the document.
    pub fn end_position(&self) -> Position {
        let block = self.blocks.len() - 1;
        Position::new(block, self.blocks[block].char_len())
    }

    /// Clamp a position onto valid block/offset bounds.
    pub fn clamp(&self, pos: Position) -> Position {
        let block = pos.block.min(self.blocks.len() - 1);
        Position::new(block, pos.offset.min(self.blocks[block].char_len()))
    }

    /// Build a document from an HTML string, sanitizing it first.
    ///
    /// Unknown tags have already been unwrapped by the sanitizer, so only
    /// allow-listed elements need mapping. Stray top-level text and inline
    /// elements accumulate into implicit paragraphs.
    pub fn from_html(html: &str) -> Self {
        let clean = sanitize::sanitize(html);
        let fragment = Html::parse_fragment(&clean);
        let mut blocks = Vec::new();
        let mut current: Vec<Inline> = Vec::new();

        for child in fragment.root_element().children() {
            if let Some(text) = child.value().as_text() {
                push_text(&mut current, text, TextStyle::default());
                continue;
            }
            let Some(el) = ElementRef::wrap(child) else {
                continue;
            };
            match el.value().name() {
                "p" => {
                    flush_paragraph(&mut blocks, &mut current);
                    blocks.push(block_from(el, BlockKind::Paragraph));
                }
                "h1" => {
                    flush_paragraph(&mut blocks, &mut current);
                    blocks.push(block_from(el, BlockKind::Heading(1)));
                }
                "h2" => {
                    flush_paragraph(&mut blocks, &mut current);
                    blocks.push(block_from(el, BlockKind::Heading(2)));
                }
                "h3" => {
                    flush_paragraph(&mut blocks, &mut current);
                    blocks.push(block_from(el, BlockKind::Heading(3)));
                }
                "ul" | "ol" => {
                    flush_paragraph(&mut blocks, &mut current);
                    let ordered = el.value().name() == "ol";
                    for item in el.children() {
                        let Some(item_el) = ElementRef::wrap(item) else {
                            continue;
                        };
                        if item_el.value().name() == "li" {
                            blocks.push(block_from(item_el, BlockKind::ListItem { ordered }));
                        }
                    }
                }
                "blockquote" => {
                    flush_paragraph(&mut blocks, &mut current);
                    blocks.push(block_from(el, BlockKind::Quote));
                }
                "pre" => {
                    flush_paragraph(&mut blocks, &mut current);
                    let text: String = el.text().collect();
                    blocks.push(Block {
                        kind: BlockKind::Code,
                        align: parse_align(el),
                        inlines: vec![Inline::Text {
                            text,
                            style: TextStyle::default(),
                        }],
                    });
                }
                "br" => current.push(Inline::Break),
                _ => collect_node(el, TextStyle::default(), &mut current),
            }
        }
        flush_paragraph(&mut blocks, &mut current);

        if blocks.is_empty() {
            blocks.push(Block::paragraph());
        }
        for block in &mut blocks {
            normalize_inlines(&mut block.inlines);
        }
        Self { blocks }
    }

    /// Serialize to an HTML string.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        let mut i = 0;
        while i < self.blocks.len() {
            let block = &self.blocks[i];
            match block.kind {
                BlockKind::Paragraph => {
                    out.push_str(&open_tag("p", block.align));
                    render_inlines(&block.inlines, &mut out);
                    out.push_str("</p>");
                    i += 1;
                }
                BlockKind::Heading(level) => {
                    let tag = format!("h{level}");
                    out.push_str(&open_tag(&tag, block.align));
                    render_inlines(&block.inlines, &mut out);
                    out.push_str(&format!("</{tag}>"));
                    i += 1;
                }
                BlockKind::ListItem { ordered } => {
                    // Group the run of adjacent items of the same kind.
                    let tag = if ordered { "ol" } else { "ul" };
                    out.push_str(&format!("<{tag}>"));
                    while let Some(item) = self.blocks.get(i) {
                        if item.kind != (BlockKind::ListItem { ordered }) {
                            break;
                        }
                        out.push_str(&open_tag("li", item.align));
                        render_inlines(&item.inlines, &mut out);
                        out.push_str("</li>");
                        i += 1;
                    }
                    out.push_str(&format!("</{tag}>"));
                }
                BlockKind::Quote => {
                    out.push_str(&open_tag("blockquote", block.align));
                    render_inlines(&block.inlines, &mut out);
                    out.push_str("</blockquote>");
                    i += 1;
                }
                BlockKind::Code => {
                    out.push_str(&open_tag("pre", block.align));
                    out.push_str("<code>");
                    out.push_str(&encode_text(&block.text()));
                    out.push_str("</code></pre>");
                    i += 1;
                }
            }
        }
        out
    }
}

fn open_tag(tag: &str, align: Align) -> String {
    match align {
        Align::Left => format!("<{tag}>"),
        Align::Center => format!("<{tag} style=\"text-align: center;\">"),
        Align::Right => format!("<{tag} style=\"text-align: right;\">"),
    }
}

fn render_inlines(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Text { text, style } => {
                let mut open = String::new();
                let mut close = String::new();
                for (flag, tag) in [
                    (style.bold, "strong"),
                    (style.italic, "em"),
                    (style.underline, "u"),
                    (style.code, "code"),
                ] {
                    if flag {
                        open.push_str(&format!("<{tag}>"));
                        close.insert_str(0, &format!("</{tag}>"));
                    }
                }
                out.push_str(&open);
                out.push_str(&encode_text(text));
                out.push_str(&close);
            }
            Inline::Link { text, url } => {
                out.push_str(&format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                    encode_double_quoted_attribute(url),
                    encode_text(text),
                ));
            }
            Inline::Image { src, alt } => {
                out.push_str(&format!(
                    "<img src=\"{}\" alt=\"{}\" style=\"max-width: 100%; height: auto;\">",
                    encode_double_quoted_attribute(src),
                    encode_double_quoted_attribute(alt),
                ));
            }
            Inline::Break => out.push_str("<br>"),
        }
    }
}

fn flush_paragraph(blocks: &mut Vec<Block>, current: &mut Vec<Inline>) {
    if current.is_empty() {
        return;
    }
    blocks.push(Block {
        kind: BlockKind::Paragraph,
        align: Align::Left,
        inlines: std::mem::take(current),
    });
}

fn block_from(el: ElementRef<'_>, kind: BlockKind) -> Block {
    let mut inlines = Vec::new();
    collect_inlines(el, TextStyle::default(), &mut inlines);
    Block {
        kind,
        align: parse_align(el),
        inlines,
    }
}

fn parse_align(el: ElementRef<'_>) -> Align {
    let style = el.value().attr("style").unwrap_or_default();
    let align = el.value().attr("align").unwrap_or_default();
    if style.contains("text-align: center") || align.eq_ignore_ascii_case("center") {
        Align::Center
    } else if style.contains("text-align: right") || align.eq_ignore_ascii_case("right") {
        Align::Right
    } else {
        Align::Left
    }
}

fn collect_inlines(el: ElementRef<'_>, style: TextStyle, out: &mut Vec<Inline>) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            push_text(out, text, style);
            continue;
        }
        if let Some(child_el) = ElementRef::wrap(child) {
            collect_node(child_el, style, out);
        }
    }
}

/// Map a single element into inline nodes, folding its tag into the style.
fn collect_node(el: ElementRef<'_>, style: TextStyle, out: &mut Vec<Inline>) {
    match el.value().name() {
        "b" | "strong" => collect_inlines(el, TextStyle { bold: true, ..style }, out),
        "i" | "em" => collect_inlines(el, TextStyle { italic: true, ..style }, out),
        "u" => collect_inlines(
            el,
            TextStyle {
                underline: true,
                ..style
            },
            out,
        ),
        "code" => collect_inlines(el, TextStyle { code: true, ..style }, out),
        "a" => {
            let text: String = el.text().collect();
            let url = el.value().attr("href").unwrap_or_default().to_string();
            out.push(Inline::Link { text, url });
        }
        "img" => out.push(Inline::Image {
            src: el.value().attr("src").unwrap_or_default().to_string(),
            alt: el.value().attr("alt").unwrap_or_default().to_string(),
        }),
        "br" => out.push(Inline::Break),
        // A nested block element (e.g. <p> inside a blockquote) contributes
        // its content separated by a break.
        _ => {
            if !out.is_empty() {
                out.push(Inline::Break);
            }
            collect_inlines(el, TextStyle::default(), out);
        }
    }
}

fn push_text(out: &mut Vec<Inline>, text: &str, style: TextStyle) {
    if text.is_empty() {
        return;
    }
    if let Some(Inline::Text {
        text: prev,
        style: prev_style,
    }) = out.last_mut()
        && *prev_style == style
    {
        prev.push_str(text);
        return;
    }
    out.push(Inline::Text {
        text: text.to_string(),
        style,
    });
}

/// Drop empty text runs and merge adjacent runs with identical style.
pub(crate) fn normalize_inlines(inlines: &mut Vec<Inline>) {
    let mut normalized: Vec<Inline> = Vec::with_capacity(inlines.len());
    for inline in inlines.drain(..) {
        if inline.is_empty_text() {
            continue;
        }
        if let (
            Some(Inline::Text {
                text: prev,
                style: prev_style,
            }),
            Inline::Text { text, style },
        ) = (normalized.last_mut(), &inline)
            && prev_style == style
        {
            prev.push_str(text);
            continue;
        }
        normalized.push(inline);
    }
    *inlines = normalized;
}

/// Split a run of inlines at a character offset.
pub(crate) fn split_inlines(inlines: &[Inline], offset: usize) -> (Vec<Inline>, Vec<Inline>) {
    let mut before = Vec::new();
    let mut after = Vec::new();
    let mut pos = 0;
    for inline in inlines {
        let len = inline.char_len();
        if pos + len <= offset {
            before.push(inline.clone());
        } else if pos >= offset {
            after.push(inline.clone());
        } else {
            let local = offset - pos;
            match inline {
                Inline::Text { text, style } => {
                    let split_byte = byte_at_char(text, local);
                    before.push(Inline::Text {
                        text: text[..split_byte].to_string(),
                        style: *style,
                    });
                    after.push(Inline::Text {
                        text: text[split_byte..].to_string(),
                        style: *style,
                    });
                }
                Inline::Link { text, url } => {
                    let split_byte = byte_at_char(text, local);
                    before.push(Inline::Link {
                        text: text[..split_byte].to_string(),
                        url: url.clone(),
                    });
                    after.push(Inline::Link {
                        text: text[split_byte..].to_string(),
                        url: url.clone(),
                    });
                }
                // Atomic inlines are one character wide, so a split can
                // never land strictly inside them.
                Inline::Image { .. } | Inline::Break => unreachable!(),
            }
        }
        pos += len;
    }
    (before, after)
}

fn byte_at_char(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(i, _)| i)
}

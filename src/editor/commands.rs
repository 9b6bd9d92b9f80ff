//! Toolbar commands as transformations over the document model.
//!
//! Every command rewrites `(document, selection)` and nothing else, so each
//! toolbar operation is unit-testable without a rendering surface. After a
//! mutating command the caller reads the mirrored HTML back out with
//! [`EditorState::value`].

use tracing::debug;

use super::document::{
    Align, Block, BlockKind, EditorDocument, Inline, Position, Selection, TextStyle,
    normalize_inlines, split_inlines,
};
use super::EditorError;

/// A toolbar or keyboard operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    SetAlign(Align),
    /// Toggle the heading level: applying the current level reverts the
    /// block to a paragraph.
    SetHeading(u8),
    SetParagraph,
    ToggleUnorderedList,
    ToggleOrderedList,
    ToggleQuote,
    ToggleCodeBlock,
    /// Insert a link at the caret. Both fields are required.
    InsertLink { text: String, url: String },
    /// Insert an image by URL. An empty URL (cancelled prompt) is a no-op.
    InsertImage { src: String },
    /// Shift+Enter: a paragraph break instead of the default line break.
    InsertParagraph,
    InsertLineBreak,
    InsertText(String),
    /// Clipboard paste: HTML when available, plain text as fallback. The
    /// HTML path goes through the sanitizer before splicing.
    Paste {
        html: Option<String>,
        text: Option<String>,
    },
}

/// Editor state: document, selection, and the pending typing style used
/// when a style is toggled at a collapsed caret.
#[derive(Debug, Clone)]
pub struct EditorState {
    doc: EditorDocument,
    selection: Selection,
    pending_style: TextStyle,
    dirty: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    /// An empty editor.
    pub fn new() -> Self {
        Self {
            doc: EditorDocument::new(),
            selection: Selection::default(),
            pending_style: TextStyle::default(),
            dirty: false,
        }
    }

    /// An editor mirroring an external HTML value.
    pub fn with_value(html: &str) -> Self {
        let mut state = Self::new();
        state.set_value(html);
        state
    }

    /// Serialized HTML of the current document (the outward mirror).
    pub fn value(&self) -> String {
        self.doc.to_html()
    }

    /// Replace the document from an external HTML value, resetting the
    /// caret to the end and clearing the dirty flag.
    pub fn set_value(&mut self, html: &str) {
        self.doc = EditorDocument::from_html(html);
        self.selection = Selection::caret(self.doc.end_position());
        self.pending_style = TextStyle::default();
        self.dirty = false;
    }

    pub fn document(&self) -> &EditorDocument {
        &self.doc
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Move the selection, clamping it onto the document.
    pub fn select(&mut self, selection: Selection) {
        self.selection = Selection {
            anchor: self.doc.clamp(selection.anchor),
            head: self.doc.clamp(selection.head),
        };
    }

    /// Whether a mutating command has run since the last `set_value`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Validate and return the content for saving.
    ///
    /// An editor with no visible content is rejected so the save callback
    /// is never reached with an empty body.
    pub fn submit(&self) -> Result<String, EditorError> {
        if self.doc.is_empty() {
            return Err(EditorError::EmptyBody);
        }
        Ok(self.doc.to_html())
    }

    /// Apply a command. Validation failures leave the state untouched.
    pub fn apply(&mut self, command: Command) -> Result<(), EditorError> {
        debug!(?command, "applying editor command");
        match command {
            Command::ToggleBold => self.toggle_style(|s| &mut s.bold),
            Command::ToggleItalic => self.toggle_style(|s| &mut s.italic),
            Command::ToggleUnderline => self.toggle_style(|s| &mut s.underline),
            Command::SetAlign(align) => self.retag(|block| block.align = align),
            Command::SetHeading(level) => {
                let level = level.clamp(1, 3);
                self.retag(|block| {
                    block.kind = if block.kind == BlockKind::Heading(level) {
                        BlockKind::Paragraph
                    } else {
                        BlockKind::Heading(level)
                    };
                });
            }
            Command::SetParagraph => self.retag(|block| block.kind = BlockKind::Paragraph),
            Command::ToggleUnorderedList => self.toggle_kind(BlockKind::ListItem { ordered: false }),
            Command::ToggleOrderedList => self.toggle_kind(BlockKind::ListItem { ordered: true }),
            Command::ToggleQuote => self.toggle_kind(BlockKind::Quote),
            Command::ToggleCodeBlock => self.toggle_kind(BlockKind::Code),
            Command::InsertLink { text, url } => {
                if text.trim().is_empty() || url.trim().is_empty() {
                    return Err(EditorError::IncompleteLink);
                }
                self.delete_selection();
                self.insert_inline(Inline::Link { text, url });
            }
            Command::InsertImage { src } => {
                if src.trim().is_empty() {
                    return Ok(());
                }
                self.delete_selection();
                self.insert_inline(Inline::Image {
                    src,
                    alt: "image".to_string(),
                });
            }
            Command::InsertParagraph => {
                self.delete_selection();
                self.split_block();
            }
            Command::InsertLineBreak => {
                self.delete_selection();
                self.insert_inline(Inline::Break);
            }
            Command::InsertText(text) => {
                if text.is_empty() {
                    return Ok(());
                }
                self.delete_selection();
                let style = self.pending_style;
                self.insert_inline(Inline::Text { text, style });
            }
            Command::Paste { html, text } => self.paste(html.as_deref(), text.as_deref()),
        }
        self.dirty = true;
        Ok(())
    }

    // --- Style toggles ---

    fn toggle_style(&mut self, flag: fn(&mut TextStyle) -> &mut bool) {
        if self.selection.is_caret() {
            let value = *flag(&mut self.pending_style);
            *flag(&mut self.pending_style) = !value;
            return;
        }
        // Turn the flag on unless the whole selected text already
        // carries it, in which case turn it off.
        let target = !self.selection_fully_styled(flag);
        let (start, end) = self.selection.range();
        for index in start.block..=end.block {
            let range = self.block_range(index, start, end);
            let block = &mut self.doc.blocks_mut()[index];
            let (before, rest) = split_inlines(&block.inlines, range.0);
            let (mut middle, after) = split_inlines(&rest, range.1 - range.0);
            for inline in &mut middle {
                if let Inline::Text { style, .. } = inline {
                    *flag(style) = target;
                }
            }
            let mut inlines = before;
            inlines.extend(middle);
            inlines.extend(after);
            normalize_inlines(&mut inlines);
            block.inlines = inlines;
        }
    }

    fn selection_fully_styled(&self, flag: fn(&mut TextStyle) -> &mut bool) -> bool {
        let (start, end) = self.selection.range();
        let mut saw_text = false;
        for index in start.block..=end.block {
            let range = self.block_range(index, start, end);
            let (_, rest) = split_inlines(&self.doc.blocks()[index].inlines, range.0);
            let (middle, _) = split_inlines(&rest, range.1 - range.0);
            for inline in middle {
                if let Inline::Text { style, .. } = inline {
                    saw_text = true;
                    let mut style = style;
                    if !*flag(&mut style) {
                        return false;
                    }
                }
            }
        }
        saw_text
    }

    /// Character range of the selection within one block.
    fn block_range(&self, index: usize, start: Position, end: Position) -> (usize, usize) {
        let from = if index == start.block { start.offset } else { 0 };
        let to = if index == end.block {
            end.offset
        } else {
            self.doc.blocks()[index].char_len()
        };
        (from, to)
    }

    // --- Block commands ---

    fn retag(&mut self, f: impl Fn(&mut Block)) {
        let (start, end) = self.selection.range();
        for index in start.block..=end.block {
            f(&mut self.doc.blocks_mut()[index]);
        }
    }

    fn toggle_kind(&mut self, kind: BlockKind) {
        let (start, end) = self.selection.range();
        let all_match = (start.block..=end.block).all(|i| self.doc.blocks()[i].kind == kind);
        self.retag(|block| {
            block.kind = if all_match { BlockKind::Paragraph } else { kind };
        });
    }

    // --- Insertion ---

    fn insert_inline(&mut self, inline: Inline) {
        let caret = self.selection.anchor;
        let advance = inline.char_len();
        let block = &mut self.doc.blocks_mut()[caret.block];
        let (mut before, after) = split_inlines(&block.inlines, caret.offset);
        before.push(inline);
        before.extend(after);
        normalize_inlines(&mut before);
        block.inlines = before;
        self.selection = Selection::caret(Position::new(caret.block, caret.offset + advance));
    }

    fn split_block(&mut self) {
        let caret = self.selection.anchor;
        let block = &self.doc.blocks()[caret.block];
        let (before, after) = split_inlines(&block.inlines, caret.offset);
        // List items continue the list; any other kind starts a fresh
        // paragraph, matching how the surface behaved.
        let new_kind = match block.kind {
            BlockKind::ListItem { ordered } => BlockKind::ListItem { ordered },
            _ => BlockKind::Paragraph,
        };
        let align = block.align;
        let blocks = self.doc.blocks_mut();
        blocks[caret.block].inlines = before;
        blocks.insert(
            caret.block + 1,
            Block {
                kind: new_kind,
                align,
                inlines: after,
            },
        );
        self.selection = Selection::caret(Position::new(caret.block + 1, 0));
    }

    // --- Paste ---

    fn paste(&mut self, html: Option<&str>, text: Option<&str>) {
        let pasted = match (html.filter(|h| !h.is_empty()), text) {
            (Some(html), _) => EditorDocument::from_html(html),
            (None, Some(text)) if !text.is_empty() => plain_text_document(text),
            _ => return,
        };
        self.delete_selection();
        let caret = self.selection.anchor;
        let mut incoming = pasted.blocks().to_vec();

        if incoming.len() == 1 {
            // Single-block paste splices inline at the caret.
            let advance: usize = incoming[0].inlines.iter().map(Inline::char_len).sum();
            let block = &mut self.doc.blocks_mut()[caret.block];
            let (mut before, after) = split_inlines(&block.inlines, caret.offset);
            before.extend(incoming.remove(0).inlines);
            before.extend(after);
            normalize_inlines(&mut before);
            block.inlines = before;
            self.selection = Selection::caret(Position::new(caret.block, caret.offset + advance));
        } else {
            // Multi-block paste splits the current block, merging the first
            // pasted block into the head and the last into the tail.
            self.split_block();
            let tail = self.selection.anchor.block;
            let head = tail - 1;
            let count = incoming.len();
            let first = incoming.remove(0);
            let blocks = self.doc.blocks_mut();
            if blocks[head].inlines.is_empty() {
                // Pasting at the start of an empty block adopts the
                // incoming block wholesale, keeping its kind.
                blocks[head] = first;
            } else {
                blocks[head].inlines.extend(first.inlines);
                normalize_inlines(&mut blocks[head].inlines);
            }
            for (i, block) in incoming.into_iter().enumerate() {
                blocks.insert(tail + i, block);
            }
            let merged_at = tail + count - 2;
            let last_len = blocks[merged_at].char_len();
            let tail_block = blocks.remove(merged_at + 1);
            if !tail_block.inlines.is_empty() {
                blocks[merged_at].inlines.extend(tail_block.inlines);
                normalize_inlines(&mut blocks[merged_at].inlines);
            }
            self.selection = Selection::caret(Position::new(merged_at, last_len));
        }
    }

    // --- Deletion ---

    fn delete_selection(&mut self) {
        if self.selection.is_caret() {
            return;
        }
        let (start, end) = self.selection.range();
        if start.block == end.block {
            let block = &mut self.doc.blocks_mut()[start.block];
            let (before, rest) = split_inlines(&block.inlines, start.offset);
            let (_, after) = split_inlines(&rest, end.offset - start.offset);
            let mut inlines = before;
            inlines.extend(after);
            normalize_inlines(&mut inlines);
            block.inlines = inlines;
        } else {
            let blocks = self.doc.blocks_mut();
            let (keep_head, _) = split_inlines(&blocks[start.block].inlines, start.offset);
            let (_, keep_tail) = split_inlines(&blocks[end.block].inlines, end.offset);
            let mut inlines = keep_head;
            inlines.extend(keep_tail);
            normalize_inlines(&mut inlines);
            blocks[start.block].inlines = inlines;
            blocks.drain(start.block + 1..=end.block);
        }
        self.selection = Selection::caret(start);
    }
}

/// Build a document from pasted plain text: newlines become soft breaks,
/// markup characters stay literal.
fn plain_text_document(text: &str) -> EditorDocument {
    let mut inlines = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            inlines.push(Inline::Break);
        }
        if !line.is_empty() {
            inlines.push(Inline::Text {
                text: line.to_string(),
                style: TextStyle::default(),
            });
        }
    }
    let mut doc = EditorDocument::new();
    doc.blocks_mut()[0].inlines = inlines;
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorError;

    fn editor(html: &str) -> EditorState {
        EditorState::with_value(html)
    }

    fn select(state: &mut EditorState, a: (usize, usize), h: (usize, usize)) {
        state.select(Selection {
            anchor: Position::new(a.0, a.1),
            head: Position::new(h.0, h.1),
        });
    }

    // --- Mirroring ---

    #[test]
    fn test_set_value_round_trips() {
        let state = editor("<p>hello</p>");
        assert_eq!(state.value(), "<p>hello</p>");
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_commands_mark_dirty() {
        let mut state = editor("<p>hello</p>");
        state.apply(Command::InsertText("!".to_string())).unwrap();
        assert!(state.is_dirty());
    }

    // --- Style toggles ---

    #[test]
    fn test_bold_selection() {
        let mut state = editor("<p>hello world</p>");
        select(&mut state, (0, 0), (0, 5));
        state.apply(Command::ToggleBold).unwrap();
        assert_eq!(state.value(), "<p><strong>hello</strong> world</p>");
    }

    #[test]
    fn test_bold_toggles_off_when_fully_bold() {
        let mut state = editor("<p><strong>hello</strong> world</p>");
        select(&mut state, (0, 0), (0, 5));
        state.apply(Command::ToggleBold).unwrap();
        assert_eq!(state.value(), "<p>hello world</p>");
    }

    #[test]
    fn test_partial_bold_extends() {
        let mut state = editor("<p><strong>he</strong>llo</p>");
        select(&mut state, (0, 0), (0, 5));
        state.apply(Command::ToggleBold).unwrap();
        assert_eq!(state.value(), "<p><strong>hello</strong></p>");
    }

    #[test]
    fn test_styles_stack() {
        let mut state = editor("<p>x</p>");
        select(&mut state, (0, 0), (0, 1));
        state.apply(Command::ToggleBold).unwrap();
        state.apply(Command::ToggleItalic).unwrap();
        assert_eq!(state.value(), "<p><strong><em>x</em></strong></p>");
    }

    #[test]
    fn test_caret_toggle_sets_typing_style() {
        let mut state = editor("<p>ab</p>");
        select(&mut state, (0, 1), (0, 1));
        state.apply(Command::ToggleBold).unwrap();
        state.apply(Command::InsertText("X".to_string())).unwrap();
        assert_eq!(state.value(), "<p>a<strong>X</strong>b</p>");
    }

    #[test]
    fn test_underline_selection() {
        let mut state = editor("<p>ab</p>");
        select(&mut state, (0, 0), (0, 2));
        state.apply(Command::ToggleUnderline).unwrap();
        assert_eq!(state.value(), "<p><u>ab</u></p>");
    }

    // --- Block commands ---

    #[test]
    fn test_set_heading() {
        let mut state = editor("<p>title</p>");
        state.apply(Command::SetHeading(2)).unwrap();
        assert_eq!(state.value(), "<h2>title</h2>");
    }

    #[test]
    fn test_set_heading_again_reverts_to_paragraph() {
        let mut state = editor("<h2>title</h2>");
        select(&mut state, (0, 0), (0, 0));
        state.apply(Command::SetHeading(2)).unwrap();
        assert_eq!(state.value(), "<p>title</p>");
    }

    #[test]
    fn test_heading_level_clamped() {
        let mut state = editor("<p>t</p>");
        state.apply(Command::SetHeading(9)).unwrap();
        assert_eq!(state.value(), "<h3>t</h3>");
    }

    #[test]
    fn test_align_center() {
        let mut state = editor("<p>x</p>");
        state.apply(Command::SetAlign(Align::Center)).unwrap();
        assert_eq!(state.value(), "<p style=\"text-align: center;\">x</p>");
    }

    #[test]
    fn test_align_center_on_quote_block() {
        let mut state = editor("<blockquote>wise</blockquote>");
        state.apply(Command::SetAlign(Align::Center)).unwrap();
        assert_eq!(
            state.value(),
            "<blockquote style=\"text-align: center;\">wise</blockquote>"
        );
    }

    #[test]
    fn test_align_right_on_list_item() {
        let mut state = editor("<ul><li>a</li></ul>");
        state.apply(Command::SetAlign(Align::Right)).unwrap();
        assert_eq!(
            state.value(),
            "<ul><li style=\"text-align: right;\">a</li></ul>"
        );
    }

    #[test]
    fn test_toggle_list_over_two_blocks() {
        let mut state = editor("<p>a</p><p>b</p>");
        select(&mut state, (0, 0), (1, 1));
        state.apply(Command::ToggleUnorderedList).unwrap();
        assert_eq!(state.value(), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_toggle_list_off() {
        let mut state = editor("<ul><li>a</li><li>b</li></ul>");
        select(&mut state, (0, 0), (1, 1));
        state.apply(Command::ToggleUnorderedList).unwrap();
        assert_eq!(state.value(), "<p>a</p><p>b</p>");
    }

    #[test]
    fn test_toggle_quote() {
        let mut state = editor("<p>wise</p>");
        state.apply(Command::ToggleQuote).unwrap();
        assert_eq!(state.value(), "<blockquote>wise</blockquote>");
    }

    #[test]
    fn test_toggle_code_block() {
        let mut state = editor("<p>let x;</p>");
        state.apply(Command::ToggleCodeBlock).unwrap();
        assert_eq!(state.value(), "<pre><code>let x;</code></pre>");
    }

    // --- Link / image insertion ---

    #[test]
    fn test_insert_link() {
        let mut state = editor("<p>see </p>");
        select(&mut state, (0, 4), (0, 4));
        state
            .apply(Command::InsertLink {
                text: "docs".to_string(),
                url: "https://x.dev".to_string(),
            })
            .unwrap();
        assert_eq!(
            state.value(),
            "<p>see <a href=\"https://x.dev\" target=\"_blank\" \
             rel=\"noopener noreferrer\">docs</a></p>"
        );
    }

    #[test]
    fn test_insert_link_without_text_is_rejected() {
        let mut state = editor("<p>see </p>");
        let before = state.value();
        let err = state
            .apply(Command::InsertLink {
                text: "  ".to_string(),
                url: "https://x.dev".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, EditorError::IncompleteLink);
        assert_eq!(state.value(), before, "rejected command must not mutate");
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_insert_link_without_url_is_rejected() {
        let mut state = editor("<p></p>");
        let err = state
            .apply(Command::InsertLink {
                text: "docs".to_string(),
                url: String::new(),
            })
            .unwrap_err();
        assert_eq!(err, EditorError::IncompleteLink);
    }

    #[test]
    fn test_insert_image() {
        let mut state = editor("<p></p>");
        state
            .apply(Command::InsertImage {
                src: "https://x.dev/a.png".to_string(),
            })
            .unwrap();
        assert_eq!(
            state.value(),
            "<p><img src=\"https://x.dev/a.png\" alt=\"image\" \
             style=\"max-width: 100%; height: auto;\"></p>"
        );
    }

    #[test]
    fn test_insert_image_empty_src_is_noop() {
        let mut state = editor("<p>x</p>");
        state.apply(Command::InsertImage { src: String::new() }).unwrap();
        assert_eq!(state.value(), "<p>x</p>");
    }

    // --- Breaks ---

    #[test]
    fn test_insert_paragraph_splits_block() {
        let mut state = editor("<p>hello world</p>");
        select(&mut state, (0, 5), (0, 5));
        state.apply(Command::InsertParagraph).unwrap();
        assert_eq!(state.value(), "<p>hello</p><p> world</p>");
        assert_eq!(state.selection().anchor, Position::new(1, 0));
    }

    #[test]
    fn test_insert_line_break() {
        let mut state = editor("<p>ab</p>");
        select(&mut state, (0, 1), (0, 1));
        state.apply(Command::InsertLineBreak).unwrap();
        assert_eq!(state.value(), "<p>a<br>b</p>");
    }

    #[test]
    fn test_split_list_item_continues_list() {
        let mut state = editor("<ul><li>ab</li></ul>");
        select(&mut state, (0, 1), (0, 1));
        state.apply(Command::InsertParagraph).unwrap();
        assert_eq!(state.value(), "<ul><li>a</li><li>b</li></ul>");
    }

    // --- Paste ---

    #[test]
    fn test_paste_html_is_sanitized() {
        let mut state = editor("<p>ab</p>");
        select(&mut state, (0, 1), (0, 1));
        state
            .apply(Command::Paste {
                html: Some("<span onclick=\"x()\"><b>X</b></span>".to_string()),
                text: None,
            })
            .unwrap();
        assert_eq!(state.value(), "<p>a<strong>X</strong>b</p>");
    }

    #[test]
    fn test_paste_plain_text_fallback_stays_literal() {
        let mut state = editor("<p></p>");
        state
            .apply(Command::Paste {
                html: None,
                text: Some("<b>not markup</b>".to_string()),
            })
            .unwrap();
        assert_eq!(state.value(), "<p>&lt;b&gt;not markup&lt;/b&gt;</p>");
    }

    #[test]
    fn test_paste_multi_block() {
        let mut state = editor("<p>ab</p>");
        select(&mut state, (0, 1), (0, 1));
        state
            .apply(Command::Paste {
                html: Some("<p>one</p><p>two</p>".to_string()),
                text: None,
            })
            .unwrap();
        assert_eq!(state.value(), "<p>aone</p><p>twob</p>");
    }

    #[test]
    fn test_paste_replaces_selection() {
        let mut state = editor("<p>hello</p>");
        select(&mut state, (0, 1), (0, 4));
        state
            .apply(Command::Paste {
                html: Some("X".to_string()),
                text: None,
            })
            .unwrap();
        assert_eq!(state.value(), "<p>hXo</p>");
    }

    #[test]
    fn test_paste_empty_is_noop() {
        let mut state = editor("<p>x</p>");
        state
            .apply(Command::Paste {
                html: None,
                text: None,
            })
            .unwrap();
        assert_eq!(state.value(), "<p>x</p>");
    }

    // --- Typing over a selection ---

    #[test]
    fn test_insert_text_replaces_selection() {
        let mut state = editor("<p>hello</p>");
        select(&mut state, (0, 0), (0, 5));
        state.apply(Command::InsertText("bye".to_string())).unwrap();
        assert_eq!(state.value(), "<p>bye</p>");
    }

    #[test]
    fn test_delete_selection_across_blocks() {
        let mut state = editor("<p>hello</p><p>mid</p><p>world</p>");
        select(&mut state, (0, 3), (2, 2));
        state.apply(Command::InsertText("-".to_string())).unwrap();
        assert_eq!(state.value(), "<p>hel-rld</p>");
    }

    // --- Submit validation ---

    #[test]
    fn test_submit_empty_body_is_rejected() {
        let state = editor("<p><br></p>");
        assert_eq!(state.submit(), Err(EditorError::EmptyBody));
    }

    #[test]
    fn test_submit_returns_html() {
        let state = editor("<p>body</p>");
        assert_eq!(state.submit().unwrap(), "<p>body</p>");
    }
}

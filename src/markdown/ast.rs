//! Typed node tree produced by the markdown parser.

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Plain paragraph content.
    Paragraph(Vec<Inline>),
    /// Heading, levels 1-3 only.
    Heading { level: u8, inlines: Vec<Inline> },
    /// A run of adjacent list items of the same kind.
    List { ordered: bool, items: Vec<Vec<Inline>> },
    /// A run of adjacent `> ` lines.
    Blockquote(Vec<Inline>),
    /// Fenced code block. Text is kept verbatim, escaping happens at
    /// serialization time.
    CodeBlock { text: String },
}

/// An inline node within a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Literal text.
    Text(String),
    /// `**bold**`
    Strong(Vec<Inline>),
    /// `*italic*`
    Emph(Vec<Inline>),
    /// Backtick code span.
    Code(String),
    /// `[text](url)`
    Link { text: String, url: String },
    /// Hard line break from a single newline inside a paragraph.
    Break,
}

impl Inline {
    /// The plain text carried by this node, links flattened to their
    /// display text.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text(t) | Self::Code(t) => t.clone(),
            Self::Strong(inner) | Self::Emph(inner) => {
                inner.iter().map(Self::plain_text).collect()
            }
            Self::Link { text, .. } => text.clone(),
            Self::Break => "\n".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_flattens_nesting() {
        let inline = Inline::Strong(vec![
            Inline::Text("a ".to_string()),
            Inline::Emph(vec![Inline::Text("b".to_string())]),
        ]);
        assert_eq!(inline.plain_text(), "a b");
    }

    #[test]
    fn test_plain_text_uses_link_text() {
        let inline = Inline::Link {
            text: "home".to_string(),
            url: "https://example.com".to_string(),
        };
        assert_eq!(inline.plain_text(), "home");
    }
}

//! Paste-in importer for AI-chat transcripts and other markdown-ish
//! text: validates the input, converts it to editor HTML, and reports
//! what the conversion found.

use thiserror::Error;
use tracing::info;

use crate::markdown;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The pasted text was empty or whitespace. Conversion is not
    /// attempted.
    #[error("paste some content before importing")]
    Empty,
}

/// What a conversion produced, for the confirmation shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub headings: usize,
    pub links: usize,
    pub list_items: usize,
    pub code_blocks: usize,
    /// Human-readable notes about degraded input.
    pub warnings: Vec<String>,
}

/// Converted HTML plus its report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Imported {
    pub html: String,
    pub report: ImportReport,
}

/// Convert pasted text to the editor's HTML subset.
pub fn import(text: &str) -> Result<Imported, ImportError> {
    if text.trim().is_empty() {
        return Err(ImportError::Empty);
    }
    let blocks = markdown::parse(text);
    let mut report = ImportReport::default();
    // An odd number of fence lines means the last block ran to the end
    // of the input unterminated.
    if text.lines().filter(|l| l.starts_with("```")).count() % 2 == 1 {
        report
            .warnings
            .push("unclosed code fence runs to end of input".to_string());
    }
    for block in &blocks {
        match block {
            markdown::Block::Heading { .. } => report.headings += 1,
            markdown::Block::List { items, .. } => {
                report.list_items += items.len();
                report.links += items.iter().map(|i| count_links(i)).sum::<usize>();
            }
            markdown::Block::CodeBlock { .. } => report.code_blocks += 1,
            markdown::Block::Paragraph(inlines) | markdown::Block::Blockquote(inlines) => {
                report.links += count_links(inlines);
            }
        }
        if let markdown::Block::Heading { inlines, .. } = block {
            report.links += count_links(inlines);
        }
    }
    let html = markdown::render(&blocks);
    info!(
        headings = report.headings,
        links = report.links,
        list_items = report.list_items,
        code_blocks = report.code_blocks,
        "import converted"
    );
    Ok(Imported { html, report })
}

fn count_links(inlines: &[markdown::Inline]) -> usize {
    inlines
        .iter()
        .map(|inline| match inline {
            markdown::Inline::Link { .. } => 1,
            markdown::Inline::Strong(inner) | markdown::Inline::Emph(inner) => count_links(inner),
            _ => 0,
        })
        .sum()
}

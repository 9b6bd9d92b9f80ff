//! Rich-text editor: a typed document model plus a command layer.
//!
//! The document is a flat list of [`Block`]s holding styled [`Inline`]
//! runs. [`EditorState`] applies toolbar and keyboard [`Command`]s to it
//! and serializes back to the same HTML subset the sanitizer allows,
//! so pasted or loaded content always round-trips cleanly.

mod commands;
mod document;

pub use commands::{Command, EditorState};
pub use document::{
    Align, Block, BlockKind, EditorDocument, Inline, Position, Selection, TextStyle,
};

use thiserror::Error;

/// Validation failures surfaced to the user instead of mutating state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// Submit was attempted with no visible content.
    #[error("content cannot be empty")]
    EmptyBody,
    /// A link insertion was missing its text or its URL.
    #[error("both link text and URL are required")]
    IncompleteLink,
}

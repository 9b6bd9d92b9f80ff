// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorState)
    clippy::module_name_repetitions
)]

//! # Creatorly Content
//!
//! Content pipeline for the Creatorly blog: markdown import, HTML
//! sanitization, and a rich-text document model.
//!
//! The crate covers the full path a post takes:
//! - Pasted markdown-ish text converted to a safe HTML subset
//! - Clipboard HTML reduced to the editor's tag allow-list
//! - A typed editor document with toolbar commands and validation
//! - Content records, catalog lookups, and integrity-checked storage
//! - Explicit admin sessions backed by a pluggable cache
//!
//! ## Modules
//!
//! - [`markdown`]: Line tokenizer, block parser, and HTML renderer
//! - [`sanitize`]: Tag allow-list sanitizer with a suspicion report
//! - [`editor`]: Document model and command layer
//! - [`content`]: Records, catalog, and store
//! - [`session`]: Sign-in state and caching
//! - [`importer`]: Paste-to-post conversion with a report

pub mod config;
pub mod content;
pub mod editor;
pub mod error;
pub mod importer;
pub mod markdown;
pub mod sanitize;
pub mod session;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::content::{BlogCatalog, ContentStore, Post};
    pub use crate::editor::{Command, EditorState};
    pub use crate::error::BackendError;
    pub use crate::importer::import;
    pub use crate::markdown::to_html;
    pub use crate::sanitize::sanitize;
}

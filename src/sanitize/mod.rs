//! Clipboard HTML sanitizer.
//!
//! Pasted fragments are parsed into a real tree and rewalked: any element
//! whose tag is not on the fixed allow-list is unwrapped — replaced by its
//! own children — so text content is never lost and nested allowed structure
//! survives. Attributes on allowed elements pass through unfiltered; event
//! handlers and `javascript:` URLs are reported and logged rather than
//! stripped, so callers can decide what to do with a risky paste.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::warn;

/// Tags that survive sanitization. Everything else is unwrapped.
pub const ALLOWED_TAGS: &[&str] = &[
    "p",
    "br",
    "b",
    "strong",
    "i",
    "em",
    "u",
    "ul",
    "ol",
    "li",
    "h1",
    "h2",
    "h3",
    "blockquote",
    "pre",
    "code",
    "a",
    "img",
];

/// Elements serialized without a closing tag.
const VOID_TAGS: &[&str] = &["br", "img"];

static EVENT_HANDLER_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^on[a-z]+$").expect("valid regex"));
static JAVASCRIPT_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*javascript:").expect("valid regex"));

/// What the sanitizer saw while cleaning a fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    /// Tags that were unwrapped, in document order (duplicates kept).
    pub unwrapped_tags: Vec<String>,
    /// Attributes that look dangerous but were passed through, as
    /// `tag@attr` pairs.
    pub flagged_attributes: Vec<String>,
}

impl SanitizeReport {
    /// True if nothing was unwrapped or flagged.
    pub fn is_clean(&self) -> bool {
        self.unwrapped_tags.is_empty() && self.flagged_attributes.is_empty()
    }
}

/// Sanitize an HTML fragment, discarding the report.
pub fn sanitize(html: &str) -> String {
    sanitize_with_report(html).0
}

/// Sanitize an HTML fragment and describe what was removed or flagged.
pub fn sanitize_with_report(html: &str) -> (String, SanitizeReport) {
    let fragment = Html::parse_fragment(html);
    let mut out = String::new();
    let mut report = SanitizeReport::default();
    // parse_fragment wraps content in a synthetic <html> element; its
    // children are the fragment itself.
    visit_children(fragment.root_element(), &mut out, &mut report);
    (out, report)
}

fn visit_children(el: ElementRef<'_>, out: &mut String, report: &mut SanitizeReport) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(&html_escape::encode_text(&**text));
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let tag = child_el.value().name();
            if ALLOWED_TAGS.contains(&tag) {
                emit_element(child_el, out, report);
            } else {
                report.unwrapped_tags.push(tag.to_string());
                visit_children(child_el, out, report);
            }
        }
        // Comments, doctypes and processing instructions are dropped.
    }
}

fn emit_element(el: ElementRef<'_>, out: &mut String, report: &mut SanitizeReport) {
    let tag = el.value().name();
    out.push('<');
    out.push_str(tag);
    for (name, value) in el.value().attrs() {
        flag_suspicious_attribute(tag, name, value, report);
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');
    if VOID_TAGS.contains(&tag) {
        return;
    }
    visit_children(el, out, report);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn flag_suspicious_attribute(tag: &str, name: &str, value: &str, report: &mut SanitizeReport) {
    let handler = EVENT_HANDLER_ATTR.is_match(name);
    let js_url = matches!(name, "href" | "src") && JAVASCRIPT_URL.is_match(value);
    if handler || js_url {
        warn!(tag, attribute = name, "suspicious attribute passed through sanitizer");
        report.flagged_attributes.push(format!("{tag}@{name}"));
    }
}

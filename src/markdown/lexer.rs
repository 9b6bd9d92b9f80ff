//! Line-level tokenizer for the markdown subset.
//!
//! Classification is purely prefix-based, one token per source line. The
//! parser is responsible for grouping runs of tokens (list items, quote
//! lines, fenced code) into blocks.

/// One source line, classified by its marker prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineToken<'a> {
    /// `#`, `##` or `###` followed by a space.
    Heading { level: u8, text: &'a str },
    /// `* `, `- ` or `1. ` style item.
    ListItem { ordered: bool, text: &'a str },
    /// `> ` quote line.
    Quote(&'a str),
    /// ```` ``` ```` fence delimiter; the payload is the info string.
    Fence(&'a str),
    /// Empty (or whitespace-only) line.
    Blank,
    /// Anything else.
    Text(&'a str),
}

/// Split input into classified lines.
///
/// Splitting is on `\n` so a trailing newline yields a final [`LineToken::Blank`];
/// the parser turns that into a trailing line break.
pub fn tokenize(input: &str) -> Vec<LineToken<'_>> {
    input.split('\n').map(classify).collect()
}

fn classify(line: &str) -> LineToken<'_> {
    if line.trim().is_empty() {
        return LineToken::Blank;
    }
    if let Some(rest) = line.strip_prefix("```") {
        return LineToken::Fence(rest.trim());
    }
    for (marker, level) in [("### ", 3u8), ("## ", 2), ("# ", 1)] {
        if let Some(rest) = line.strip_prefix(marker) {
            return LineToken::Heading { level, text: rest };
        }
    }
    if let Some(rest) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
        return LineToken::ListItem {
            ordered: false,
            text: rest,
        };
    }
    if let Some(rest) = ordered_item(line) {
        return LineToken::ListItem {
            ordered: true,
            text: rest,
        };
    }
    if let Some(rest) = line.strip_prefix("> ") {
        return LineToken::Quote(rest);
    }
    LineToken::Text(line)
}

/// Match `1. `-style markers: one or more digits, a dot, a space.
fn ordered_item(line: &str) -> Option<&str> {
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    line[digits..].strip_prefix(". ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_levels() {
        assert_eq!(
            classify("# Title"),
            LineToken::Heading {
                level: 1,
                text: "Title"
            }
        );
        assert_eq!(
            classify("### Sub"),
            LineToken::Heading {
                level: 3,
                text: "Sub"
            }
        );
    }

    #[test]
    fn test_heading_requires_space() {
        assert_eq!(classify("#Title"), LineToken::Text("#Title"));
    }

    #[test]
    fn test_four_hashes_is_text() {
        assert_eq!(classify("#### Deep"), LineToken::Text("#### Deep"));
    }

    #[test]
    fn test_unordered_markers() {
        assert_eq!(
            classify("* item"),
            LineToken::ListItem {
                ordered: false,
                text: "item"
            }
        );
        assert_eq!(
            classify("- item"),
            LineToken::ListItem {
                ordered: false,
                text: "item"
            }
        );
    }

    #[test]
    fn test_ordered_marker() {
        assert_eq!(
            classify("12. item"),
            LineToken::ListItem {
                ordered: true,
                text: "item"
            }
        );
        assert_eq!(classify("1item"), LineToken::Text("1item"));
        assert_eq!(classify("1.item"), LineToken::Text("1.item"));
    }

    #[test]
    fn test_quote_marker() {
        assert_eq!(classify("> wise words"), LineToken::Quote("wise words"));
    }

    #[test]
    fn test_fence_with_info_string() {
        assert_eq!(classify("```rust"), LineToken::Fence("rust"));
        assert_eq!(classify("```"), LineToken::Fence(""));
    }

    #[test]
    fn test_blank_includes_whitespace_only() {
        assert_eq!(classify("   "), LineToken::Blank);
        assert_eq!(classify(""), LineToken::Blank);
    }

    #[test]
    fn test_trailing_newline_yields_final_blank() {
        let tokens = tokenize("hello\n");
        assert_eq!(tokens, vec![LineToken::Text("hello"), LineToken::Blank]);
    }
}

//! Width-aware text helpers for terminal layout
//!
//! Widths are measured in terminal columns (`unicode-width`), and cuts are
//! made on grapheme boundaries so combining sequences are never split.

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: &str = "...";

/// Number of terminal columns `text` occupies
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Truncate text to at most `max_width` columns, marking the cut with `...`
pub fn safe_truncate(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }

    let ellipsis_width = display_width(ELLIPSIS);
    let budget = max_width.saturating_sub(ellipsis_width);
    let with_ellipsis = max_width >= ellipsis_width;

    let mut truncated = String::new();
    let mut current_width = 0;
    let limit = if with_ellipsis { budget } else { max_width };

    for grapheme in text.graphemes(true) {
        let grapheme_width = display_width(grapheme);
        if current_width + grapheme_width > limit {
            break;
        }
        truncated.push_str(grapheme);
        current_width += grapheme_width;
    }

    if with_ellipsis {
        truncated.push_str(ELLIPSIS);
    }

    truncated
}

fn whitespace_regex() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("static whitespace pattern"))
}

/// NFC-normalise and collapse runs of whitespace into single spaces
pub fn normalize_whitespace(text: &str) -> String {
    let normalized: String = text.nfc().collect();
    let result = whitespace_regex().replace_all(&normalized, " ");
    result.trim().to_string()
}

/// Greedy word wrap to `width` columns.
///
/// Words wider than the line are hard-split on grapheme boundaries. Empty
/// input yields a single empty line so callers always get at least one row.
pub fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = display_width(word);

        if word_width > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            for grapheme in word.graphemes(true) {
                let grapheme_width = display_width(grapheme);
                if current_width + grapheme_width > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push_str(grapheme);
                current_width += grapheme_width;
            }
            continue;
        }

        let needed = if current.is_empty() { word_width } else { current_width + 1 + word_width };
        if needed > width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width = needed;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

/// Centre `text` within `width` columns by left padding
pub fn center(text: &str, width: usize) -> String {
    let text_width = display_width(text);
    if text_width >= width {
        return text.to_string();
    }
    let pad = (width - text_width) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

//! Match highlighting as a sequence of spans.
//!
//! Rendering layers compose [`Span`]s themselves; nothing here emits markup.

use regex::RegexBuilder;

/// Compiled patterns are user-driven, so keep them small.
const PATTERN_SIZE_LIMIT: usize = 1 << 16;

/// A run of text that either matched a highlight pattern or did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub is_match: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_match: false,
        }
    }

    pub fn matched(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_match: true,
        }
    }
}

/// Case-insensitive literal pattern for `term`, or `None` for a blank term.
pub fn literal_pattern(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    Some(format!("(?i){}", regex::escape(term)))
}

/// Pattern matching the digits of `term` in order with any run of non-digits between them.
///
/// A search for `123` therefore matches `(1) 2-3`. Returns `None` when `term` has no digits.
pub fn fuzzy_digit_pattern(term: &str) -> Option<String> {
    let digits: Vec<String> = term
        .chars()
        .filter(char::is_ascii_digit)
        .map(String::from)
        .collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.join(r"\D*"))
}

/// Split `text` into spans, marking every region matched by any of `patterns`.
///
/// Overlapping or adjacent matches are merged. If any pattern fails to compile, the whole text
/// is returned unmarked.
pub fn highlight(text: &str, patterns: &[String]) -> Vec<Span> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for pattern in patterns {
        let regex = match RegexBuilder::new(pattern)
            .size_limit(PATTERN_SIZE_LIMIT)
            .build()
        {
            Ok(regex) => regex,
            Err(e) => {
                tracing::debug!("highlight pattern rejected ({pattern}): {e}");
                return vec![Span::plain(text)];
            }
        };
        ranges.extend(
            regex
                .find_iter(text)
                .filter(|m| !m.is_empty())
                .map(|m| (m.start(), m.end())),
        );
    }

    if ranges.is_empty() {
        return vec![Span::plain(text)];
    }

    ranges.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    let mut spans = Vec::with_capacity(merged.len() * 2 + 1);
    let mut cursor = 0;
    for (start, end) in merged {
        if start > cursor {
            spans.push(Span::plain(&text[cursor..start]));
        }
        spans.push(Span::matched(&text[start..end]));
        cursor = end;
    }
    if cursor < text.len() {
        spans.push(Span::plain(&text[cursor..]));
    }
    spans
}

//! Phone number presentation.
//!
//! Formatting here is display-only. Stored values are never rewritten, and matching compares
//! digit-only forms via [`digits_only`].

/// Keep only the ASCII digits of `raw`.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Format a raw phone number in the national `+1 (AAA) EEE-LLLL` pattern.
///
/// A leading country code `1` is dropped from 11-digit numbers. Shorter inputs get
/// progressively less structure:
///
/// | digits | output            |
/// |--------|-------------------|
/// | 0      | input, trimmed    |
/// | 1-3    | `555`             |
/// | 4-6    | `(555) 12`        |
/// | 7+     | `+1 (555) 123-4567` |
///
/// Digits past the tenth stay in the line segment rather than being dropped.
pub fn format_phone(raw: &str) -> String {
    let mut digits = digits_only(raw);
    if digits.is_empty() {
        return raw.trim().to_owned();
    }

    if digits.len() == 11 && digits.starts_with('1') {
        digits.remove(0);
    }

    match digits.len() {
        0..=3 => digits,
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => format!("+1 ({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..]),
    }
}

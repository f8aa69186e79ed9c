//! Text-level helpers for decoded scripts.
//!
//! Scripts are treated as ASCII text. These helpers reproduce the exact
//! line splitting, whitespace trimming and integer token rules that the
//! archive's scripts were authored against, so that ambiguous inputs
//! produce the same records.

use serde_json::Number;

use crate::error::{ExtractError, Result};

/// Replacement for bytes that are not ASCII.
pub const REPLACEMENT_CHAR: char = '\u{FFFD}';

/// Decodes script bytes as ASCII, replacing every non-ASCII byte with
/// [`REPLACEMENT_CHAR`].
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii() {
                char::from(b)
            } else {
                REPLACEMENT_CHAR
            }
        })
        .collect()
}

/// Returns true for every character that terminates a line.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n'
            | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Splits `text` into lines.
///
/// `\r\n` counts as a single break. A trailing break does not produce an
/// extra empty line, but empty lines between breaks are kept.
#[must_use]
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' && matches!(chars.peek(), Some(&(_, '\n'))) {
            chars.next();
            start += 1;
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Returns true for characters stripped by [`trim`].
fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

/// Strips leading and trailing whitespace, including the ASCII
/// separator controls `\x1c`..`\x1f`.
#[must_use]
pub fn trim(s: &str) -> &str {
    s.trim_matches(is_space)
}

/// Returns true if the line is empty or whitespace only.
#[must_use]
pub fn is_blank(s: &str) -> bool {
    trim(s).is_empty()
}

/// Returns true if `s` contains an ASCII digit.
#[must_use]
pub fn has_digit(s: &str) -> bool {
    s.bytes().any(|b| b.is_ascii_digit())
}

/// Returns the first run of ASCII digits in `s`.
#[must_use]
pub fn first_digit_run(s: &str) -> Option<&str> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let rest = &s[start..];
    let len = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    Some(&rest[..len])
}

/// Parses the first digit run of `s` as an unsigned value.
///
/// Returns `Ok(None)` when `s` holds no digits.
///
/// # Errors
///
/// Returns `ExtractError::IntegerParseFailure` if the run overflows `u64`.
pub fn first_number(s: &str) -> Result<Option<u64>> {
    first_digit_run(s)
        .map(|run| run.parse::<u64>().map_err(|_| ExtractError::integer_parse(run)))
        .transpose()
}

/// Returns the first digit run of `s` as an exact JSON number of any length.
///
/// Leading zeros are dropped. Returns `None` when `s` holds no digits.
#[must_use]
pub fn first_number_literal(s: &str) -> Option<Number> {
    let run = first_digit_run(s)?;
    let digits = run.trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    digits.parse().ok()
}

/// Parses one integer token.
///
/// Accepts surrounding whitespace, an optional `+` or `-` sign, and ASCII
/// digits optionally grouped by single underscores (`1_000`).
///
/// # Errors
///
/// Returns `ExtractError::IntegerParseFailure` for anything else, including
/// values outside the `i64` range.
pub fn parse_int_token(token: &str) -> Result<i64> {
    let trimmed = trim(token);
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let well_formed = !digits.is_empty()
        && !digits.starts_with('_')
        && !digits.ends_with('_')
        && !digits.contains("__")
        && digits.bytes().all(|b| b.is_ascii_digit() || b == b'_');
    if !well_formed {
        return Err(ExtractError::integer_parse(token));
    }

    let mut literal = String::with_capacity(digits.len() + 1);
    if negative {
        literal.push('-');
    }
    literal.extend(digits.chars().filter(|&c| c != '_'));

    literal
        .parse::<i64>()
        .map_err(|_| ExtractError::integer_parse(token))
}

/// Splits `line` on tabs and parses every non-empty token.
///
/// # Errors
///
/// Returns `ExtractError::IntegerParseFailure` for the first token that is
/// not an integer.
pub fn parse_ints(line: &str) -> Result<Vec<i64>> {
    line.split('\t')
        .filter(|token| !token.is_empty())
        .map(parse_int_token)
        .collect()
}

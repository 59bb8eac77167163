//! Per-entry normalization: canonical names, code-point escapes, display text.
//!
//! # Responsibility
//! - Derive `Entry` rows from `RawEntry` records joined with the alias index.
//! - Own the text transforms shared with the renderer (`texify`).
//!
//! # Invariants
//! - Canonical names contain no whitespace, no combining marks and none of
//!   the removed punctuation characters.
//! - Code-point escapes are 4 or 6 lower-case hex digits; other widths fail.

use crate::alias::AliasIndex;
use crate::model::entry::{Entry, RawEntry};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Punctuation dropped from canonical names (straight and curly quotes alike).
const REMOVED_NAME_CHARS: &[char] = &[
    ',', '.', ':', '(', ')', '\'', '"', '\u{2019}', '\u{201C}', '\u{201D}', '&',
];

const SHORT_ESCAPE: &str = "^^^^";
const LONG_ESCAPE: &str = "^^^^^^";

pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Fatal per-entry normalization failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Hex token is neither 4 digits nor 5–6 digits long.
    UnsupportedCodePointWidth { token: String },
    /// Hex token does not denote a Unicode scalar value.
    InvalidCodePoint { token: String },
}

impl Display for NormalizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedCodePointWidth { token } => write!(
                f,
                "unsupported code point width: `{token}` has {} hex digits (expected 4, 5 or 6)",
                token.len()
            ),
            Self::InvalidCodePoint { token } => write!(f, "invalid code point: `{token}`"),
        }
    }
}

impl Error for NormalizeError {}

/// Derives the canonical identifier of a description.
///
/// `"Keycap: #"` → `"keycap-hash"`, `"piñata"` → `"pinata"`.
pub fn canonical_name(description: &str) -> String {
    let stripped: String = description
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c) && !REMOVED_NAME_CHARS.contains(c))
        .collect();
    WHITESPACE_RE
        .replace_all(&stripped, "-")
        .replace('#', "hash")
        .replace('*', "asterisk")
}

/// Renders one hex token as a typesetting escape.
///
/// # Errors
/// - `InvalidCodePoint` when the token is not hexadecimal.
/// - `UnsupportedCodePointWidth` when the token width is not 4, 5 or 6.
pub fn tex_code_point(token: &str) -> NormalizeResult<String> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(NormalizeError::InvalidCodePoint {
            token: token.to_string(),
        });
    }
    let lower = token.to_ascii_lowercase();
    match token.len() {
        4 => Ok(format!("{SHORT_ESCAPE}{lower}")),
        5 | 6 => Ok(format!("{LONG_ESCAPE}{lower:0>6}")),
        _ => Err(NormalizeError::UnsupportedCodePointWidth {
            token: token.to_string(),
        }),
    }
}

/// Concatenates the escapes of a token sequence with no separator.
pub fn tex_code_points<S: AsRef<str>>(tokens: &[S]) -> NormalizeResult<String> {
    tokens
        .iter()
        .map(|token| tex_code_point(token.as_ref()))
        .collect()
}

fn parse_scalar(token: &str) -> NormalizeResult<char> {
    u32::from_str_radix(token, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| NormalizeError::InvalidCodePoint {
            token: token.to_string(),
        })
}

/// Escapes text for the typesetting layer and capitalizes its first character.
///
/// Only index 0 is touched, so `"flag: USA"` keeps its acronym as is.
pub fn texify(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("\\&"),
            '#' => escaped.push_str("\\#"),
            '\u{2019}' => escaped.push('\''),
            '\u{201C}' => escaped.push_str("``"),
            '\u{201D}' => escaped.push_str("''"),
            ' ' => escaped.push('~'),
            other => escaped.push(other),
        }
    }
    capitalize_first(&escaped)
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds a table row from a parsed line and the alias index.
///
/// Aliases are the raw union of both lookups; collisions with other rows
/// are resolved later by the deduplication pass.
pub fn normalize_entry(raw: RawEntry, aliases: &AliasIndex) -> NormalizeResult<Entry> {
    let tex_code_points = tex_code_points(&raw.code_points)?;
    let code_points = raw
        .code_points
        .iter()
        .map(|token| parse_scalar(token))
        .collect::<NormalizeResult<Vec<char>>>()?;
    let found = aliases.lookup(&raw.sequence_key(), &raw.description);

    Ok(Entry {
        code_points,
        tex_code_points,
        canonical_name: canonical_name(&raw.description),
        aliases: found,
        display_description: texify(&raw.description),
        description: raw.description,
        version: raw.version,
    })
}

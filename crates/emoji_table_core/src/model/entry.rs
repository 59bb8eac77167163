//! Emoji record types.
//!
//! # Responsibility
//! - Describe one standard-body line before normalization (`RawEntry`).
//! - Describe one fully normalized table row (`Entry`).
//!
//! # Invariants
//! - `code_points` is never empty.
//! - `Entry::aliases` is only rewritten by the deduplication pass.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Standard revision that introduced an emoji (`E<major>.<minor>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Error returned when a dotted `major.minor` pair cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionParseError(pub String);

impl Display for VersionParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid emoji version `{}` (expected major.minor)", self.0)
    }
}

impl Error for VersionParseError {}

impl FromStr for Version {
    type Err = VersionParseError;

    /// Accepts `12.1` and the prefixed `E12.1` form used by the source file.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let digits = trimmed.strip_prefix('E').unwrap_or(trimmed);
        let (major, minor) = digits
            .split_once('.')
            .ok_or_else(|| VersionParseError(value.to_string()))?;
        let parse = |part: &str| {
            part.parse::<u32>()
                .map_err(|_| VersionParseError(value.to_string()))
        };
        Ok(Self::new(parse(major)?, parse(minor)?))
    }
}

/// One qualifying data line of the standard-body file, as parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Upper-case hex tokens in source order, e.g. `["1F469", "200D", "1F4BB"]`.
    pub code_points: Vec<String>,
    pub version: Version,
    /// Free-text description, trimmed.
    pub description: String,
}

impl RawEntry {
    /// Returns the code-point-sequence key shared with the alias index.
    pub fn sequence_key(&self) -> String {
        self.code_points.join(" ")
    }
}

/// Normalized table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Unicode scalar values in sequence order.
    pub code_points: Vec<char>,
    /// Output form of `code_points` (`^^^^xxxx` / `^^^^^^xxxxxx` escapes).
    pub tex_code_points: String,
    /// Identifier derived from `description`; unique per table.
    pub canonical_name: String,
    /// Before deduplication: every alias found for this emoji.
    /// After deduplication: sorted surviving aliases.
    pub aliases: Vec<String>,
    /// Original description text.
    pub description: String,
    /// Description escaped for typesetting output.
    pub display_description: String,
    pub version: Version,
}

impl Entry {
    /// Returns aliases in output form (`a, b, c`).
    pub fn joined_aliases(&self) -> String {
        self.aliases.join(", ")
    }
}

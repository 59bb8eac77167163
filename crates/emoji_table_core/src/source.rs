//! Standard-body emoji list parser (`emoji-test.txt` format).
//!
//! # Responsibility
//! - Split the file into group/subgroup sections.
//! - Extract qualifying data lines into `RawEntry` records.
//!
//! # Invariants
//! - Only `fully-qualified` and `component` lines produce entries.
//! - Lines that do not match the data-line grammar are skipped, not fatal.
//! - An entry outside of a group/subgroup section is fatal.

use crate::model::entry::{RawEntry, Version};
use crate::model::tree::{GroupTree, TreeError};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const GROUP_HEADER: &str = "# group";
const SUBGROUP_HEADER: &str = "# subgroup";
const QUALIFYING_STATUSES: &[&str] = &["fully-qualified", "component"];

// <code points> ; <status> # <glyph> E<major>.<minor> <description>
static DATA_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<code_points>[0-9A-Fa-f]+(?:[ \t]+[0-9A-Fa-f]+)*)\s*;\s*(?P<status>[A-Za-z-]+)\s*#\s*\S+\s+(?P<version>E\d+\.\d+)\s+(?P<description>.*\S)\s*$",
    )
    .expect("valid emoji data line regex")
});

pub type SourceResult<T> = Result<T, SourceError>;

/// Fatal structural problems in the standard-body file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// A subgroup header appeared before any group header.
    SubgroupBeforeGroup { line: usize },
    /// A qualifying data line appeared before any group header.
    EntryBeforeGroup { line: usize },
    /// A qualifying data line appeared before a subgroup header of its group.
    EntryBeforeSubgroup { line: usize },
}

impl SourceError {
    /// 1-based line number of the offending line.
    pub fn line(&self) -> usize {
        match self {
            Self::SubgroupBeforeGroup { line }
            | Self::EntryBeforeGroup { line }
            | Self::EntryBeforeSubgroup { line } => *line,
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SubgroupBeforeGroup { line } => {
                write!(f, "line {line}: subgroup header before any group header")
            }
            Self::EntryBeforeGroup { line } => {
                write!(f, "line {line}: emoji entry before any group header")
            }
            Self::EntryBeforeSubgroup { line } => {
                write!(f, "line {line}: emoji entry before any subgroup header")
            }
        }
    }
}

impl Error for SourceError {}

/// Parser output: the ordered taxonomy plus bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSource {
    pub tree: GroupTree<RawEntry>,
    /// Data lines dropped because they failed the grammar or did not qualify.
    pub skipped_lines: usize,
}

enum Line<'a> {
    Group(&'a str),
    Subgroup(&'a str),
    Ignored,
    Data(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if let Some(name) = header_name(line, GROUP_HEADER) {
        return Line::Group(name);
    }
    if let Some(name) = header_name(line, SUBGROUP_HEADER) {
        return Line::Subgroup(name);
    }
    if line.trim().is_empty() || line.starts_with('#') {
        return Line::Ignored;
    }
    Line::Data(line)
}

/// Accepts both `# group: Name` and `# group Name`.
fn header_name<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(prefix)?;
    if !rest.starts_with(':') && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim_start_matches(':').trim())
}

/// Parses one data line.
///
/// Returns `None` when the line does not match the grammar or carries a
/// non-qualifying status.
pub fn parse_data_line(line: &str) -> Option<RawEntry> {
    let caps = DATA_LINE_RE.captures(line)?;
    if !QUALIFYING_STATUSES.contains(&&caps["status"]) {
        return None;
    }
    let version = caps["version"].parse::<Version>().ok()?;
    let code_points = caps["code_points"]
        .split_whitespace()
        .map(str::to_ascii_uppercase)
        .collect();

    Some(RawEntry {
        code_points,
        version,
        description: caps["description"].to_string(),
    })
}

/// Parses the full standard-body text.
///
/// # Errors
/// - `SubgroupBeforeGroup` / `EntryBeforeGroup` / `EntryBeforeSubgroup` when
///   section headers are missing for a line that needs them.
pub fn parse_emoji_test(text: &str) -> SourceResult<ParsedSource> {
    let mut tree = GroupTree::new();
    let mut skipped_lines = 0usize;

    for (index, line) in text.lines().enumerate() {
        let line_no = index + 1;
        match classify(line) {
            Line::Group(name) => tree.open_group(name),
            Line::Subgroup(name) => tree
                .open_subgroup(name)
                .map_err(|_| SourceError::SubgroupBeforeGroup { line: line_no })?,
            Line::Ignored => {}
            Line::Data(data) => {
                let Some(entry) = parse_data_line(data) else {
                    skipped_lines += 1;
                    continue;
                };
                tree.push(entry).map_err(|err| match err {
                    TreeError::NoOpenGroup => SourceError::EntryBeforeGroup { line: line_no },
                    TreeError::NoOpenSubgroup => {
                        SourceError::EntryBeforeSubgroup { line: line_no }
                    }
                })?;
            }
        }
    }

    debug!(
        "event=source_parse module=source status=ok groups={} subgroups={} entries={} skipped_lines={}",
        tree.group_count(),
        tree.subgroup_count(),
        tree.entry_count(),
        skipped_lines
    );

    Ok(ParsedSource {
        tree,
        skipped_lines,
    })
}

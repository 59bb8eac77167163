//! Table serializer for the downstream macro layer.
//!
//! # Responsibility
//! - Render the license header, provenance and metadata lines.
//! - Render group/subgroup markers and one data line per entry.
//! - Parse data lines back into their positional fields.
//!
//! # Invariants
//! - Output order equals `GroupTree` traversal order.
//! - `Full` data lines carry exactly five brace-delimited fields,
//!   `Compact` lines exactly four.

use crate::model::entry::Entry;
use crate::model::tree::GroupTree;
use crate::normalize::texify;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write as _;
use std::str::FromStr;

pub const LICENSE_HEADER: &str = r"%%
%%  Copyright (C) 2020 by Xiangdong Zeng <xdzeng96@gmail.com>
%%
%%  This work may be distributed and/or modified under the
%%  conditions of the LaTeX Project Public License, either
%%  version 1.3c of this license or (at your option) any later
%%  version. The latest version of this license is in:
%%
%%    http://www.latex-project.org/lppl.txt
%%
%%  and version 1.3 or later is part of all distributions of
%%  LaTeX version 2005/12/01 or later.
%%
%%  This work has the LPPL maintenance status `maintained'.
%%
%%  The Current Maintainer of this work is Xiangdong Zeng.
%%
";

const GROUP_MARKER: &str = r"\__emoji_group:n";
const SUBGROUP_MARKER: &str = r"\__emoji_subgroup:n";
const FULL_DEF_MARKER: &str = r"\__emoji_def:nnnnn";
const COMPACT_DEF_MARKER: &str = r"\__emoji_def:nnnn";

static DEF_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\\__emoji_def:(n{4,5})((?: \{[^{}]*\})+)$").expect("valid def line regex")
});
static FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]*)\}").expect("valid field regex"));

/// Shape of emitted data lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableLayout {
    /// Five fields: code points, name, aliases, description, version.
    #[default]
    Full,
    /// Four fields, no version column.
    Compact,
}

impl TableLayout {
    fn def_marker(self) -> &'static str {
        match self {
            Self::Full => FULL_DEF_MARKER,
            Self::Compact => COMPACT_DEF_MARKER,
        }
    }

    fn field_count(self) -> usize {
        match self {
            Self::Full => 5,
            Self::Compact => 4,
        }
    }
}

impl FromStr for TableLayout {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            other => Err(format!(
                "unsupported table layout `{other}`; expected full|compact"
            )),
        }
    }
}

/// Generator metadata emitted as `{date}{version}{description}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorInfo {
    pub date: String,
    pub version: String,
    pub description: String,
}

impl Default for GeneratorInfo {
    fn default() -> Self {
        Self {
            date: "2020/04/08".to_string(),
            version: concat!("v", env!("CARGO_PKG_VERSION")).to_string(),
            description: "Emoji definition table".to_string(),
        }
    }
}

/// Everything the renderer needs besides the table itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// File name used in the provenance and end-of-file lines.
    pub file_name: String,
    pub info: GeneratorInfo,
    pub layout: TableLayout,
}

/// Positional fields of one data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefLine {
    pub code_points: String,
    pub name: String,
    pub aliases: String,
    pub description: String,
    /// `None` for `Compact` lines.
    pub version: Option<String>,
}

impl DefLine {
    pub fn from_entry(entry: &Entry, layout: TableLayout) -> Self {
        Self {
            code_points: entry.tex_code_points.clone(),
            name: entry.canonical_name.clone(),
            aliases: entry.joined_aliases(),
            description: entry.display_description.clone(),
            version: match layout {
                TableLayout::Full => Some(entry.version.to_string()),
                TableLayout::Compact => None,
            },
        }
    }

    fn layout(&self) -> TableLayout {
        if self.version.is_some() {
            TableLayout::Full
        } else {
            TableLayout::Compact
        }
    }

    fn render(&self) -> String {
        let mut line = format!(
            "{} {{{}}} {{{}}} {{{}}} {{{}}}",
            self.layout().def_marker(),
            self.code_points,
            self.name,
            self.aliases,
            self.description
        );
        if let Some(version) = &self.version {
            let _ = write!(line, " {{{version}}}");
        }
        line
    }
}

/// Parses one rendered data line; `None` for any other line.
pub fn parse_def_line(line: &str) -> Option<DefLine> {
    let caps = DEF_LINE_RE.captures(line)?;
    let layout = if caps[1].len() == TableLayout::Full.field_count() {
        TableLayout::Full
    } else {
        TableLayout::Compact
    };
    let mut fields: Vec<String> = FIELD_RE
        .captures_iter(&caps[2])
        .map(|field| field[1].to_string())
        .collect();
    if fields.len() != layout.field_count() {
        return None;
    }
    let version = match layout {
        TableLayout::Full => fields.pop(),
        TableLayout::Compact => None,
    };
    let description = fields.pop()?;
    let aliases = fields.pop()?;
    let name = fields.pop()?;
    let code_points = fields.pop()?;
    Some(DefLine {
        code_points,
        name,
        aliases,
        description,
        version,
    })
}

/// Renders the complete output file.
pub fn render_table(tree: &GroupTree<Entry>, options: &RenderOptions) -> String {
    let mut out = String::with_capacity(tree.entry_count() * 96 + LICENSE_HEADER.len());
    out.push_str(LICENSE_HEADER);
    let _ = writeln!(out, "\\ProvidesExplFile{{{}}}", options.file_name);
    let _ = writeln!(
        out,
        "  {{{}}}{{{}}}{{{}}}",
        options.info.date, options.info.version, options.info.description
    );

    for (group, subgroups) in tree.groups() {
        let _ = writeln!(out, "{GROUP_MARKER} {{{}}}", texify(group));
        for (subgroup, entries) in subgroups {
            let _ = writeln!(out, "{SUBGROUP_MARKER} {{{}}}", texify(subgroup));
            for entry in entries {
                out.push_str(&DefLine::from_entry(entry, options.layout).render());
                out.push('\n');
            }
        }
    }

    let _ = write!(out, "%%\n%% End of file `{}'.\n", options.file_name);
    out
}
